//! Style model: alignment flags, text style flags, colors and [`TextStyle`].

use std::fmt;
use std::str::FromStr;

use crate::error::ColorParseError;
use crate::font::FontRef;

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

bitflags::bitflags! {
    /// Two-axis alignment of a node within its line.
    ///
    /// Horizontal and vertical flags are independent. An empty set means the
    /// node flows inline at its natural position.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Alignment: u8 {
        const LEFT = 1 << 0;
        const CENTER = 1 << 1;
        const RIGHT = 1 << 2;
        const TOP = 1 << 3;
        const MIDDLE = 1 << 4;
        const BOTTOM = 1 << 5;

        const HORIZONTAL = Self::LEFT.bits() | Self::CENTER.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::TOP.bits() | Self::MIDDLE.bits() | Self::BOTTOM.bits();
    }
}

impl Alignment {
    /// Only the horizontal flags.
    #[inline]
    pub fn horizontal(self) -> Alignment {
        self & Alignment::HORIZONTAL
    }

    /// Only the vertical flags.
    #[inline]
    pub fn vertical(self) -> Alignment {
        self & Alignment::VERTICAL
    }

    /// Toggle `flag` within its axis.
    ///
    /// If `flag` is already set it is cleared. Otherwise every other flag on
    /// the same axis is cleared and `flag` is set. The other axis is untouched.
    pub fn toggled(self, flag: Alignment) -> Alignment {
        if self.contains(flag) {
            return self - flag;
        }
        let axis = if Alignment::HORIZONTAL.contains(flag) {
            Alignment::HORIZONTAL
        } else {
            Alignment::VERTICAL
        };
        (self - axis) | flag
    }
}

// ---------------------------------------------------------------------------
// StyleFlags
// ---------------------------------------------------------------------------

bitflags::bitflags! {
    /// On/off text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u16 {
        const BOLD = 1 << 0;
        const UNDERLINE = 1 << 1;
        const STRIKETHROUGH = 1 << 2;
        /// Per-character rainbow coloring.
        const PRISMATIC = 1 << 3;
        /// Decorative display face; hosts typically map it to a sprite font.
        const FANCY = 1 << 4;
        const SHADOW = 1 << 5;
        /// Swap foreground and background.
        const INVERT = 1 << 6;
        /// Alternate glyph set.
        const JUNIMO = 1 << 7;
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    /// An opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// The palette prismatic text cycles through, one entry per character.
pub const PRISMATIC_PALETTE: [Color; 6] = [
    Color::rgb(255, 0, 0),
    Color::rgb(255, 120, 0),
    Color::rgb(255, 217, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 100, 255),
    Color::rgb(170, 0, 255),
];

impl FromStr for Color {
    type Err = ColorParseError;

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or a named color (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex_color(hex).ok_or_else(|| ColorParseError::InvalidHex(hex.to_owned()));
        }

        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Color::BLACK),
            "white" => Ok(Color::WHITE),
            "red" => Ok(Color::RED),
            "green" => Ok(Color::GREEN),
            "blue" => Ok(Color::BLUE),
            "yellow" => Ok(Color::YELLOW),
            "magenta" => Ok(Color::MAGENTA),
            "cyan" => Ok(Color::CYAN),
            "grey" | "gray" => Ok(Color::GRAY),
            "dark_red" | "darkred" => Ok(Color::rgb(139, 0, 0)),
            "dark_green" | "darkgreen" => Ok(Color::rgb(0, 100, 0)),
            "dark_blue" | "darkblue" => Ok(Color::rgb(0, 0, 139)),
            "dark_grey" | "dark_gray" | "darkgrey" | "darkgray" => Ok(Color::rgb(64, 64, 64)),
            "transparent" => Ok(Color::TRANSPARENT),
            _ => Err(ColorParseError::UnknownName(s.to_owned())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse a hex color body (without the leading `#`).
fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match hex.len() {
        8 => Some(Color::rgba(byte(0..2)?, byte(2..4)?, byte(4..6)?, byte(6..8)?)),
        6 => Some(Color::rgb(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
        3 => {
            // Expand: 0xA -> 0xAA
            let r = byte(0..1)?;
            let g = byte(1..2)?;
            let b = byte(2..3)?;
            Some(Color::rgb(r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// TextStyle
// ---------------------------------------------------------------------------

/// Visual style of a text run.
///
/// Unset fields fall back to the defaults supplied at draw time (see
/// [`crate::flow::DrawContext`]).
#[derive(Clone, Debug)]
pub struct TextStyle {
    /// Font override; `None` uses the flow's font.
    pub font: Option<FontRef>,
    pub color: Option<Color>,
    pub shadow_color: Option<Color>,
    pub background: Option<Color>,
    pub flags: StyleFlags,
    /// Draw and measurement scale; values `<= 0` are treated as `1.0`.
    pub scale: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: None,
            color: None,
            shadow_color: None,
            background: None,
            flags: StyleFlags::empty(),
            scale: 1.0,
        }
    }
}

impl PartialEq for TextStyle {
    fn eq(&self, other: &Self) -> bool {
        let same_font = match (&self.font, &other.font) {
            (None, None) => true,
            (Some(a), Some(b)) => a.id() == b.id(),
            _ => false,
        };
        same_font
            && self.color == other.color
            && self.shadow_color == other.shadow_color
            && self.background == other.background
            && self.flags == other.flags
            && self.scale == other.scale
    }
}

impl TextStyle {
    /// Create a default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font (builder).
    pub fn with_font(mut self, font: FontRef) -> Self {
        self.font = Some(font);
        self
    }

    /// Set the foreground color (builder).
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the shadow color (builder).
    pub fn with_shadow_color(mut self, color: Color) -> Self {
        self.shadow_color = Some(color);
        self
    }

    /// Set the background color (builder).
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Add flags (builder).
    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Set the scale (builder).
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// The scale actually applied to measurement and drawing.
    #[inline]
    pub fn effective_scale(&self) -> f32 {
        if self.scale > 0.0 && self.scale.is_finite() {
            self.scale
        } else {
            1.0
        }
    }

    /// Whether `flag` is set.
    #[inline]
    pub fn has(&self, flag: StyleFlags) -> bool {
        self.flags.contains(flag)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::MonospaceFont;

    // -----------------------------------------------------------------------
    // Alignment
    // -----------------------------------------------------------------------

    #[test]
    fn alignment_axes_are_independent() {
        let a = Alignment::RIGHT | Alignment::BOTTOM;
        assert_eq!(a.horizontal(), Alignment::RIGHT);
        assert_eq!(a.vertical(), Alignment::BOTTOM);
        assert!(Alignment::default().is_empty());
    }

    #[test]
    fn alignment_toggle_sets_and_clears() {
        let a = Alignment::empty().toggled(Alignment::CENTER);
        assert_eq!(a, Alignment::CENTER);
        assert_eq!(a.toggled(Alignment::CENTER), Alignment::empty());
    }

    #[test]
    fn alignment_toggle_replaces_same_axis_only() {
        let a = (Alignment::LEFT | Alignment::TOP).toggled(Alignment::RIGHT);
        assert_eq!(a, Alignment::RIGHT | Alignment::TOP);
        let b = a.toggled(Alignment::BOTTOM);
        assert_eq!(b, Alignment::RIGHT | Alignment::BOTTOM);
    }

    // -----------------------------------------------------------------------
    // Color parsing
    // -----------------------------------------------------------------------

    #[test]
    fn parse_hex_colors() {
        assert_eq!("#ff0000".parse(), Ok(Color::rgb(255, 0, 0)));
        assert_eq!("#FF8800".parse(), Ok(Color::rgb(255, 136, 0)));
        assert_eq!("#abc".parse(), Ok(Color::rgb(0xaa, 0xbb, 0xcc)));
        assert_eq!("#11223344".parse(), Ok(Color::rgba(0x11, 0x22, 0x33, 0x44)));
    }

    #[test]
    fn parse_hex_invalid() {
        assert_eq!(
            "#ff00".parse::<Color>(),
            Err(ColorParseError::InvalidHex("ff00".into()))
        );
        assert!("#gghhii".parse::<Color>().is_err());
        assert!("#ééé".parse::<Color>().is_err());
    }

    #[test]
    fn parse_named_colors() {
        assert_eq!("red".parse(), Ok(Color::RED));
        assert_eq!("  Blue ".parse(), Ok(Color::BLUE));
        assert_eq!("dark_gray".parse::<Color>(), "darkgrey".parse::<Color>());
        assert_eq!("".parse::<Color>(), Err(ColorParseError::Empty));
        assert_eq!(
            "rainbow".parse::<Color>(),
            Err(ColorParseError::UnknownName("rainbow".into()))
        );
    }

    #[test]
    fn color_display_round_trips() {
        let c = Color::rgb(1, 2, 255);
        assert_eq!(c.to_string(), "#0102ff");
        assert_eq!(c.to_string().parse(), Ok(c));
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    // -----------------------------------------------------------------------
    // TextStyle
    // -----------------------------------------------------------------------

    #[test]
    fn text_style_defaults() {
        let s = TextStyle::default();
        assert!(s.font.is_none());
        assert!(s.flags.is_empty());
        assert_eq!(s.scale, 1.0);
    }

    #[test]
    fn effective_scale_guards_degenerate_values() {
        assert_eq!(TextStyle::new().with_scale(2.0).effective_scale(), 2.0);
        assert_eq!(TextStyle::new().with_scale(0.0).effective_scale(), 1.0);
        assert_eq!(TextStyle::new().with_scale(-3.0).effective_scale(), 1.0);
        assert_eq!(TextStyle::new().with_scale(f32::NAN).effective_scale(), 1.0);
    }

    #[test]
    fn text_style_equality_compares_font_ids() {
        let a = MonospaceFont::shared(1, 8.0, 16.0);
        let b = MonospaceFont::shared(1, 8.0, 16.0);
        let c = MonospaceFont::shared(2, 8.0, 16.0);
        assert_eq!(TextStyle::new().with_font(a.clone()), TextStyle::new().with_font(b));
        assert_ne!(TextStyle::new().with_font(a.clone()), TextStyle::new().with_font(c));
        assert_ne!(TextStyle::new().with_font(a), TextStyle::new());
    }

    #[test]
    fn builder_accumulates_flags() {
        let s = TextStyle::new()
            .with_flags(StyleFlags::BOLD)
            .with_flags(StyleFlags::UNDERLINE);
        assert!(s.has(StyleFlags::BOLD));
        assert!(s.has(StyleFlags::UNDERLINE));
        assert!(!s.has(StyleFlags::INVERT));
    }
}
