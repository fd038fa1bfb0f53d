//! Font handles and glyph measurement.
//!
//! The engine never rasterizes glyphs. It only needs a width for a run of
//! text, a line height, and a stable identity so cached layouts can be
//! validated against the font they were computed with.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Stable identity of a font, used in layout cache signatures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontId(pub u64);

/// A font the engine can measure text with.
pub trait Font: fmt::Debug {
    /// Identity used for layout memoization. Two fonts with the same id must
    /// measure identically.
    fn id(&self) -> FontId;

    /// Width of `text` in layout units at scale 1.
    fn measure(&self, text: &str) -> f32;

    /// Height of one line in layout units at scale 1.
    fn line_height(&self) -> f32;
}

/// Shared, cheaply clonable font handle.
pub type FontRef = Rc<dyn Font>;

// ---------------------------------------------------------------------------
// MonospaceFont
// ---------------------------------------------------------------------------

/// Fixed-advance font: every character is `advance` units wide.
///
/// With `advance = 1` and `line_height = 1` one layout unit equals one
/// terminal cell, which is how [`crate::render::CellSurface`] renders flows.
#[derive(Debug, Clone, PartialEq)]
pub struct MonospaceFont {
    id: FontId,
    advance: f32,
    line_height: f32,
}

impl MonospaceFont {
    /// Create a new monospace font.
    pub fn new(id: u64, advance: f32, line_height: f32) -> Self {
        Self { id: FontId(id), advance, line_height }
    }

    /// Create a font already wrapped in a [`FontRef`].
    pub fn shared(id: u64, advance: f32, line_height: f32) -> FontRef {
        Rc::new(Self::new(id, advance, line_height))
    }

    /// A one-cell-per-character terminal font.
    pub fn terminal() -> FontRef {
        Self::shared(0, 1.0, 1.0)
    }

    /// Per-character advance.
    pub fn advance(&self) -> f32 {
        self.advance
    }
}

impl Font for MonospaceFont {
    fn id(&self) -> FontId {
        self.id
    }

    fn measure(&self, text: &str) -> f32 {
        text.chars().filter(|c| *c != '\n').count() as f32 * self.advance
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

// ---------------------------------------------------------------------------
// FontRegistry
// ---------------------------------------------------------------------------

/// Named font aliases resolvable from markup (`@f{alias}`).
///
/// Aliases are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    fonts: HashMap<String, FontRef>,
}

impl FontRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `font` under `alias` (builder).
    pub fn with_font(mut self, alias: &str, font: FontRef) -> Self {
        self.insert(alias, font);
        self
    }

    /// Register `font` under `alias`, replacing any previous entry.
    pub fn insert(&mut self, alias: &str, font: FontRef) {
        self.fonts.insert(alias.trim().to_ascii_lowercase(), font);
    }

    /// Look up a font by alias.
    pub fn get(&self, alias: &str) -> Option<&FontRef> {
        self.fonts.get(&alias.trim().to_ascii_lowercase())
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether no aliases are registered.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
