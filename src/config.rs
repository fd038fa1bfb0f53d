//! Engine configuration.

use crate::style::Color;

/// Tunables shared by layout and drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    /// Height of a divider rule in layout units.
    pub divider_height: f32,
    /// Text color when neither the run nor the draw call sets one.
    pub default_color: Color,
    /// Shadow color used by `SHADOW` text when the run sets none.
    pub default_shadow_color: Option<Color>,
    /// Skip leading spaces of a wrapped continuation that starts a new line.
    pub trim_wrapped_whitespace: bool,
    /// Pixel offset of text shadows, applied to both axes.
    pub shadow_offset: i32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            divider_height: 1.0,
            default_color: Color::WHITE,
            default_shadow_color: Some(Color::rgba(0, 0, 0, 128)),
            trim_wrapped_whitespace: true,
            shadow_offset: 1,
        }
    }
}

impl FlowConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the divider height (builder).
    pub fn with_divider_height(mut self, height: f32) -> Self {
        self.divider_height = height.max(0.0);
        self
    }

    /// Set the default text color (builder).
    pub fn with_default_color(mut self, color: Color) -> Self {
        self.default_color = color;
        self
    }

    /// Set or clear the default shadow color (builder).
    pub fn with_default_shadow_color(mut self, color: Option<Color>) -> Self {
        self.default_shadow_color = color;
        self
    }

    /// Keep or trim leading whitespace on wrapped lines (builder).
    pub fn with_trim_wrapped_whitespace(mut self, trim: bool) -> Self {
        self.trim_wrapped_whitespace = trim;
        self
    }

    /// Set the shadow offset (builder).
    pub fn with_shadow_offset(mut self, offset: i32) -> Self {
        self.shadow_offset = offset;
        self
    }
}
