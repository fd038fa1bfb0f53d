//! Rendering backends: the [`Surface`] trait, a terminal cell grid with its
//! crossterm driver, and a recording display list.

pub mod cells;
pub mod display_list;
pub mod driver;

pub use cells::{CellStyle, CellSurface, CellUpdate, StyledCell};
pub use display_list::{DisplayList, DrawCommand};
pub use driver::Driver;

use crate::font::Font;
use crate::geometry::{Offset, Region};
use crate::node::SpriteId;
use crate::style::{Color, StyleFlags};

// ---------------------------------------------------------------------------
// TextRun
// ---------------------------------------------------------------------------

/// One text draw call with fully resolved colors.
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Top-left of the first glyph in screen pixels.
    pub origin: Offset,
    /// Nothing outside this rectangle may be touched.
    pub clip: Region,
    /// Font to place glyphs with.
    pub font: &'a dyn Font,
    pub scale: f32,
    pub color: Color,
    pub background: Option<Color>,
    pub flags: StyleFlags,
}

impl TextRun<'_> {
    /// Screen x of the glyph starting at byte `index`.
    pub fn glyph_x(&self, index: usize) -> i32 {
        self.origin.x + (self.font.measure(&self.text[..index]) * self.scale).floor() as i32
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A render target for flows.
///
/// Every call carries a clip rectangle; implementations must not draw
/// outside it.
pub trait Surface {
    /// Draw a text run.
    fn draw_text(&mut self, run: &TextRun<'_>);

    /// Draw `source` of `sprite` stretched to `dest`.
    fn draw_sprite(&mut self, sprite: SpriteId, source: Region, dest: Region, clip: Region);

    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Region, color: Color, clip: Region);

    /// Draw a divider rule. Defaults to a filled rectangle.
    fn draw_rule(&mut self, rect: Region, color: Color, clip: Region) {
        self.fill_rect(rect, color, clip);
    }

    /// Called with the screen rectangle of a component slice before its
    /// draw callback runs.
    fn draw_component(&mut self, _bounds: Region, _clip: Region) {}
}
