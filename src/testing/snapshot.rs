//! Snapshot rendering helpers.
//!
//! Functions for turning flows and cell surfaces into plain-text strings
//! suitable for snapshot testing and assertions.

use crate::flow::{draw_flow, DrawContext, FlowSource, FlowView};
use crate::font::MonospaceFont;
use crate::render::CellSurface;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Lay out and draw `source` into a `width` x `height` cell grid with the
/// terminal font, and return the grid as text.
///
/// Each row becomes one line with trailing spaces trimmed. Lines are
/// separated by `'\n'`; the final line has no trailing newline.
///
/// # Examples
///
/// ```ignore
/// use richflow::testing::render_to_string;
/// use richflow::Node;
///
/// let output = render_to_string(vec![Node::text("Hello")], 20, 1);
/// assert_eq!(output, "Hello");
/// ```
pub fn render_to_string(source: impl Into<FlowSource>, width: u16, height: u16) -> String {
    let view = FlowView::default().with_max_width(width as f32).with_max_height(height as i32);
    render_view_to_string(source, &view, width, height)
}

/// Like [`render_to_string`] with an explicit view (scroll, position, scale).
pub fn render_view_to_string(source: impl Into<FlowSource>, view: &FlowView, width: u16, height: u16) -> String {
    let mut surface = CellSurface::new(width, height);
    draw_flow(source, &mut surface, &MonospaceFont::terminal(), view, &DrawContext::new());
    surface_to_string(&surface)
}

/// Convert a full cell surface to a plain text string.
///
/// Rows are right-trimmed of spaces and joined with `'\n'`. Trailing empty
/// rows are kept so the row count always equals the surface height.
pub fn surface_to_string(surface: &CellSurface) -> String {
    if surface.width == 0 || surface.height == 0 {
        return String::new();
    }
    (0..surface.height)
        .map(|y| surface.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================
