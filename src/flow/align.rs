//! Deferred two-axis alignment, shared by drawing and hit-testing.
//!
//! Offsets are recomputed on every walk rather than stored in the layout.

use crate::style::Alignment;

use super::layout::CachedFlowLine;

/// Horizontal shift for the `index`-th slice of `line`.
///
/// `container_width` and `x` are scaled pixels; `x` is where the slice would
/// start without alignment. The result is never negative.
pub(crate) fn horizontal_offset(
    line: &CachedFlowLine,
    index: usize,
    container_width: f32,
    scale: f32,
    x: f32,
) -> f32 {
    let Some(slice) = line.slices.get(index) else {
        return 0.0;
    };
    let horizontal = slice.alignment.horizontal();
    if !horizontal.intersects(Alignment::CENTER | Alignment::RIGHT) {
        return 0.0;
    }
    // A run of equally aligned slices moves as one block, positioned by its
    // first slice.
    if index > 0 && line.slices[index - 1].alignment.horizontal() == horizontal {
        return 0.0;
    }

    let remaining: f32 = line.slices[index..].iter().map(|s| s.width * scale).sum();
    let available = container_width - remaining - x;
    if available <= 0.0 {
        return 0.0;
    }
    if horizontal.contains(Alignment::RIGHT) {
        available.floor()
    } else {
        (available / 2.0).floor()
    }
}

/// Vertical shift of a slice of `slice_height` within a line of
/// `container_height` (both scaled pixels). Never negative.
pub(crate) fn vertical_offset(alignment: Alignment, container_height: f32, slice_height: f32) -> f32 {
    let free = container_height - slice_height;
    if free <= 0.0 {
        return 0.0;
    }
    let vertical = alignment.vertical();
    if vertical.contains(Alignment::BOTTOM) {
        free.floor()
    } else if vertical.contains(Alignment::MIDDLE) {
        (free / 2.0).floor()
    } else {
        0.0
    }
}
