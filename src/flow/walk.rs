//! The line/slice walk shared by drawing, hit-testing and reconciliation.
//!
//! Both scroll addressing modes run through the same [`walk_with`]; they only
//! differ in the [`ScrollAddressing`] that decides which leading lines are
//! skipped and where the first visible line starts.

use std::ops::ControlFlow;

use crate::geometry::{Offset, Region};
use crate::node::Node;
use crate::slice::Slice;

use super::align;
use super::layout::{CachedFlow, CachedFlowLine};

// ---------------------------------------------------------------------------
// Scroll / FlowView
// ---------------------------------------------------------------------------

/// Vertical scroll position of a flow.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scroll {
    /// Smooth scrolling by pixels; partially scrolled lines are clipped.
    Pixels(f32),
    /// Discrete scrolling by whole lines.
    Lines(usize),
}

impl Default for Scroll {
    fn default() -> Self {
        Scroll::Pixels(0.0)
    }
}

/// Where and how a flow is placed on screen.
///
/// The same view must be used for drawing, hit-testing and reconciling a
/// flow within one frame so all three agree on slice positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlowView {
    /// Screen position of the flow's top-left corner.
    pub position: Offset,
    pub scale: f32,
    /// Layout width; also the container width for horizontal alignment.
    pub max_width: Option<f32>,
    /// Clip height in screen pixels.
    pub max_height: Option<i32>,
    pub scroll: Scroll,
}

impl Default for FlowView {
    fn default() -> Self {
        Self {
            position: Offset::ZERO,
            scale: 1.0,
            max_width: None,
            max_height: None,
            scroll: Scroll::default(),
        }
    }
}

impl FlowView {
    /// A view at `position` with scale 1 and no limits.
    pub fn at(position: Offset) -> Self {
        Self { position, ..Self::default() }
    }

    /// Set the scale (builder).
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the layout width (builder).
    pub fn with_max_width(mut self, width: f32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set the clip height (builder).
    pub fn with_max_height(mut self, height: i32) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Scroll by pixels (builder).
    pub fn with_scroll_pixels(mut self, pixels: f32) -> Self {
        self.scroll = Scroll::Pixels(pixels);
        self
    }

    /// Scroll by whole lines (builder).
    pub fn with_scroll_lines(mut self, lines: usize) -> Self {
        self.scroll = Scroll::Lines(lines);
        self
    }

    /// The scale actually applied; degenerate values become `1.0`.
    pub fn effective_scale(&self) -> f32 {
        if self.scale > 0.0 && self.scale.is_finite() {
            self.scale
        } else {
            1.0
        }
    }

    /// Width used for horizontal alignment of `flow`, in scaled pixels.
    /// Without a view bound the width the flow was laid out at is used.
    pub(crate) fn container_width(&self, flow: &CachedFlow) -> f32 {
        let max_width = self
            .max_width
            .or(flow.max_width_signature)
            .filter(|w| w.is_finite())
            .unwrap_or(0.0);
        flow.width.max(max_width) * self.effective_scale()
    }

    /// Restrict `bounds` to the view's vertical clip band.
    pub(crate) fn clip(&self, bounds: Region) -> Region {
        let top = self.position.y;
        let y1 = bounds.y.max(top);
        let y2 = match self.max_height {
            Some(h) => bounds.bottom().min(top + h.max(0)),
            None => bounds.bottom(),
        };
        if y2 <= y1 || bounds.width <= 0 {
            Region::EMPTY
        } else {
            Region::new(bounds.x, y1, bounds.width, y2 - y1)
        }
    }
}

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// Decides which leading lines a scroll position hides.
pub(crate) trait ScrollAddressing {
    /// Called for each line until one is not skipped.
    fn skip_line(&mut self, scaled_height: f32) -> bool;

    /// Start y of the first visible line, relative to the view's top.
    fn first_line_start(&self) -> f32;
}

/// Pixel addressing: consume whole lines, then shift the first visible line
/// up by what is left.
pub(crate) struct PixelScroll {
    remaining: f32,
}

impl ScrollAddressing for PixelScroll {
    fn skip_line(&mut self, scaled_height: f32) -> bool {
        if self.remaining > 0.0 && self.remaining >= scaled_height {
            self.remaining -= scaled_height;
            true
        } else {
            false
        }
    }

    fn first_line_start(&self) -> f32 {
        -self.remaining.max(0.0)
    }
}

/// Line addressing: skip a whole number of lines.
pub(crate) struct LineScroll {
    remaining: usize,
}

impl ScrollAddressing for LineScroll {
    fn skip_line(&mut self, _scaled_height: f32) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    fn first_line_start(&self) -> f32 {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Walk
// ---------------------------------------------------------------------------

/// A slice placed on screen by the walk.
#[derive(Debug, Clone, Copy)]
pub struct PlacedSlice<'a> {
    pub line_index: usize,
    pub slice_index: usize,
    pub line: &'a CachedFlowLine,
    pub slice: &'a Slice,
    /// Full screen rectangle, [`Region::EMPTY`] for hidden slices.
    pub bounds: Region,
    /// `bounds` clipped to the view; empty when nothing is visible.
    pub visible: Region,
}

impl PlacedSlice<'_> {
    /// Whether any part of the slice is on screen.
    pub fn is_visible(&self) -> bool {
        !self.visible.is_empty()
    }
}

/// Walk the slices of `flow` as placed by `view`, in layout order.
///
/// With `include_hidden` set, slices scrolled or clipped out of view are
/// visited too (with empty bounds); otherwise the walk stops at the first
/// line past the clip.
pub fn walk_flow<'a, F>(flow: &'a CachedFlow, view: &FlowView, include_hidden: bool, visit: F)
where
    F: FnMut(PlacedSlice<'a>) -> ControlFlow<()>,
{
    match view.scroll {
        Scroll::Pixels(pixels) => {
            let remaining = if pixels.is_finite() { pixels.max(0.0) } else { 0.0 };
            walk_with(flow, view, PixelScroll { remaining }, include_hidden, visit)
        }
        Scroll::Lines(lines) => {
            walk_with(flow, view, LineScroll { remaining: lines }, include_hidden, visit)
        }
    }
}

pub(crate) fn walk_with<'a, A, F>(
    flow: &'a CachedFlow,
    view: &FlowView,
    mut addressing: A,
    include_hidden: bool,
    mut visit: F,
) where
    A: ScrollAddressing,
    F: FnMut(PlacedSlice<'a>) -> ControlFlow<()>,
{
    let scale = view.effective_scale();
    let container = view.container_width(flow);
    let clip_bottom = view.max_height.map(|h| h as f32);

    let mut started = false;
    let mut y = 0.0f32;

    for (line_index, line) in flow.lines.iter().enumerate() {
        let line_height = line.height * scale;

        let mut hidden = false;
        if !started {
            if addressing.skip_line(line_height) {
                hidden = true;
            } else {
                started = true;
                y = addressing.first_line_start();
            }
        }
        let past_clip = !hidden && clip_bottom.is_some_and(|bottom| y >= bottom);

        if hidden || past_clip {
            if !include_hidden {
                if past_clip {
                    return;
                }
                continue;
            }
            for (slice_index, slice) in line.slices.iter().enumerate() {
                let placed = PlacedSlice {
                    line_index,
                    slice_index,
                    line,
                    slice,
                    bounds: Region::EMPTY,
                    visible: Region::EMPTY,
                };
                if visit(placed).is_break() {
                    return;
                }
            }
            continue;
        }

        let mut x = 0.0f32;
        for (slice_index, slice) in line.slices.iter().enumerate() {
            let height = slice.height * scale;
            // Dividers laid out without a bound span the container.
            let width = if spans_container(slice) {
                container
            } else {
                x += align::horizontal_offset(line, slice_index, container, scale, x);
                slice.width * scale
            };
            let dy = align::vertical_offset(slice.alignment, line_height, height);

            let bounds = Region::new(
                view.position.x + x.floor() as i32,
                view.position.y + (y + dy).floor() as i32,
                width.ceil() as i32,
                height.ceil() as i32,
            );
            let placed = PlacedSlice {
                line_index,
                slice_index,
                line,
                slice,
                bounds,
                visible: view.clip(bounds),
            };
            if visit(placed).is_break() {
                return;
            }
            x += width;
        }

        y += line_height;
    }
}

fn spans_container(slice: &Slice) -> bool {
    slice.width <= 0.0 && matches!(slice.node.as_ref(), Node::Divider(_))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::calculate_flow;
    use crate::font::MonospaceFont;
    use crate::node::Node;
    use crate::style::Alignment;
    use pretty_assertions::assert_eq;

    fn placements(flow: &CachedFlow, view: &FlowView, include_hidden: bool) -> Vec<(usize, Region, Region)> {
        let mut out = Vec::new();
        walk_flow(flow, view, include_hidden, |p| {
            out.push((p.line_index, p.bounds, p.visible));
            ControlFlow::Continue(())
        });
        out
    }

    fn three_lines() -> std::rc::Rc<CachedFlow> {
        let f = MonospaceFont::shared(1, 2.0, 10.0);
        calculate_flow(vec![Node::text("aa\nbb\ncc")], &f, Some(100.0))
    }

    // -----------------------------------------------------------------------
    // FlowView
    // -----------------------------------------------------------------------

    #[test]
    fn view_builders() {
        let v = FlowView::at(Offset::new(3, 4))
            .with_scale(2.0)
            .with_max_width(50.0)
            .with_max_height(20)
            .with_scroll_lines(1);
        assert_eq!(v.position, Offset::new(3, 4));
        assert_eq!(v.scale, 2.0);
        assert_eq!(v.max_width, Some(50.0));
        assert_eq!(v.max_height, Some(20));
        assert_eq!(v.scroll, Scroll::Lines(1));
        assert_eq!(FlowView::default().with_scale(0.0).effective_scale(), 1.0);
    }

    #[test]
    fn clip_band() {
        let v = FlowView::at(Offset::new(0, 10)).with_max_height(5);
        assert_eq!(v.clip(Region::new(0, 8, 4, 4)), Region::new(0, 10, 4, 2));
        assert_eq!(v.clip(Region::new(0, 13, 4, 4)), Region::new(0, 13, 4, 2));
        assert_eq!(v.clip(Region::new(0, 20, 4, 4)), Region::EMPTY);
        assert_eq!(v.clip(Region::new(0, 12, 0, 4)), Region::EMPTY);
    }

    // -----------------------------------------------------------------------
    // Walk
    // -----------------------------------------------------------------------

    #[test]
    fn unscrolled_walk_stacks_lines() {
        let flow = three_lines();
        let view = FlowView::at(Offset::new(5, 7));
        let p = placements(&flow, &view, false);
        assert_eq!(
            p.iter().map(|(l, b, _)| (*l, b.y)).collect::<Vec<_>>(),
            vec![(0, 7), (1, 17), (2, 27)]
        );
        assert_eq!(p[0].1, Region::new(5, 7, 4, 10));
    }

    #[test]
    fn pixel_scroll_skips_and_shifts() {
        let flow = three_lines();
        let view = FlowView::default().with_scroll_pixels(14.0);
        let p = placements(&flow, &view, false);
        assert_eq!(p.len(), 2);
        assert_eq!(p[0].0, 1);
        assert_eq!(p[0].1, Region::new(0, -4, 4, 10));
        assert_eq!(p[0].2, Region::new(0, 0, 4, 6));
        assert_eq!(p[1].1.y, 6);
    }

    #[test]
    fn line_scroll_skips_whole_lines() {
        let flow = three_lines();
        let view = FlowView::default().with_scroll_lines(2);
        let p = placements(&flow, &view, false);
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].0, 2);
        assert_eq!(p[0].1, Region::new(0, 0, 4, 10));
    }

    #[test]
    fn max_height_stops_the_walk() {
        let flow = three_lines();
        let view = FlowView::default().with_max_height(15);
        let p = placements(&flow, &view, false);
        assert_eq!(p.len(), 2);
        assert_eq!(p[1].2, Region::new(0, 10, 4, 5));
    }

    #[test]
    fn include_hidden_visits_every_slice() {
        let flow = three_lines();
        let view = FlowView::default().with_scroll_lines(1).with_max_height(10);
        let p = placements(&flow, &view, true);
        assert_eq!(p.len(), 3);
        assert_eq!(p[0].1, Region::EMPTY);
        assert!(!p[1].2.is_empty());
        assert_eq!(p[2].2, Region::EMPTY);
    }

    #[test]
    fn scale_multiplies_geometry() {
        let flow = three_lines();
        let view = FlowView::default().with_scale(2.0);
        let p = placements(&flow, &view, false);
        assert_eq!(p[1].1, Region::new(0, 20, 8, 20));
    }

    #[test]
    fn alignment_is_applied_in_walk() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(
            vec![
                Node::text("ab"),
                Node::component(2.0, 3.0),
                Node::text("cd").with_alignment(Alignment::RIGHT | Alignment::BOTTOM),
            ],
            &f,
            Some(10.0),
        );
        let p = placements(&flow, &FlowView::default().with_max_width(10.0), false);
        assert_eq!(p[0].1, Region::new(0, 0, 2, 1));
        assert_eq!(p[1].1, Region::new(2, 0, 2, 3));
        assert_eq!(p[2].1, Region::new(8, 2, 2, 1));
    }

    #[test]
    fn alignment_falls_back_to_layout_width() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("ok").with_alignment(Alignment::RIGHT)], &f, Some(10.0));
        let p = placements(&flow, &FlowView::default(), false);
        assert_eq!(p[0].1, Region::new(8, 0, 2, 1));
    }

    #[test]
    fn unbounded_divider_spans_the_flow() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("title"), Node::divider(), Node::text("body")], &f, None);
        let p = placements(&flow, &FlowView::at(Offset::new(2, 0)).with_scale(2.0), false);
        assert_eq!(p.len(), 3);
        assert_eq!(p[1].1, Region::new(2, 2, 10, 2));
        assert_eq!(p[1].2, p[1].1);
    }

    #[test]
    fn break_stops_early() {
        let flow = three_lines();
        let mut count = 0;
        walk_flow(&flow, &FlowView::default(), true, |_| {
            count += 1;
            ControlFlow::Break(())
        });
        assert_eq!(count, 1);
    }
}
