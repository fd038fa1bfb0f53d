//! Hit-testing and pointer dispatch.
//!
//! Uses the same walk as drawing, so a point inside a drawn slice always
//! resolves to that slice.

use std::ops::ControlFlow;

use crate::geometry::Region;
use crate::node::PointerEvent;
use crate::slice::Slice;

use super::layout::{CachedFlow, CachedFlowLine};
use super::walk::{walk_flow, FlowView};

/// Result of a hit-test: the slice under the point.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub slice: &'a Slice,
    pub line: &'a CachedFlowLine,
    pub line_index: usize,
    /// Pointer position relative to the slice's top-left corner.
    pub local_x: i32,
    pub local_y: i32,
    /// The slice's full screen rectangle.
    pub bounds: Region,
}

/// The slice of `flow` at screen point `(x, y)` under `view`, if any.
///
/// Only the visible part of a slice is hittable; rows scrolled above the
/// view or clipped below it never hit.
pub fn hit_test<'a>(flow: &'a CachedFlow, view: &FlowView, x: i32, y: i32) -> Option<Hit<'a>> {
    let mut found = None;
    walk_flow(flow, view, false, |placed| {
        if placed.visible.contains(x, y) {
            found = Some(Hit {
                slice: placed.slice,
                line: placed.line,
                line_index: placed.line_index,
                local_x: x - placed.bounds.x,
                local_y: y - placed.bounds.y,
                bounds: placed.bounds,
            });
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    found
}

/// Hit-test `(x, y)` and invoke the matching handler on the slice's node,
/// or on its innermost group when the node has none.
///
/// Returns whether a handler ran and consumed the event.
pub fn dispatch(flow: &CachedFlow, view: &FlowView, x: i32, y: i32, event: PointerEvent) -> bool {
    let Some(hit) = hit_test(flow, view, x, y) else {
        return false;
    };
    match hit.slice.handler(event) {
        Some(handler) => handler(hit.slice, hit.local_x, hit.local_y),
        None => false,
    }
}

impl CachedFlow {
    /// Dispatch a click at `(x, y)`.
    pub fn click(&self, view: &FlowView, x: i32, y: i32) -> bool {
        dispatch(self, view, x, y, PointerEvent::Click)
    }

    /// Dispatch a right click at `(x, y)`.
    pub fn right_click(&self, view: &FlowView, x: i32, y: i32) -> bool {
        dispatch(self, view, x, y, PointerEvent::RightClick)
    }

    /// Dispatch a hover at `(x, y)`.
    pub fn hover(&self, view: &FlowView, x: i32, y: i32) -> bool {
        dispatch(self, view, x, y, PointerEvent::Hover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::flow::calculate_flow;
    use crate::font::MonospaceFont;
    use crate::geometry::Offset;
    use crate::node::Node;
    use crate::style::Alignment;

    #[test]
    fn hit_reports_slice_and_local_position() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("Hello "), Node::text("World")], &f, Some(100.0));
        let view = FlowView::at(Offset::new(10, 5));
        let hit = hit_test(&flow, &view, 17, 5).unwrap();
        assert_eq!(hit.slice.text(), Some("World"));
        assert_eq!((hit.local_x, hit.local_y), (1, 0));
        assert_eq!(hit.bounds, Region::new(16, 5, 5, 1));
        assert!(hit_test(&flow, &view, 9, 5).is_none());
        assert!(hit_test(&flow, &view, 12, 6).is_none());
    }

    #[test]
    fn scrolled_out_rows_do_not_hit() {
        let f = MonospaceFont::shared(1, 1.0, 4.0);
        let flow = calculate_flow(vec![Node::text("a\nb\nc")], &f, None);
        let view = FlowView::default().with_scroll_pixels(6.0).with_max_height(4);
        // line "b" starts at y = -2, so rows 0..2 belong to it.
        assert_eq!(hit_test(&flow, &view, 0, 0).unwrap().slice.text(), Some("b"));
        assert_eq!(hit_test(&flow, &view, 0, 0).unwrap().local_y, 2);
        assert_eq!(hit_test(&flow, &view, 0, 3).unwrap().slice.text(), Some("c"));
        assert!(hit_test(&flow, &view, 0, 4).is_none());
        assert!(hit_test(&flow, &view, 0, -1).is_none());
    }

    #[test]
    fn line_scroll_hits_by_line() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("a\nb\nc")], &f, None);
        let view = FlowView::default().with_scroll_lines(1);
        assert_eq!(hit_test(&flow, &view, 0, 0).unwrap().slice.text(), Some("b"));
        assert_eq!(hit_test(&flow, &view, 0, 1).unwrap().slice.text(), Some("c"));
    }

    #[test]
    fn aligned_slice_is_hit_at_its_aligned_position() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("ok").with_alignment(Alignment::RIGHT)], &f, Some(10.0));
        let view = FlowView::default().with_max_width(10.0);
        assert!(hit_test(&flow, &view, 0, 0).is_none());
        assert_eq!(hit_test(&flow, &view, 9, 0).unwrap().local_x, 1);
    }

    #[test]
    fn alignment_uses_layout_width_without_view_bound() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("ok").with_alignment(Alignment::RIGHT)], &f, Some(10.0));
        let view = FlowView::default();
        assert!(hit_test(&flow, &view, 0, 0).is_none());
        let hit = hit_test(&flow, &view, 9, 0).unwrap();
        assert_eq!(hit.local_x, 1);
        assert_eq!(hit.bounds, Region::new(8, 0, 2, 1));
    }

    #[test]
    fn dispatch_invokes_node_handler() {
        let f = MonospaceFont::terminal();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let node = Node::text("link").on_click(move |slice, x, y| {
            log.borrow_mut().push((slice.text().unwrap_or_default().to_owned(), x, y));
            true
        });
        let flow = calculate_flow(vec![Node::text("go "), node], &f, None);
        let view = FlowView::default();

        assert!(flow.click(&view, 5, 0));
        assert!(!flow.click(&view, 1, 0));
        assert!(!flow.right_click(&view, 5, 0));
        assert_eq!(*seen.borrow(), vec![("link".to_owned(), 2, 0)]);
    }

    #[test]
    fn dispatch_falls_back_to_group_handler() {
        let f = MonospaceFont::terminal();
        let hovered = Rc::new(Cell::new(0));
        let count = Rc::clone(&hovered);
        let group = Node::group(vec![Node::text("ab"), Node::text("cd")]).on_hover(move |_, _, _| {
            count.set(count.get() + 1);
            true
        });
        let flow = calculate_flow(vec![group], &f, None);
        let view = FlowView::default();
        assert!(flow.hover(&view, 0, 0));
        assert!(flow.hover(&view, 3, 0));
        assert!(!flow.hover(&view, 4, 0));
        assert_eq!(hovered.get(), 2);
    }

    #[test]
    fn right_click_reaches_group_handler() {
        let f = MonospaceFont::terminal();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let group = Node::group(vec![Node::text("ab"), Node::text("cd")]).on_right_click(move |slice, x, y| {
            log.borrow_mut().push((slice.text().unwrap_or_default().to_owned(), x, y));
            true
        });
        let flow = calculate_flow(vec![Node::text("x "), group], &f, None);
        let view = FlowView::at(Offset::new(0, 3));

        assert!(flow.right_click(&view, 5, 3));
        assert!(flow.right_click(&view, 2, 3));
        assert!(!flow.right_click(&view, 0, 3));
        assert!(!flow.click(&view, 5, 3));
        assert_eq!(*seen.borrow(), vec![("cd".to_owned(), 1, 0), ("ab".to_owned(), 0, 0)]);
    }

    #[test]
    fn handler_can_decline() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("x").on_click(|_, _, _| false)], &f, None);
        assert!(!dispatch(&flow, &FlowView::default(), 0, 0, PointerEvent::Click));
    }
}
