//! Greedy line breaking: node sequence → [`CachedFlow`].
//!
//! One left-to-right pass, no backtracking. Results are memoized by the
//! `(font, max_width)` signature: asking for a layout of an existing
//! [`CachedFlow`] with the same signature returns it unchanged.

use std::rc::Rc;

use crate::config::FlowConfig;
use crate::font::{FontId, FontRef};
use crate::node::Node;
use crate::slice::{Slice, SliceContext};

// ---------------------------------------------------------------------------
// CachedFlowLine / CachedFlow
// ---------------------------------------------------------------------------

/// One laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedFlowLine {
    pub slices: Vec<Slice>,
    /// Sum of the slices' rounded-up widths.
    pub width: f32,
    /// Largest rounded-up slice height.
    pub height: f32,
}

/// The laid-out form of a node sequence at a given font and width.
///
/// Immutable once built; share it as `Rc<CachedFlow>` and replace it when the
/// content changes. The engine only checks the font/width signature, so
/// callers must discard a cached flow themselves when its nodes change.
#[derive(Debug)]
pub struct CachedFlow {
    pub nodes: Vec<Rc<Node>>,
    pub lines: Vec<CachedFlowLine>,
    pub width: f32,
    pub height: f32,
    pub font_signature: FontId,
    pub max_width_signature: Option<f32>,
}

impl CachedFlow {
    /// Whether this flow was computed for `font` and `max_width`.
    pub fn matches(&self, font: FontId, max_width: Option<f32>) -> bool {
        self.font_signature == font && self.max_width_signature == max_width
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether layout produced no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All slices in layout order.
    pub fn slices(&self) -> impl Iterator<Item = &Slice> {
        self.lines.iter().flat_map(|line| line.slices.iter())
    }

    /// Index of the line containing the `offset`-th pixel row at `scale`, or
    /// `None` past the end. Useful for converting a pixel scroll position
    /// into a line scroll position.
    pub fn line_at_height(&self, offset: f32, scale: f32) -> Option<usize> {
        let mut y = 0.0;
        for (i, line) in self.lines.iter().enumerate() {
            y += line.height * scale;
            if offset < y {
                return Some(i);
            }
        }
        None
    }
}

impl PartialEq for CachedFlow {
    /// Structural equality of the laid-out lines and signatures.
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines
            && self.width == other.width
            && self.height == other.height
            && self.font_signature == other.font_signature
            && self.max_width_signature == other.max_width_signature
    }
}

// ---------------------------------------------------------------------------
// FlowSource
// ---------------------------------------------------------------------------

/// Input to layout: raw nodes, or a previous result to revalidate.
#[derive(Debug, Clone)]
pub enum FlowSource {
    Nodes(Vec<Rc<Node>>),
    Cached(Rc<CachedFlow>),
}

impl From<Vec<Node>> for FlowSource {
    fn from(nodes: Vec<Node>) -> Self {
        FlowSource::Nodes(nodes.into_iter().map(Rc::new).collect())
    }
}

impl From<Vec<Rc<Node>>> for FlowSource {
    fn from(nodes: Vec<Rc<Node>>) -> Self {
        FlowSource::Nodes(nodes)
    }
}

impl From<Node> for FlowSource {
    fn from(node: Node) -> Self {
        FlowSource::Nodes(vec![Rc::new(node)])
    }
}

impl From<Rc<CachedFlow>> for FlowSource {
    fn from(flow: Rc<CachedFlow>) -> Self {
        FlowSource::Cached(flow)
    }
}

impl From<&Rc<CachedFlow>> for FlowSource {
    fn from(flow: &Rc<CachedFlow>) -> Self {
        FlowSource::Cached(Rc::clone(flow))
    }
}

// ---------------------------------------------------------------------------
// calculate_flow
// ---------------------------------------------------------------------------

/// Lay out `source` with the default [`FlowConfig`].
pub fn calculate_flow(
    source: impl Into<FlowSource>,
    font: &FontRef,
    max_width: Option<f32>,
) -> Rc<CachedFlow> {
    calculate_flow_with(source, font, max_width, &FlowConfig::default())
}

/// Lay out `source`, reusing a cached flow whose signature matches.
pub fn calculate_flow_with(
    source: impl Into<FlowSource>,
    font: &FontRef,
    max_width: Option<f32>,
    config: &FlowConfig,
) -> Rc<CachedFlow> {
    let nodes = match source.into() {
        FlowSource::Cached(flow) if flow.matches(font.id(), max_width) => {
            tracing::trace!(lines = flow.lines.len(), "flow layout cache hit");
            return flow;
        }
        FlowSource::Cached(flow) => flow.nodes.clone(),
        FlowSource::Nodes(nodes) => nodes,
    };
    Rc::new(layout(nodes, font, max_width, config))
}

/// Accumulates slices for the line under construction.
#[derive(Default)]
struct LineAccumulator {
    lines: Vec<CachedFlowLine>,
    slices: Vec<Slice>,
    line_width: f32,
    line_height: f32,
    width: f32,
    height: f32,
}

impl LineAccumulator {
    fn push(&mut self, slice: Slice) {
        self.line_width += slice.width.ceil();
        self.line_height = self.line_height.max(slice.height.ceil());
        self.slices.push(slice);
    }

    fn flush(&mut self) {
        if self.slices.is_empty() {
            return;
        }
        self.width = self.width.max(self.line_width);
        self.height += self.line_height;
        self.lines.push(CachedFlowLine {
            slices: std::mem::take(&mut self.slices),
            width: self.line_width,
            height: self.line_height,
        });
        self.line_width = 0.0;
        self.line_height = 0.0;
    }
}

fn layout(nodes: Vec<Rc<Node>>, font: &FontRef, max_width: Option<f32>, config: &FlowConfig) -> CachedFlow {
    let bound = match max_width {
        Some(w) if w.is_finite() => w.max(0.0),
        _ => f32::INFINITY,
    };
    let ctx = SliceContext { font: font.as_ref(), config };

    let mut acc = LineAccumulator::default();
    let mut force_new_line = false;

    for node in nodes.iter().filter(|n| !n.is_empty()) {
        let mut previous: Option<Slice> = None;
        loop {
            let remaining = if force_new_line { bound } else { bound - acc.line_width };
            let Some(slice) = node.slice(previous.as_ref(), &ctx, bound, remaining) else {
                break;
            };

            let overflows = acc.line_width > 0.0 && acc.line_width + slice.width >= bound;
            if force_new_line || overflows || slice.wrap.breaks_before() {
                acc.flush();
            }
            force_new_line = slice.wrap.breaks_after();
            acc.push(slice.clone());
            previous = Some(slice);
        }
    }
    acc.flush();

    tracing::debug!(
        nodes = nodes.len(),
        lines = acc.lines.len(),
        width = acc.width,
        height = acc.height,
        "computed flow layout"
    );

    CachedFlow {
        nodes,
        lines: acc.lines,
        width: acc.width,
        height: acc.height,
        font_signature: font.id(),
        max_width_signature: max_width,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{Font, MonospaceFont};
    use crate::geometry::Region;
    use crate::node::SpriteId;
    use crate::slice::WrapMode;
    use pretty_assertions::assert_eq;

    fn font() -> FontRef {
        MonospaceFont::shared(1, 8.0, 16.0)
    }

    fn line_texts(flow: &CachedFlow) -> Vec<String> {
        flow.lines
            .iter()
            .map(|l| l.slices.iter().filter_map(|s| s.text()).collect::<String>())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Basic scenarios
    // -----------------------------------------------------------------------

    #[test]
    fn two_runs_share_one_line() {
        let f = font();
        let flow = calculate_flow(vec![Node::text("Hello "), Node::text("World")], &f, Some(1000.0));
        assert_eq!(flow.line_count(), 1);
        assert_eq!(flow.lines[0].slices.len(), 2);
        assert_eq!(flow.lines[0].width, f.measure("Hello World"));
        assert_eq!(flow.width, 88.0);
        assert_eq!(flow.height, 16.0);
    }

    #[test]
    fn overlong_word_is_hard_broken_across_lines() {
        let f = font();
        let word = "SupercalifragilisticexpialidociousXXXXXXXXXX";
        let flow = calculate_flow(vec![Node::text(word)], &f, Some(50.0));
        assert!(flow.line_count() > 1);
        let joined: String = line_texts(&flow).concat();
        assert_eq!(joined, word);
        for line in &flow.lines {
            assert!(line.width <= 50.0);
        }
    }

    #[test]
    fn wraps_words_within_bound() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("the quick brown fox jumps")], &f, Some(10.0));
        assert_eq!(line_texts(&flow), vec!["the quick", "brown fox", "jumps"]);
        for line in &flow.lines {
            assert!(line.width <= 10.0);
        }
    }

    #[test]
    fn run_wrapped_to_next_line_drops_leading_blank() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("Hello"), Node::text(" World")], &f, Some(8.0));
        assert_eq!(line_texts(&flow), vec!["Hello", "World"]);
        assert_eq!(flow.lines[1].width, 5.0);
    }

    #[test]
    fn unbounded_never_wraps() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("a b c d e f g h i j k l m n o p")], &f, None);
        assert_eq!(flow.line_count(), 1);
    }

    #[test]
    fn empty_nodes_are_skipped() {
        let f = font();
        let flow = calculate_flow(vec![Node::text(""), Node::group(Vec::new())], &f, Some(100.0));
        assert!(flow.is_empty());
        assert_eq!(flow.width, 0.0);
        assert_eq!(flow.height, 0.0);
    }

    #[test]
    fn line_feed_starts_new_line_with_full_width() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("abcdefgh\n"), Node::text("ijkl mnop")], &f, Some(10.0));
        assert_eq!(line_texts(&flow), vec!["abcdefgh", "ijkl mnop"]);
    }

    #[test]
    fn blank_lines_keep_their_height() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("a\n\nb")], &f, Some(10.0));
        assert_eq!(line_texts(&flow), vec!["a", "", "b"]);
        assert_eq!(flow.height, 3.0);
    }

    #[test]
    fn divider_occupies_its_own_line() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(
            vec![Node::text("above"), Node::divider(), Node::text("below")],
            &f,
            Some(20.0),
        );
        assert_eq!(flow.line_count(), 3);
        assert_eq!(flow.lines[1].slices[0].wrap, WrapMode::Both);
        assert_eq!(flow.lines[1].width, 20.0);
    }

    #[test]
    fn atoms_wrap_when_they_do_not_fit() {
        let f = MonospaceFont::terminal();
        let icon = || Node::sprite(SpriteId(1), Region::new(0, 0, 4, 2));
        let flow = calculate_flow(vec![icon(), icon(), icon()], &f, Some(10.0));
        assert_eq!(flow.line_count(), 2);
        assert_eq!(flow.lines[0].slices.len(), 2);
        assert_eq!(flow.lines[0].height, 2.0);
    }

    #[test]
    fn line_height_is_max_of_slices() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(
            vec![Node::text("ab"), Node::component(3.0, 4.5)],
            &f,
            Some(100.0),
        );
        assert_eq!(flow.lines[0].height, 5.0);
        assert_eq!(flow.lines[0].width, 5.0);
    }

    // -----------------------------------------------------------------------
    // Memoization
    // -----------------------------------------------------------------------

    #[test]
    fn matching_signature_reuses_cached_flow() {
        let f = font();
        let first = calculate_flow(vec![Node::text("cache me")], &f, Some(100.0));
        let second = calculate_flow(&first, &f, Some(100.0));
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn width_change_recomputes_from_cached_nodes() {
        let f = MonospaceFont::terminal();
        let first = calculate_flow(vec![Node::text("aaa bbb")], &f, Some(100.0));
        let second = calculate_flow(&first, &f, Some(4.0));
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(second.line_count(), 2);
        assert!(Rc::ptr_eq(&first.nodes[0], &second.nodes[0]));
        assert!(second.matches(f.id(), Some(4.0)));
    }

    #[test]
    fn font_change_recomputes() {
        let small = MonospaceFont::shared(1, 1.0, 1.0);
        let large = MonospaceFont::shared(2, 2.0, 2.0);
        let first = calculate_flow(vec![Node::text("abc")], &small, None);
        let second = calculate_flow(&first, &large, None);
        assert_eq!(second.width, 6.0);
        assert_eq!(second.font_signature, large.id());
    }

    #[test]
    fn layout_is_deterministic() {
        let f = font();
        let nodes: Vec<Rc<Node>> = vec![
            Rc::new(Node::text("Some words to wrap around a little")),
            Rc::new(Node::sprite(SpriteId(2), Region::new(0, 0, 12, 12))),
            Rc::new(Node::text("and more")),
        ];
        let a = calculate_flow(nodes.clone(), &f, Some(90.0));
        let b = calculate_flow(nodes, &f, Some(90.0));
        assert_eq!(*a, *b);
    }

    #[test]
    fn line_at_height_maps_pixels_to_lines() {
        let f = MonospaceFont::terminal();
        let flow = calculate_flow(vec![Node::text("a\nb\nc")], &f, None);
        assert_eq!(flow.line_at_height(0.0, 1.0), Some(0));
        assert_eq!(flow.line_at_height(1.5, 1.0), Some(1));
        assert_eq!(flow.line_at_height(5.0, 2.0), Some(2));
        assert_eq!(flow.line_at_height(3.0, 1.0), None);
    }
}
