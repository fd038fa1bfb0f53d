//! Slicing: fitting a node against the width left on the current line.
//!
//! Layout calls [`Node::slice`] repeatedly, passing the previous slice of the
//! same node, until it returns `None`. Each call yields the next renderable
//! fragment. Text performs greedy word wrap; sprites, components and dividers
//! are atomic; groups delegate to their children in order.

use std::fmt;
use std::rc::Rc;

use crate::config::FlowConfig;
use crate::font::Font;
use crate::node::{Handler, Node, PointerEvent, TextNode};
use crate::style::Alignment;

// ---------------------------------------------------------------------------
// WrapMode
// ---------------------------------------------------------------------------

/// Forced line breaks around a slice.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    #[default]
    None,
    ForceBefore,
    ForceAfter,
    Both,
}

impl WrapMode {
    /// Whether a new line must start before this slice.
    #[inline]
    pub fn breaks_before(self) -> bool {
        matches!(self, WrapMode::ForceBefore | WrapMode::Both)
    }

    /// Whether a new line must start after this slice.
    #[inline]
    pub fn breaks_after(self) -> bool {
        matches!(self, WrapMode::ForceAfter | WrapMode::Both)
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Continuation state of a slice: how much of its node has been emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Cursor {
    /// Byte range of a text node covered by this slice.
    Text { start: usize, end: usize },
    /// The whole of an atomic node.
    Atom,
    /// A slice of the `child`-th child of a group.
    Group { child: usize, inner: Box<Cursor> },
}

// ---------------------------------------------------------------------------
// Slice
// ---------------------------------------------------------------------------

/// A renderable fragment of a node, fitted onto one line.
///
/// Dimensions are in layout units before draw scale. Slices are never
/// mutated after creation.
#[derive(Clone)]
pub struct Slice {
    /// The leaf node this fragment belongs to.
    pub node: Rc<Node>,
    /// Innermost group enclosing `node`, if any.
    pub group: Option<Rc<Node>>,
    pub width: f32,
    pub height: f32,
    /// Resolved alignment: the node's own, or the enclosing group's.
    pub alignment: Alignment,
    pub wrap: WrapMode,
    pub(crate) cursor: Cursor,
}

impl Slice {
    /// The text this slice draws, for text nodes. Line feeds are excluded.
    pub fn text(&self) -> Option<&str> {
        let text = self.node.as_text()?;
        let (start, end) = self.leaf_range()?;
        Some(text[start..end].trim_end_matches('\n'))
    }

    /// Byte range into the node's text covered by this slice.
    pub fn text_range(&self) -> Option<(usize, usize)> {
        self.node.as_text()?;
        self.leaf_range()
    }

    /// The handler for `event`: the node's own, else the enclosing group's.
    pub fn handler(&self, event: PointerEvent) -> Option<&Handler> {
        self.node
            .handlers()
            .get(event)
            .or_else(|| self.group.as_ref().and_then(|g| g.handlers().get(event)))
    }

    /// The node that owns this slice's interaction: the leaf if it has
    /// handlers, else the enclosing group if it does.
    pub fn interactive_node(&self) -> Option<&Rc<Node>> {
        if self.node.is_interactive() {
            Some(&self.node)
        } else {
            self.group.as_ref().filter(|g| g.is_interactive())
        }
    }

    fn leaf_range(&self) -> Option<(usize, usize)> {
        let mut cursor = &self.cursor;
        loop {
            match cursor {
                Cursor::Text { start, end } => return Some((*start, *end)),
                Cursor::Atom => return None,
                Cursor::Group { inner, .. } => cursor = inner,
            }
        }
    }
}

impl PartialEq for Slice {
    /// Structural equality: same node instance, same geometry and cursor.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
            && self.width == other.width
            && self.height == other.height
            && self.alignment == other.alignment
            && self.wrap == other.wrap
            && self.cursor == other.cursor
    }
}

impl fmt::Debug for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.node.as_ref() {
            Node::Text(_) => "Text",
            Node::Sprite(_) => "Sprite",
            Node::Divider(_) => "Divider",
            Node::Component(_) => "Component",
            Node::Group(_) => "Group",
        };
        let mut d = f.debug_struct("Slice");
        d.field("kind", &kind);
        if let Some(text) = self.text() {
            d.field("text", &text);
        }
        d.field("width", &self.width)
            .field("height", &self.height)
            .field("alignment", &self.alignment)
            .field("wrap", &self.wrap)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Slicing
// ---------------------------------------------------------------------------

/// Shared inputs to every slice call of one layout pass.
#[derive(Clone, Copy)]
pub struct SliceContext<'a> {
    /// The flow's font; text runs may override it.
    pub font: &'a dyn Font,
    pub config: &'a FlowConfig,
}

impl Node {
    /// Produce the next slice of this node.
    ///
    /// `total_width` is the full line width (`f32::INFINITY` when unbounded),
    /// `remaining_width` what is left on the current line. Returns `None`
    /// once the node is fully consumed.
    pub fn slice(
        self: &Rc<Self>,
        previous: Option<&Slice>,
        ctx: &SliceContext<'_>,
        total_width: f32,
        remaining_width: f32,
    ) -> Option<Slice> {
        slice_from(self, previous.map(|s| &s.cursor), ctx, total_width, remaining_width)
    }
}

fn slice_from(
    node: &Rc<Node>,
    previous: Option<&Cursor>,
    ctx: &SliceContext<'_>,
    total: f32,
    remaining: f32,
) -> Option<Slice> {
    let atom = |width: f32, height: f32, wrap: WrapMode| Slice {
        node: Rc::clone(node),
        group: None,
        width,
        height,
        alignment: node.alignment(),
        wrap,
        cursor: Cursor::Atom,
    };

    match node.as_ref() {
        Node::Text(text) => {
            let resume = match previous {
                Some(Cursor::Text { end, .. }) => Some(*end),
                _ => None,
            };
            let fragment = slice_text(text, resume, ctx, total, remaining)?;
            Some(Slice {
                node: Rc::clone(node),
                group: None,
                width: fragment.width,
                height: fragment.height,
                alignment: node.alignment(),
                wrap: fragment.wrap,
                cursor: Cursor::Text { start: fragment.start, end: fragment.end },
            })
        }
        Node::Sprite(sprite) => {
            if previous.is_some() {
                return None;
            }
            let scale = sprite.effective_scale();
            Some(atom(
                sprite.source.width as f32 * scale,
                sprite.source.height as f32 * scale,
                WrapMode::None,
            ))
        }
        Node::Component(component) => {
            if previous.is_some() {
                return None;
            }
            Some(atom(component.width.max(0.0), component.height.max(0.0), WrapMode::None))
        }
        Node::Divider(divider) => {
            if previous.is_some() {
                return None;
            }
            let width = if total.is_finite() { total } else { 0.0 };
            let height = divider.height.unwrap_or(ctx.config.divider_height).max(0.0);
            Some(atom(width, height, WrapMode::Both))
        }
        Node::Group(group) => {
            let (mut child, mut inner) = match previous {
                Some(Cursor::Group { child, inner }) => (*child, Some(inner.as_ref())),
                _ => (0, None),
            };
            while let Some(current) = group.children.get(child) {
                if !current.is_empty() {
                    if let Some(mut slice) = slice_from(current, inner, ctx, total, remaining) {
                        if slice.group.is_none() {
                            slice.group = Some(Rc::clone(node));
                        }
                        if slice.alignment.horizontal().is_empty() {
                            slice.alignment |= group.attrs.alignment.horizontal();
                        }
                        if slice.alignment.vertical().is_empty() {
                            slice.alignment |= group.attrs.alignment.vertical();
                        }
                        slice.cursor = Cursor::Group { child, inner: Box::new(slice.cursor) };
                        return Some(slice);
                    }
                }
                child += 1;
                inner = None;
            }
            None
        }
    }
}

/// One text fragment before it is wrapped into a [`Slice`].
struct TextFragment {
    start: usize,
    end: usize,
    width: f32,
    height: f32,
    wrap: WrapMode,
}

#[inline]
fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Greedy word wrap of `node.text` starting at byte `resume`, or at the
/// start for the first slice.
fn slice_text(
    node: &TextNode,
    resume: Option<usize>,
    ctx: &SliceContext<'_>,
    total: f32,
    remaining: f32,
) -> Option<TextFragment> {
    let text = node.text.as_str();
    let continued = resume.is_some();
    let resume = resume.unwrap_or(0);
    if resume >= text.len() {
        return None;
    }

    let font = node.style.font.as_deref().unwrap_or(ctx.font);
    let scale = node.style.effective_scale();
    let height = font.line_height() * scale;
    let measure = |s: &str| font.measure(s) * scale;
    let line_empty = remaining >= total;

    let mut start = resume;
    // A continuation opening a line was wrapped there; indentation after an
    // explicit line feed is kept.
    if line_empty && continued && !text[..start].ends_with('\n') && ctx.config.trim_wrapped_whitespace {
        let rest = &text[start..];
        start += rest.len() - rest.trim_start_matches(is_blank).len();
        if start >= text.len() {
            return None;
        }
    }

    let segment_end = text[start..].find('\n').map_or(text.len(), |i| start + i);
    if start == segment_end {
        // A bare line feed: end the current line.
        return Some(TextFragment { start, end: start + 1, width: 0.0, height, wrap: WrapMode::ForceAfter });
    }

    let fits = |w: f32| w < remaining || (line_empty && w <= total);

    let mut end = start;
    let mut width = 0.0;
    let mut pos = start;
    while pos < segment_end {
        let unit_end = next_word_end(text, pos, segment_end);
        let candidate = measure(&text[start..unit_end]);
        if fits(candidate) {
            end = unit_end;
            width = candidate;
        } else if text[pos..unit_end].chars().all(is_blank) {
            // Trailing whitespace hangs past the line end without width.
            end = unit_end;
        } else {
            break;
        }
        pos = unit_end;
    }

    if end == start {
        if !line_empty {
            return Some(TextFragment { start, end: start, width: 0.0, height, wrap: WrapMode::ForceBefore });
        }
        // Nothing fits even on an empty line: break by character. At least
        // one character is always taken so layout terminates.
        for (i, ch) in text[start..segment_end].char_indices() {
            let next = start + i + ch.len_utf8();
            let candidate = measure(&text[start..next]);
            if end > start && candidate > total {
                break;
            }
            end = next;
            width = candidate;
        }
    }

    let mut wrap = WrapMode::None;
    if end == segment_end && segment_end < text.len() {
        end += 1;
        wrap = WrapMode::ForceAfter;
    }

    Some(TextFragment { start, end, width, height, wrap })
}

/// End of the next wrap unit starting at `pos`: any leading blanks plus the
/// following word.
fn next_word_end(text: &str, pos: usize, limit: usize) -> usize {
    let segment = &text[pos..limit];
    let word_start = segment.len() - segment.trim_start_matches(is_blank).len();
    let word = &segment[word_start..];
    let word_len = word.find(is_blank).unwrap_or(word.len());
    pos + word_start + word_len
}

// ===========================================================================
// Tests
// ===========================================================================
