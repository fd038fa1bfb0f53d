//! Incremental construction of node sequences.
//!
//! `FlowBuilder` keeps an explicit stack of open group frames; closing a
//! frame wraps its children in a [`Node::Group`] and appends it to the parent.
//! Markup added through [`FlowBuilder::formatted`] carries its style and
//! alignment from one call to the next.

use std::rc::Rc;

use crate::flow::{calculate_flow_with, CachedFlow};
use crate::config::FlowConfig;
use crate::font::FontRef;
use crate::geometry::Region;
use crate::markup::{format_text_with, translate_with, FormatOptions, Formatted, TemplateValues};
use crate::node::{Handlers, Node, SpriteId};
use crate::style::{Alignment, TextStyle};

/// An open group.
#[derive(Default)]
struct Frame {
    alignment: Alignment,
    handlers: Handlers,
    children: Vec<Node>,
}

/// Builds a node sequence.
pub struct FlowBuilder<'a> {
    /// `frames[0]` is the root and is never closed.
    frames: Vec<Frame>,
    style: TextStyle,
    alignment: Alignment,
    options: FormatOptions<'a>,
}

impl Default for FlowBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FlowBuilder<'a> {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
            style: TextStyle::default(),
            alignment: Alignment::empty(),
            options: FormatOptions::default(),
        }
    }

    /// Use `options` (font aliases, handlers) for markup (builder).
    pub fn with_options(mut self, options: FormatOptions<'a>) -> Self {
        self.options = options;
        self
    }

    /// Start markup from `style` (builder).
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// The style markup will continue from.
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// The alignment markup will continue from.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Number of groups currently open.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    // -- content -----------------------------------------------------------

    /// Append any node.
    pub fn node(&mut self, node: Node) -> &mut Self {
        self.current().children.push(node);
        self
    }

    /// Append a plain text run, ignoring markup state.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.node(Node::text(text))
    }

    /// Append a text run in `style`.
    pub fn styled(&mut self, text: impl Into<String>, style: TextStyle) -> &mut Self {
        self.node(Node::styled(text, style))
    }

    /// Append markup, continuing from the state left by earlier markup.
    pub fn formatted(&mut self, markup: &str) -> &mut Self {
        let out = format_text_with(markup, self.style.clone(), self.alignment, &self.options);
        self.absorb(out)
    }

    /// Append a filled template, continuing markup state.
    pub fn translate(&mut self, template: &str, values: &TemplateValues) -> &mut Self {
        let out = translate_with(template, values, self.style.clone(), self.alignment, &self.options);
        self.absorb(out)
    }

    pub fn sprite(&mut self, sprite: SpriteId, source: Region) -> &mut Self {
        self.node(Node::sprite(sprite, source))
    }

    pub fn divider(&mut self) -> &mut Self {
        self.node(Node::divider())
    }

    pub fn component(&mut self, width: f32, height: f32) -> &mut Self {
        self.node(Node::component(width, height))
    }

    // -- groups ------------------------------------------------------------

    /// Open a group with `alignment`.
    pub fn group(&mut self, alignment: Alignment) -> &mut Self {
        self.group_with(alignment, Handlers::default())
    }

    /// Open a group with `alignment` and `handlers`.
    pub fn group_with(&mut self, alignment: Alignment, handlers: Handlers) -> &mut Self {
        self.frames.push(Frame { alignment, handlers, children: Vec::new() });
        self
    }

    /// Close the innermost open group. Ignored when none is open.
    pub fn end_group(&mut self) -> &mut Self {
        if self.frames.len() == 1 {
            tracing::warn!("end_group called with no open group");
            return self;
        }
        self.close_frame();
        self
    }

    /// Close any open groups and return the nodes.
    pub fn build(mut self) -> Vec<Node> {
        if self.frames.len() > 1 {
            tracing::debug!(open = self.frames.len() - 1, "closing unterminated groups");
        }
        while self.frames.len() > 1 {
            self.close_frame();
        }
        self.frames.pop().map(|root| root.children).unwrap_or_default()
    }

    /// Build and lay out in one step.
    pub fn build_flow(self, font: &FontRef, max_width: Option<f32>, config: &FlowConfig) -> Rc<CachedFlow> {
        calculate_flow_with(self.build(), font, max_width, config)
    }

    fn absorb(&mut self, out: Formatted) -> &mut Self {
        self.style = out.style;
        self.alignment = out.alignment;
        self.current().children.extend(out.nodes);
        self
    }

    fn close_frame(&mut self) {
        if let Some(frame) = self.frames.pop() {
            let group = Node::group(frame.children)
                .with_alignment(frame.alignment)
                .with_handlers(frame.handlers);
            self.current().children.push(group);
        }
    }

    fn current(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::default());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::MonospaceFont;
    use crate::style::StyleFlags;
    use pretty_assertions::assert_eq;

    #[test]
    fn flat_content_in_order() {
        let mut b = FlowBuilder::new();
        b.text("a").divider().component(2.0, 2.0).sprite(SpriteId(1), Region::new(0, 0, 4, 4));
        let nodes = b.build();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].as_text(), Some("a"));
        assert!(matches!(nodes[1], Node::Divider(_)));
        assert!(matches!(nodes[2], Node::Component(_)));
        assert!(matches!(nodes[3], Node::Sprite(_)));
    }

    #[test]
    fn groups_nest() {
        let mut b = FlowBuilder::new();
        b.text("before")
            .group(Alignment::RIGHT)
            .text("in")
            .group(Alignment::BOTTOM)
            .text("deep")
            .end_group()
            .end_group()
            .text("after");
        let nodes = b.build();
        assert_eq!(nodes.len(), 3);
        let Node::Group(outer) = &nodes[1] else { panic!("expected group") };
        assert_eq!(outer.attrs.alignment, Alignment::RIGHT);
        assert_eq!(outer.children.len(), 2);
        let Node::Group(inner) = outer.children[1].as_ref() else { panic!("expected group") };
        assert_eq!(inner.attrs.alignment, Alignment::BOTTOM);
        assert_eq!(inner.children[0].as_text(), Some("deep"));
    }

    #[test]
    fn unbalanced_end_group_is_ignored() {
        let mut b = FlowBuilder::new();
        b.end_group().text("x").end_group();
        assert_eq!(b.depth(), 0);
        assert_eq!(b.build().len(), 1);
    }

    #[test]
    fn build_closes_open_groups() {
        let mut b = FlowBuilder::new();
        b.group(Alignment::CENTER).text("a").group(Alignment::empty()).text("b");
        assert_eq!(b.depth(), 2);
        let nodes = b.build();
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], Node::Group(g) if g.children.len() == 2));
    }

    #[test]
    fn markup_state_carries_across_calls() {
        let mut b = FlowBuilder::new();
        b.formatted("@Bbold ").formatted("still@B plain");
        assert!(!b.style().has(StyleFlags::BOLD));
        let nodes = b.build();
        let bold: Vec<(String, bool)> = nodes
            .iter()
            .map(|n| match n {
                Node::Text(t) => (t.text.clone(), t.style.has(StyleFlags::BOLD)),
                _ => (String::new(), false),
            })
            .collect();
        assert_eq!(
            bold,
            vec![("bold ".to_owned(), true), ("still".to_owned(), true), (" plain".to_owned(), false)]
        );
    }

    #[test]
    fn translate_appends_nodes() {
        let mut values = TemplateValues::new();
        values.insert("n".into(), "3".into());
        let mut b = FlowBuilder::new();
        b.translate("x{{n}}y", &values);
        let texts: Vec<String> = b.build().iter().filter_map(|n| n.as_text().map(str::to_owned)).collect();
        assert_eq!(texts, vec!["x", "3", "y"]);
    }

    #[test]
    fn group_handlers_apply_to_the_group() {
        let handlers = Node::text("").on_click(|_, _, _| true).handlers().clone();
        let mut b = FlowBuilder::new();
        b.group_with(Alignment::empty(), handlers).text("a").end_group();
        let nodes = b.build();
        assert!(nodes[0].is_interactive());
    }

    #[test]
    fn build_flow_lays_out() {
        let f = MonospaceFont::terminal();
        let mut b = FlowBuilder::new();
        b.text("hello world");
        let flow = b.build_flow(&f, Some(6.0), &FlowConfig::default());
        assert_eq!(flow.line_count(), 2);
    }
}
