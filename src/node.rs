//! Node model: the content units a flow is built from.
//!
//! [`Node`] is a closed enum; every variant carries [`NodeAttrs`] (alignment,
//! pointer handlers, hit-target options). Nodes are immutable once handed to
//! layout and are shared through `Rc` so slices can point back at them.

use std::fmt;
use std::rc::Rc;

use crate::geometry::Region;
use crate::render::Surface;
use crate::slice::Slice;
use crate::style::{Alignment, Color, TextStyle};

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// A pointer handler. Receives the slice under the pointer and the
/// pointer position relative to that slice's top-left corner. Returns whether
/// the event was consumed.
pub type Handler = Rc<dyn Fn(&Slice, i32, i32) -> bool>;

/// Caller draw callback for [`ComponentNode`]s: receives the surface and the
/// slice's resolved screen rectangle.
pub type ComponentDraw = Rc<dyn Fn(&mut dyn Surface, Region)>;

/// The kinds of pointer event a node can handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    Click,
    RightClick,
    Hover,
}

/// Optional pointer handlers attached to a node.
#[derive(Clone, Default)]
pub struct Handlers {
    pub on_click: Option<Handler>,
    pub on_hover: Option<Handler>,
    pub on_right_click: Option<Handler>,
}

impl Handlers {
    /// Whether no handler is set.
    pub fn is_empty(&self) -> bool {
        self.on_click.is_none() && self.on_hover.is_none() && self.on_right_click.is_none()
    }

    /// The handler for `event`, if any.
    pub fn get(&self, event: PointerEvent) -> Option<&Handler> {
        match event {
            PointerEvent::Click => self.on_click.as_ref(),
            PointerEvent::RightClick => self.on_right_click.as_ref(),
            PointerEvent::Hover => self.on_hover.as_ref(),
        }
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("on_click", &self.on_click.is_some())
            .field("on_hover", &self.on_hover.is_some())
            .field("on_right_click", &self.on_right_click.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// NodeAttrs
// ---------------------------------------------------------------------------

/// Handle to a caller-owned hit target that is already positioned by the
/// host. Nodes carrying one never get a pooled record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExternalTarget(pub u64);

/// Attributes shared by every node variant.
#[derive(Clone, Debug, Default)]
pub struct NodeAttrs {
    pub alignment: Alignment,
    pub handlers: Handlers,
    /// Handlers still fire through hit-testing, but no pooled hit target is
    /// allocated for this node.
    pub suppress_hit_target: bool,
    pub external_hit_target: Option<ExternalTarget>,
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// A run of styled text.
#[derive(Clone, Debug)]
pub struct TextNode {
    pub text: String,
    pub style: TextStyle,
    pub attrs: NodeAttrs,
}

/// Image handle understood by the host's [`Surface`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u32);

/// An image drawn from a source rectangle of a sprite sheet.
#[derive(Clone, Debug)]
pub struct SpriteNode {
    pub sprite: SpriteId,
    /// Source rectangle of frame 0.
    pub source: Region,
    pub scale: f32,
    /// Animation frame; frame `n` is `n` source widths to the right of frame 0.
    pub frame: Option<u32>,
    pub attrs: NodeAttrs,
}

impl SpriteNode {
    /// The source rectangle for the current frame. Offsets past the
    /// coordinate range saturate.
    pub fn frame_source(&self) -> Region {
        match self.frame {
            Some(frame) => {
                let frame = i32::try_from(frame).unwrap_or(i32::MAX);
                Region {
                    x: self.source.x.saturating_add(self.source.width.saturating_mul(frame)),
                    ..self.source
                }
            }
            None => self.source,
        }
    }

    pub(crate) fn effective_scale(&self) -> f32 {
        if self.scale > 0.0 && self.scale.is_finite() {
            self.scale
        } else {
            1.0
        }
    }
}

/// A horizontal rule occupying a whole line.
#[derive(Clone, Debug, Default)]
pub struct DividerNode {
    /// Height override; `None` uses [`crate::FlowConfig::divider_height`].
    pub height: Option<f32>,
    pub color: Option<Color>,
    pub attrs: NodeAttrs,
}

/// A fixed-size box whose content the caller draws.
#[derive(Clone)]
pub struct ComponentNode {
    pub width: f32,
    pub height: f32,
    pub draw: Option<ComponentDraw>,
    pub attrs: NodeAttrs,
}

impl fmt::Debug for ComponentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentNode")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("draw", &self.draw.is_some())
            .field("attrs", &self.attrs)
            .finish()
    }
}

/// An ordered list of children sharing an alignment and handler scope.
///
/// Children without alignment inherit the group's; children without handlers
/// dispatch pointer events to the innermost group that has them.
#[derive(Clone, Debug, Default)]
pub struct GroupNode {
    pub children: Vec<Rc<Node>>,
    pub attrs: NodeAttrs,
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One unit of flow content.
#[derive(Clone, Debug)]
pub enum Node {
    Text(TextNode),
    Sprite(SpriteNode),
    Divider(DividerNode),
    Component(ComponentNode),
    Group(GroupNode),
}

impl Node {
    /// A text run with the default style.
    pub fn text(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::default())
    }

    /// A text run with an explicit style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Node::Text(TextNode { text: text.into(), style, attrs: NodeAttrs::default() })
    }

    /// A sprite drawn at scale 1.
    pub fn sprite(sprite: SpriteId, source: Region) -> Self {
        Node::Sprite(SpriteNode { sprite, source, scale: 1.0, frame: None, attrs: NodeAttrs::default() })
    }

    /// A divider using the configured height.
    pub fn divider() -> Self {
        Node::Divider(DividerNode::default())
    }

    /// A component box of the given layout size.
    pub fn component(width: f32, height: f32) -> Self {
        Node::Component(ComponentNode { width, height, draw: None, attrs: NodeAttrs::default() })
    }

    /// A group of children.
    pub fn group(children: impl IntoIterator<Item = Node>) -> Self {
        Node::Group(GroupNode {
            children: children.into_iter().map(Rc::new).collect(),
            attrs: NodeAttrs::default(),
        })
    }

    /// Shared attributes.
    pub fn attrs(&self) -> &NodeAttrs {
        match self {
            Node::Text(n) => &n.attrs,
            Node::Sprite(n) => &n.attrs,
            Node::Divider(n) => &n.attrs,
            Node::Component(n) => &n.attrs,
            Node::Group(n) => &n.attrs,
        }
    }

    /// Mutable shared attributes.
    pub fn attrs_mut(&mut self) -> &mut NodeAttrs {
        match self {
            Node::Text(n) => &mut n.attrs,
            Node::Sprite(n) => &mut n.attrs,
            Node::Divider(n) => &mut n.attrs,
            Node::Component(n) => &mut n.attrs,
            Node::Group(n) => &mut n.attrs,
        }
    }

    /// The node's own alignment.
    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.attrs().alignment
    }

    /// The node's own handlers.
    #[inline]
    pub fn handlers(&self) -> &Handlers {
        &self.attrs().handlers
    }

    /// Whether any pointer handler is attached.
    #[inline]
    pub fn is_interactive(&self) -> bool {
        !self.attrs().handlers.is_empty()
    }

    /// Text content, for text runs.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(n) => Some(&n.text),
            _ => None,
        }
    }

    /// Whether the node contributes nothing to layout.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Text(n) => n.text.is_empty(),
            Node::Sprite(n) => n.source.is_empty(),
            Node::Divider(_) => false,
            Node::Component(n) => n.width <= 0.0 && n.height <= 0.0,
            Node::Group(n) => n.children.iter().all(|c| c.is_empty()),
        }
    }

    // -- builder-style attribute setters ------------------------------------

    /// Set the alignment (builder).
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.attrs_mut().alignment = alignment;
        self
    }

    /// Replace all handlers (builder).
    pub fn with_handlers(mut self, handlers: Handlers) -> Self {
        self.attrs_mut().handlers = handlers;
        self
    }

    /// Set the click handler (builder).
    pub fn on_click(mut self, f: impl Fn(&Slice, i32, i32) -> bool + 'static) -> Self {
        self.attrs_mut().handlers.on_click = Some(Rc::new(f));
        self
    }

    /// Set the hover handler (builder).
    pub fn on_hover(mut self, f: impl Fn(&Slice, i32, i32) -> bool + 'static) -> Self {
        self.attrs_mut().handlers.on_hover = Some(Rc::new(f));
        self
    }

    /// Set the right-click handler (builder).
    pub fn on_right_click(mut self, f: impl Fn(&Slice, i32, i32) -> bool + 'static) -> Self {
        self.attrs_mut().handlers.on_right_click = Some(Rc::new(f));
        self
    }

    /// Keep handlers but never allocate a pooled hit target (builder).
    pub fn suppress_hit_target(mut self) -> Self {
        self.attrs_mut().suppress_hit_target = true;
        self
    }

    /// Attach a caller-owned hit target (builder).
    pub fn with_external_target(mut self, target: ExternalTarget) -> Self {
        self.attrs_mut().external_hit_target = Some(target);
        self
    }

    /// Set the animation frame of a sprite (builder). No-op for other variants.
    pub fn with_frame(mut self, frame: u32) -> Self {
        if let Node::Sprite(s) = &mut self {
            s.frame = Some(frame);
        }
        self
    }

    /// Set the draw scale of a sprite (builder). No-op for other variants.
    pub fn with_sprite_scale(mut self, scale: f32) -> Self {
        if let Node::Sprite(s) = &mut self {
            s.scale = scale;
        }
        self
    }

    /// Set the draw callback of a component (builder). No-op for other variants.
    pub fn with_draw(mut self, f: impl Fn(&mut dyn Surface, Region) + 'static) -> Self {
        if let Node::Component(c) = &mut self {
            c.draw = Some(Rc::new(f));
        }
        self
    }
}
