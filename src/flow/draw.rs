//! Drawing a flow onto a [`Surface`].
//!
//! Placement comes from the shared walk, so whatever is drawn at a pixel is
//! exactly what hit-testing reports there.

use std::ops::ControlFlow;
use std::rc::Rc;

use crate::config::FlowConfig;
use crate::font::{Font, FontRef};
use crate::geometry::Offset;
use crate::node::Node;
use crate::render::{Surface, TextRun};
use crate::style::{Color, StyleFlags, TextStyle, PRISMATIC_PALETTE};

use super::layout::{calculate_flow_with, CachedFlow, FlowSource};
use super::walk::{walk_flow, FlowView, PlacedSlice};

// ---------------------------------------------------------------------------
// DrawContext
// ---------------------------------------------------------------------------

/// Per-call drawing defaults.
///
/// `color` and `shadow_color` apply to runs that do not set their own; when
/// unset too, the config defaults are used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawContext {
    pub config: FlowConfig,
    pub color: Option<Color>,
    pub shadow_color: Option<Color>,
}

impl DrawContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for layout and defaults (builder).
    pub fn with_config(mut self, config: FlowConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the fallback text color (builder).
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the fallback shadow color (builder).
    pub fn with_shadow_color(mut self, color: Color) -> Self {
        self.shadow_color = Some(color);
        self
    }

    fn text_color(&self, style: &TextStyle) -> Color {
        style.color.or(self.color).unwrap_or(self.config.default_color)
    }

    fn shadow_color(&self, style: &TextStyle) -> Option<Color> {
        style.shadow_color.or(self.shadow_color).or(self.config.default_shadow_color)
    }
}

// ---------------------------------------------------------------------------
// draw_flow
// ---------------------------------------------------------------------------

/// Lay out `source` (reusing a matching cache) and draw it.
///
/// Returns the flow that was drawn so callers can keep it for the next frame
/// and for hit-testing.
pub fn draw_flow(
    source: impl Into<FlowSource>,
    surface: &mut dyn Surface,
    font: &FontRef,
    view: &FlowView,
    ctx: &DrawContext,
) -> Rc<CachedFlow> {
    let flow = calculate_flow_with(source, font, view.max_width, &ctx.config);
    let scale = view.effective_scale();
    let mut drawn = 0usize;
    walk_flow(&flow, view, false, |placed| {
        if placed.is_visible() {
            draw_slice(&placed, surface, font.as_ref(), scale, ctx);
            drawn += 1;
        }
        ControlFlow::Continue(())
    });
    tracing::trace!(slices = drawn, lines = flow.lines.len(), "drew flow");
    flow
}

/// Draw one placed slice. Nothing is drawn outside `placed.visible`.
pub fn draw_slice(
    placed: &PlacedSlice<'_>,
    surface: &mut dyn Surface,
    font: &dyn Font,
    scale: f32,
    ctx: &DrawContext,
) {
    let bounds = placed.bounds;
    let clip = placed.visible;
    match placed.slice.node.as_ref() {
        Node::Text(text) => {
            let Some(content) = placed.slice.text() else {
                return;
            };
            if content.is_empty() {
                return;
            }
            let style = &text.style;
            let mut run = TextRun {
                text: content,
                origin: bounds.offset(),
                clip,
                font: style.font.as_deref().unwrap_or(font),
                scale: scale * style.effective_scale(),
                color: ctx.text_color(style),
                background: style.background,
                flags: style.flags,
            };
            if style.has(StyleFlags::INVERT) {
                let fg = run.background.unwrap_or(Color::BLACK);
                run.background = Some(run.color);
                run.color = fg;
            }
            if style.has(StyleFlags::SHADOW) {
                if let Some(shadow) = ctx.shadow_color(style) {
                    let offset = ctx.config.shadow_offset;
                    surface.draw_text(&TextRun {
                        origin: run.origin + Offset::new(offset, offset),
                        color: shadow,
                        background: None,
                        ..run
                    });
                }
            }
            if style.has(StyleFlags::PRISMATIC) {
                draw_prismatic(surface, &run);
            } else {
                surface.draw_text(&run);
            }
        }
        Node::Sprite(sprite) => {
            surface.draw_sprite(sprite.sprite, sprite.frame_source(), bounds, clip);
        }
        Node::Divider(divider) => {
            let color = divider.color.or(ctx.color).unwrap_or(ctx.config.default_color);
            surface.draw_rule(bounds, color, clip);
        }
        Node::Component(component) => {
            surface.draw_component(bounds, clip);
            if let Some(draw) = &component.draw {
                draw(surface, bounds);
            }
        }
        // Groups never own a slice directly.
        Node::Group(_) => {}
    }
}

/// One draw call per character, cycling the palette.
fn draw_prismatic(surface: &mut dyn Surface, run: &TextRun<'_>) {
    for (n, (index, ch)) in run.text.char_indices().enumerate() {
        let end = index + ch.len_utf8();
        surface.draw_text(&TextRun {
            text: &run.text[index..end],
            origin: Offset::new(run.glyph_x(index), run.origin.y),
            color: PRISMATIC_PALETTE[n % PRISMATIC_PALETTE.len()],
            ..*run
        });
    }
}

// ===========================================================================
// Tests
// ===========================================================================
