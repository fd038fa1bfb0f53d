//! # richflow
//!
//! A rich-text flow layout and hit-testing engine for UI panels.
//!
//! Give it an ordered sequence of heterogeneous [`Node`]s (styled text runs,
//! sprites, dividers, caller-drawn components, nested groups), a font and a
//! maximum width, and it produces wrapped lines, draws them, answers "what is
//! under this pixel", and keeps a pool of caller-owned hit targets in step
//! with the layout from frame to frame. Layouts are memoized by
//! `(font, max width)` so unchanged content is never re-wrapped.
//!
//! ## Core Systems
//!
//! - **[`node`]**: The node model and pointer handlers
//! - **[`slice`]**: Fitting a node against the width left on a line
//! - **[`flow`]**: Layout, alignment, pixel/line scrolling, hit-testing, drawing
//! - **[`reconcile`]**: Slotmap-backed hit-target pool
//! - **[`markup`]**: `@`-code inline markup and `{{name}}` templates
//! - **[`builder`]**: Frame-stack construction of node sequences
//! - **[`render`]**: The `Surface` trait, terminal cell grid, crossterm driver, display list
//! - **[`style`]**, **[`font`]**, **[`config`]**, **[`geometry`]**: Supporting types
//!
//! ## Example
//!
//! ```ignore
//! use richflow::{calculate_flow, FlowView, MonospaceFont, Node};
//!
//! let font = MonospaceFont::terminal();
//! let flow = calculate_flow(vec![Node::text("Hello "), Node::text("World")], &font, Some(40.0));
//! let hit = richflow::hit_test(&flow, &FlowView::default(), 7, 0).unwrap();
//! assert_eq!(hit.slice.text(), Some("World"));
//! ```

// Foundation
pub mod config;
pub mod error;
pub mod font;
pub mod geometry;
pub mod style;

// Content model
pub mod node;
pub mod slice;

// Engine
pub mod flow;
pub mod reconcile;

// Content construction
pub mod builder;
pub mod markup;

// Rendering
pub mod render;

// Test helpers
pub mod testing;

pub use builder::FlowBuilder;
pub use config::FlowConfig;
pub use error::{ColorParseError, MarkupError};
pub use flow::{
    calculate_flow, calculate_flow_with, dispatch, draw_flow, hit_test, CachedFlow, CachedFlowLine,
    DrawContext, FlowSource, FlowView, Hit, Scroll,
};
pub use font::{Font, FontId, FontRef, FontRegistry, MonospaceFont};
pub use geometry::{Offset, Region, Size};
pub use markup::{format_text, format_text_strict, format_text_with, translate, FormatOptions, Formatted, TemplateValue};
pub use node::{ExternalTarget, Handlers, Node, PointerEvent, SpriteId};
pub use reconcile::{HitRegion, HitTarget, HitTargetId, HitTargetPool, ReconcileReport};
pub use render::Surface;
pub use slice::{Slice, WrapMode};
pub use style::{Alignment, Color, StyleFlags, TextStyle};
