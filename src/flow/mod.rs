//! Flow engine: layout, alignment, the shared placement walk, hit-testing and
//! drawing.

mod align;
pub mod draw;
pub mod hit;
pub mod layout;
pub mod walk;

pub use draw::{draw_flow, draw_slice, DrawContext};
pub use hit::{dispatch, hit_test, Hit};
pub use layout::{calculate_flow, calculate_flow_with, CachedFlow, CachedFlowLine, FlowSource};
pub use walk::{walk_flow, FlowView, PlacedSlice, Scroll};
