//! Headless testing helpers.
//!
//! Use [`render_to_string`] and related helpers to capture flow output as
//! plain text for snapshot-style assertions.

pub mod snapshot;

pub use snapshot::{render_to_string, render_view_to_string, surface_to_string};
