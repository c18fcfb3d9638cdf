//! Rendering abstractions
//!
//! The engine never rasterizes anything itself. Objects issue immediate-mode
//! calls against a [`Context`] supplied by the application.

pub mod context;

pub use context::{Context, SharedContext, DrawCall, ImageId, RecordingContext};
