//! Per-frame rendering handles.
//!
//! Renderers receive a [`RenderCtx`] and [`RenderTarget`] from the window
//! system for the frame being recorded; the engine never issues draw calls itself.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
