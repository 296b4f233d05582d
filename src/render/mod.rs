//! Overlay rasterization.

/// Per-instant subtitle overlay compositor.
pub mod compositor;
/// Rendered RGBA8 frames.
pub mod frame;
