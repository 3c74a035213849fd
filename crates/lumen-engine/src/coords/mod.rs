//! Pixel-space geometry shared by the window layer and the renderer.
//!
//! Physical pixels, origin top-left, +X right, +Y down.

mod viewport;

pub use viewport::Viewport;
