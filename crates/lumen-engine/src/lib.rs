//! Lumen engine crate.
//!
//! A small forward renderer for lit, spinning meshes:
//! - `render`: programs (WGSL compiled and reflected with naga), mesh
//!   buffers, the FPS camera and the renderer that composes them
//! - `scene`: the CPU-side draw list the renderer replays on the GPU
//! - `error`: the injected error channel every GPU-facing object reports to
//! - `device`, `window`, `input`, `time`, `core`: the platform + GPU runtime

pub mod core;
pub mod device;
pub mod error;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;

pub use error::{ErrorKind, ErrorSink, GpuError};
