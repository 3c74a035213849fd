//! Frame command stream.
//!
//! Responsibilities:
//! - record program activation, uniform writes and draws in submission order
//! - keep per-program uniform state between activations within one frame
//! - stay GPU-agnostic so recording can be inspected without a device
//!
//! `render::Renderer` replays a recorded [`DrawList`] into a wgpu render pass.

mod cmd;
mod key;
mod list;

pub use cmd::{DrawCall, DrawCmd, DrawMode};
pub use key::{MeshKey, ProgramKey};
pub use list::DrawList;
