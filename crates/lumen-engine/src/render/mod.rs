//! GPU rendering subsystem.
//!
//! Programs and meshes record GL-style commands (use, set uniform, draw)
//! into a `scene::DrawList`; the [`Renderer`] owns them and replays the list
//! into a wgpu render pass. Each program owns its pipelines and uniform
//! buffer, created the first time it is submitted.
//!
//! Convention:
//! - World space is right-handed, +Y up.
//! - Clip space depth is [0, 1]; depth test is less-or-equal.

pub mod camera;
pub mod config;
mod ctx;
pub mod light;
pub mod mesh;
mod pipeline;
pub mod presets;
pub mod program;
pub mod renderer;
pub mod vertex;

pub use camera::{Camera, PanDirection};
pub use config::{MeshData, ProgramConfig, SceneConfig};
pub use ctx::{RenderCtx, RenderTarget};
pub use light::Light;
pub use mesh::{MeshArrays, MeshBuffer};
pub use program::{Program, ProgramState, ShaderSource, ShaderStage, UniformLocation};
pub use renderer::{Renderer, SceneKeys};
pub use vertex::{Vertex, VertexField, VertexLayout};
