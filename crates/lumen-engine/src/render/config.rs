//! Data-driven scene description consumed by [`super::Renderer::init`].

use glam::Vec3;

use crate::error::ErrorSink;
use crate::paint::Color;
use crate::render::light::Light;
use crate::render::mesh::MeshArrays;
use crate::render::presets;
use crate::render::program::{Program, ShaderSource, ShaderStage};
use crate::scene::ProgramKey;

/// Declarations and sources for one program.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramConfig {
    pub label: String,
    pub attributes: Vec<String>,
    pub uniforms: Vec<String>,
    pub sources: Vec<ShaderSource>,
}

impl ProgramConfig {
    /// Phong-lit program: per-vertex color and normal, separate matrices.
    pub fn lit() -> Self {
        Self {
            label: "lit".into(),
            attributes: strings(&["aPos", "aColor", "aNormal"]),
            uniforms: strings(&["projection", "view", "model", "lightColor", "lightPos", "viewPos"]),
            sources: vec![
                ShaderSource::new(ShaderStage::Vertex, presets::LIT_UNIFORMS_WGSL),
                ShaderSource::new(ShaderStage::Vertex, presets::LIT_VERTEX_WGSL),
                ShaderSource::new(ShaderStage::Fragment, presets::LIT_UNIFORMS_WGSL),
                ShaderSource::new(ShaderStage::Fragment, presets::LIT_FRAGMENT_WGSL),
                ShaderSource::new(ShaderStage::Fragment, presets::LIGHTING_WGSL),
            ],
        }
    }

    /// Flat-colored marker program: position only, combined MVP.
    pub fn marker() -> Self {
        Self {
            label: "light marker".into(),
            attributes: strings(&["aPos"]),
            uniforms: strings(&["aColor", "MVP"]),
            sources: vec![
                ShaderSource::new(ShaderStage::Vertex, presets::MARKER_WGSL),
                ShaderSource::new(ShaderStage::Fragment, presets::MARKER_WGSL),
            ],
        }
    }

    /// Builds an un-initialized program from this description.
    pub fn build(&self, key: ProgramKey, errors: ErrorSink) -> Program {
        let mut program = Program::new(key, self.label.clone(), errors);
        for name in &self.attributes {
            program.declare_attribute(name.as_str());
        }
        for name in &self.uniforms {
            program.declare_uniform(name.as_str());
        }
        for source in &self.sources {
            program.attach(source.clone());
        }
        program
    }
}

/// Owned vertex/index arrays for one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub label: String,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub positions: Vec<f32>,
    pub colors: Option<Vec<f32>>,
    pub normals: Option<Vec<f32>>,
    pub indices: Option<Vec<u32>>,
}

impl MeshData {
    pub fn arrays(&self) -> MeshArrays<'_> {
        MeshArrays {
            positions: &self.positions,
            colors: self.colors.as_deref(),
            normals: self.normals.as_deref(),
            uvs: None,
            indices: self.indices.as_deref(),
        }
    }

    /// Whether draws of this mesh go through its index buffer.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn tetrahedron() -> Self {
        Self {
            label: "tetrahedron".into(),
            vertex_count: 4,
            triangle_count: 4,
            positions: presets::TETRAHEDRON_POSITIONS.to_vec(),
            colors: Some(presets::TETRAHEDRON_COLORS.to_vec()),
            normals: Some(presets::TETRAHEDRON_NORMALS.to_vec()),
            indices: Some(presets::TETRAHEDRON_INDICES.to_vec()),
        }
    }

    pub fn cube() -> Self {
        Self {
            label: "cube".into(),
            vertex_count: 36,
            triangle_count: 12,
            positions: presets::CUBE_POSITIONS.to_vec(),
            colors: Some(presets::cube_colors(presets::CUBE_COLOR)),
            normals: Some(presets::cube_normals()),
            indices: None,
        }
    }

    /// Positions-only cube for the light marker.
    pub fn marker_cube() -> Self {
        Self {
            label: "light cube".into(),
            colors: None,
            normals: None,
            ..Self::cube()
        }
    }
}

/// Everything the renderer needs to build and animate its scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub clear_color: Color,

    pub lit_program: ProgramConfig,
    pub marker_program: ProgramConfig,

    /// Drawn once per entry of `instance_positions` with the lit program.
    pub instance_mesh: MeshData,
    /// Drawn once with the lit program and an identity model.
    pub backdrop_mesh: MeshData,
    /// Drawn at the light position with the marker program.
    pub marker_mesh: MeshData,

    pub instance_positions: Vec<Vec3>,
    pub spin_axis: Vec3,
    /// Degrees per frame added to the running spin angle, per instance.
    pub spin_rate: f32,
    /// Degrees added to the running spin angle after each instance.
    pub spin_step: f32,

    pub marker_scale: f32,
    /// Light at rest. Its x/y are animated each frame; z and color are kept.
    pub light: Light,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::rgba(0.15, 0.15, 0.0, 1.0),
            lit_program: ProgramConfig::lit(),
            marker_program: ProgramConfig::marker(),
            instance_mesh: MeshData::tetrahedron(),
            backdrop_mesh: MeshData::cube(),
            marker_mesh: MeshData::marker_cube(),
            instance_positions: presets::INSTANCE_POSITIONS.to_vec(),
            spin_axis: presets::SPIN_AXIS,
            spin_rate: 0.6,
            spin_step: 20.0,
            marker_scale: 0.2,
            light: Light::default(),
        }
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}
