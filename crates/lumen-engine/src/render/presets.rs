//! Geometry of the demonstration scene.

use glam::Vec3;

// ── tetrahedron ───────────────────────────────────────────────────────────

/// Regular tetrahedron centered near the origin, one normal per vertex.
pub const TETRAHEDRON_POSITIONS: [f32; 12] = [
    0.8165, -0.333, -0.4714, //
    0.0, -0.333, 0.9428, //
    -0.8165, -0.333, -0.4714, //
    0.0, 1.0, 0.0,
];

pub const TETRAHEDRON_COLORS: [f32; 16] = [
    0.0, 1.0, 0.0, 1.0, // green
    1.0, 0.0, 0.0, 1.0, // red
    0.0, 0.0, 1.0, 1.0, // blue
    1.0, 1.0, 0.0, 1.0, // yellow
];

pub const TETRAHEDRON_NORMALS: [f32; 12] = [
    0.0, -1.0, 0.0, //
    -0.81650, 0.33333, 0.47140, //
    0.0, 0.33333, -0.94281, //
    0.81650, 0.33333, 0.47140,
];

pub const TETRAHEDRON_INDICES: [u32; 12] = [0, 1, 2, 1, 2, 3, 2, 3, 0, 3, 0, 1];

// ── cube ──────────────────────────────────────────────────────────────────

/// Unit cube as 12 unindexed triangles, faces ordered -Z, +Z, -X, +X, -Y, +Y.
#[rustfmt::skip]
pub const CUBE_POSITIONS: [f32; 108] = [
    -0.5, -0.5, -0.5,   0.5, -0.5, -0.5,   0.5,  0.5, -0.5,
     0.5,  0.5, -0.5,  -0.5,  0.5, -0.5,  -0.5, -0.5, -0.5,

    -0.5, -0.5,  0.5,   0.5, -0.5,  0.5,   0.5,  0.5,  0.5,
     0.5,  0.5,  0.5,  -0.5,  0.5,  0.5,  -0.5, -0.5,  0.5,

    -0.5,  0.5,  0.5,  -0.5,  0.5, -0.5,  -0.5, -0.5, -0.5,
    -0.5, -0.5, -0.5,  -0.5, -0.5,  0.5,  -0.5,  0.5,  0.5,

     0.5,  0.5,  0.5,   0.5,  0.5, -0.5,   0.5, -0.5, -0.5,
     0.5, -0.5, -0.5,   0.5, -0.5,  0.5,   0.5,  0.5,  0.5,

    -0.5, -0.5, -0.5,   0.5, -0.5, -0.5,   0.5, -0.5,  0.5,
     0.5, -0.5,  0.5,  -0.5, -0.5,  0.5,  -0.5, -0.5, -0.5,

    -0.5,  0.5, -0.5,   0.5,  0.5, -0.5,   0.5,  0.5,  0.5,
     0.5,  0.5,  0.5,  -0.5,  0.5,  0.5,  -0.5,  0.5, -0.5,
];

const CUBE_FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, -1.0],
    [0.0, 0.0, 1.0],
    [-1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 1.0, 0.0],
];

pub const CUBE_COLOR: [f32; 4] = [1.0, 0.5, 0.31, 1.0];

/// Per-vertex normals of [`CUBE_POSITIONS`].
pub fn cube_normals() -> Vec<f32> {
    CUBE_FACE_NORMALS
        .iter()
        .flat_map(|n| std::iter::repeat_n(*n, 6))
        .flatten()
        .collect()
}

pub fn cube_colors(color: [f32; 4]) -> Vec<f32> {
    std::iter::repeat_n(color, 36).flatten().collect()
}

// ── placements ────────────────────────────────────────────────────────────

pub const INSTANCE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

pub const SPIN_AXIS: Vec3 = Vec3::new(1.0, 0.3, 0.5);

// ── shaders ───────────────────────────────────────────────────────────────

pub const LIT_UNIFORMS_WGSL: &str = include_str!("shaders/lit_uniforms.wgsl");
pub const LIT_VERTEX_WGSL: &str = include_str!("shaders/lit_vertex.wgsl");
pub const LIT_FRAGMENT_WGSL: &str = include_str!("shaders/lit_fragment.wgsl");
pub const LIGHTING_WGSL: &str = include_str!("shaders/lighting.wgsl");
pub const MARKER_WGSL: &str = include_str!("shaders/marker.wgsl");
