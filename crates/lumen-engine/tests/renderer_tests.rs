//! Renderer Tests
//!
//! Tests for:
//! - Data-driven scenes (placements and meshes from SceneConfig)
//! - Per-frame uniforms: camera position, light orbit, spin
//! - Teardown

use glam::{Mat4, Vec3};

use lumen_engine::render::{Light, MeshData, Renderer, SceneConfig};
use lumen_engine::scene::{DrawCall, DrawCmd, DrawMode};
use lumen_engine::ErrorSink;

fn small_scene() -> SceneConfig {
    SceneConfig {
        instance_mesh: MeshData::cube(),
        backdrop_mesh: MeshData::tetrahedron(),
        instance_positions: vec![Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, -3.0, 0.0)],
        ..Default::default()
    }
}

fn read_f32s(draw: &DrawCall, offset: usize, count: usize) -> Vec<f32> {
    bytemuck::pod_collect_to_vec(&draw.uniforms[offset..offset + count * 4])
}

fn read_mat(draw: &DrawCall, offset: usize) -> Mat4 {
    Mat4::from_cols_slice(&read_f32s(draw, offset, 16))
}

// ============================================================================
// Scene layout
// ============================================================================

#[test]
fn placements_drive_the_draw_count() {
    let mut renderer = Renderer::new(ErrorSink::silent());
    assert!(renderer.init(&small_scene()));

    let draws: Vec<DrawCall> = renderer.record_frame().draw_calls().cloned().collect();
    assert_eq!(draws.len(), 3 + 1 + 1);

    assert!(draws[..3].iter().all(|d| d.mode == DrawMode::Arrays { count: 36 }));
    assert_eq!(draws[3].mode, DrawMode::Indexed { count: 12 });
    assert_eq!(draws[4].mode, DrawMode::Arrays { count: 36 });
}

#[test]
fn frame_ends_with_stop_use() {
    let mut renderer = Renderer::new(ErrorSink::silent());
    assert!(renderer.init(&SceneConfig::default()));
    let keys = renderer.scene_keys().unwrap();

    let items = renderer.record_frame().items().to_vec();
    assert_eq!(items.first(), Some(&DrawCmd::UseProgram(keys.lit_program)));
    assert_eq!(items.last(), Some(&DrawCmd::StopUse));
    assert!(items.contains(&DrawCmd::UseProgram(keys.marker_program)));
}

// ============================================================================
// Uniforms
// ============================================================================

#[test]
fn lit_draws_carry_camera_and_light() {
    let mut renderer = Renderer::new(ErrorSink::silent());
    assert!(renderer.init(&small_scene()));
    renderer.camera_mut().set_position(Vec3::new(1.0, 2.0, 10.0));
    renderer.set_frame_count(50);

    let backdrop = renderer.record_frame().draw_calls().nth(3).cloned().unwrap();

    assert_eq!(read_mat(&backdrop, 128), Mat4::IDENTITY);
    assert_eq!(read_f32s(&backdrop, 192, 3), vec![1.0, 1.0, 1.0]);

    let light = Light::orbit(50, 2.0);
    let light_pos = read_f32s(&backdrop, 208, 3);
    assert!((light_pos[0] - light.x).abs() < 1e-5 && (light_pos[1] - light.y).abs() < 1e-5);
    assert_eq!(read_f32s(&backdrop, 224, 3), vec![1.0, 2.0, 10.0]);
}

#[test]
fn instances_spin_between_frames() {
    let mut renderer = Renderer::new(ErrorSink::silent());
    assert!(renderer.init(&small_scene()));

    renderer.set_frame_count(0);
    let first = read_mat(&renderer.record_frame().draw_calls().next().cloned().unwrap(), 128);
    renderer.set_frame_count(30);
    let later = read_mat(&renderer.record_frame().draw_calls().next().cloned().unwrap(), 128);

    // Instance 0 has no step offset: identity at frame 0, rotated after.
    assert!(first.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    assert!(!later.abs_diff_eq(Mat4::IDENTITY, 1e-3));
    // Translation stays at its placement.
    assert_eq!(later.w_axis.truncate(), Vec3::ZERO);
}

#[test]
fn marker_mvp_places_the_light_cube() {
    let mut renderer = Renderer::new(ErrorSink::silent());
    assert!(renderer.init(&small_scene()));
    renderer.set_viewport(0, 0, 800, 600);
    renderer.set_frame_count(10);

    let marker = renderer.record_frame().draw_calls().last().cloned().unwrap();
    let mvp = read_mat(&marker, 0);

    // No delta time was set, so this does not move the camera.
    let (view, projection) = renderer.camera_mut().view_and_projection();
    let light = Light::orbit(10, 2.0);
    let expected = projection * view * Mat4::from_translation(light) * Mat4::from_scale(Vec3::splat(0.2));
    assert!(mvp.abs_diff_eq(expected, 1e-4));
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn shutdown_releases_everything() {
    let mut renderer = Renderer::new(ErrorSink::silent());
    assert!(renderer.init(&SceneConfig::default()));
    let keys = renderer.scene_keys().unwrap();

    renderer.shutdown();
    renderer.shutdown();

    assert!(renderer.record_frame().is_empty());
    assert!(renderer.mesh(keys.instance_mesh).is_none_or(|m| !m.is_uploaded()));
    assert!(renderer.program(keys.lit_program).is_none_or(|p| !p.is_ready()));
}
