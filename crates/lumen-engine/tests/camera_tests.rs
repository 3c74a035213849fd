//! Camera Tests
//!
//! Tests for:
//! - Orthonormal basis across yaw/pitch
//! - Pitch constraint and field-of-view bounds
//! - Default orientation
//! - Time-scaled panning through view_and_projection

use std::time::Duration;

use glam::{Vec3, Vec4};

use lumen_engine::render::{Camera, PanDirection};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

// ============================================================================
// Orientation
// ============================================================================

#[test]
fn basis_is_orthonormal_for_every_orientation() {
    let mut camera = Camera::new();
    for yaw in (-360..=360).step_by(15) {
        for pitch in (-88..=88).step_by(8) {
            camera.set_yaw(yaw as f32);
            camera.rotate_by_mouse_delta(0.0, 0.0, 0.0, (pitch as f32 - camera.pitch()) / camera.sensitivity(), true);

            let (f, r, u) = (camera.front(), camera.right(), camera.up());
            for v in [f, r, u] {
                assert!(approx(v.length(), 1.0), "yaw {yaw} pitch {pitch}: |{v}| != 1");
            }
            assert!(approx(f.dot(r), 0.0) && approx(f.dot(u), 0.0) && approx(r.dot(u), 0.0));
            assert!(approx_vec(r, f.cross(camera.world_up()).normalize()));
        }
    }
}

#[test]
fn default_camera_looks_down_negative_z() {
    let camera = Camera::default();
    assert!(approx(camera.yaw(), -90.0));
    assert!(approx(camera.pitch(), 0.0));
    assert!(approx_vec(camera.front(), Vec3::new(0.0, 0.0, -1.0)));
    assert!(approx_vec(camera.position(), Vec3::new(0.0, 0.0, 20.0)));
}

#[test]
fn huge_drag_clamps_pitch() {
    let mut camera = Camera::new();
    camera.rotate_by_mouse_delta(0.0, 0.0, 0.0, 100_000.0, true);
    assert!(approx(camera.pitch(), 89.0));

    camera.rotate_by_mouse_delta(0.0, 0.0, 0.0, -1_000_000.0, true);
    assert!(approx(camera.pitch(), -89.0));
}

#[test]
fn unconstrained_drag_may_pass_the_pole() {
    let mut camera = Camera::new();
    camera.rotate_by_mouse_delta(0.0, 0.0, 0.0, 1000.0, false);
    assert!(approx(camera.pitch(), 100.0));
}

// ============================================================================
// Zoom
// ============================================================================

#[test]
fn zoom_stays_within_bounds() {
    let mut camera = Camera::new();
    for _ in 0..50 {
        camera.zoom(120.0);
        assert!((1.0..=45.0).contains(&camera.fov()));
    }
    assert!(approx(camera.fov(), 1.0));

    let mut last = camera.fov();
    for _ in 0..50 {
        camera.zoom(-120.0);
        assert!(camera.fov() >= last && camera.fov() <= 45.0);
        last = camera.fov();
    }
    assert!(approx(camera.fov(), 45.0));
}

// ============================================================================
// Movement
// ============================================================================

#[test]
fn one_second_forward_moves_speed_units() {
    let mut camera = Camera::new();
    let before = camera.position();

    camera.pan(PanDirection::Forward, true);
    camera.set_delta_time(Duration::from_millis(1000));
    camera.view_and_projection();

    assert!(approx_vec(camera.position() - before, camera.front() * 2.5));
}

#[test]
fn released_direction_stops_moving() {
    let mut camera = Camera::new();
    camera.pan(PanDirection::Right, true);
    camera.pan(PanDirection::Right, false);
    camera.set_delta_time(Duration::from_secs(1));
    let before = camera.position();
    camera.view_and_projection();
    assert_eq!(camera.position(), before);
}

#[test]
fn projection_maps_near_plane_to_zero_depth() {
    let mut camera = Camera::new();
    camera.set_viewport_size(800, 600);
    assert!(approx(camera.aspect(), 800.0 / 600.0));

    let (view, projection) = camera.view_and_projection();
    let near = camera.position() + camera.front() * 0.1;
    let clip = projection * view * near.extend(1.0);
    assert!((clip.z / clip.w).abs() < 1e-3);

    let origin = projection * view * Vec4::new(0.0, 0.0, 0.0, 1.0);
    assert!(approx(origin.x, 0.0) && approx(origin.y, 0.0));
}
