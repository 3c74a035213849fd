use std::time::Duration;

use glam::{Mat4, Vec3};

/// Movement intent toggled by [`Camera::pan`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PanDirection {
    Forward,
    Backward,
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
struct Intent {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

pub const PITCH_LIMIT: f32 = 89.0;
pub const FOV_MIN: f32 = 1.0;
pub const FOV_MAX: f32 = 45.0;

/// Euler-angle first-person camera.
///
/// `front`, `right` and `up` are derived from yaw/pitch and are only changed
/// by [`Camera::update_orientation`]. Angles are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,

    yaw: f32,
    pitch: f32,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,

    speed: f32,
    sensitivity: f32,

    intent: Intent,
    delta: Duration,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 20.0),
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            fov: FOV_MAX,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
            speed: 2.5,
            sensitivity: 0.1,
            intent: Intent::default(),
            delta: Duration::ZERO,
        };
        camera.update_orientation();
        camera
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    // ── orientation ───────────────────────────────────────────────────────

    /// Re-derives the basis from yaw, pitch and world-up.
    pub fn update_orientation(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Applies a mouse drag from `(from_x, from_y)` to `(to_x, to_y)`.
    pub fn rotate_by_mouse_delta(&mut self, from_x: f32, from_y: f32, to_x: f32, to_y: f32, constrain_pitch: bool) {
        if from_x == to_x && from_y == to_y {
            return;
        }
        self.yaw += (to_x - from_x) * self.sensitivity;
        self.pitch += (to_y - from_y) * self.sensitivity;
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        self.update_orientation();
    }

    /// Sets the yaw directly (timer-driven rotation).
    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw = degrees;
        self.update_orientation();
    }

    /// Narrows (positive) or widens (negative) the field of view.
    pub fn zoom(&mut self, wheel_delta: f32) {
        self.fov = (self.fov - wheel_delta * self.sensitivity).clamp(FOV_MIN, FOV_MAX);
    }

    // ── movement ──────────────────────────────────────────────────────────

    pub fn pan(&mut self, direction: PanDirection, start: bool) {
        match direction {
            PanDirection::Forward => self.intent.forward = start,
            PanDirection::Backward => self.intent.backward = start,
            PanDirection::Left => self.intent.left = start,
            PanDirection::Right => self.intent.right = start,
        }
    }

    /// Time since the last tick, consumed by the next position update.
    pub fn set_delta_time(&mut self, delta: Duration) {
        self.delta = delta;
    }

    /// Moves along every active intent. Diagonals are not re-normalized.
    pub fn update_position(&mut self, delta: Duration) {
        let step = delta.as_secs_f32() * self.speed;
        let Intent { forward, backward, left, right } = self.intent;
        if forward {
            self.position += self.front * step;
        }
        if backward {
            self.position -= self.front * step;
        }
        if left {
            self.position -= self.right * step;
        }
        if right {
            self.position += self.right * step;
        }
    }

    // ── matrices ──────────────────────────────────────────────────────────

    /// Advances by the recorded delta time, then returns `(view, projection)`.
    pub fn view_and_projection(&mut self) -> (Mat4, Mat4) {
        self.update_position(self.delta);
        let view = Mat4::look_at_rh(self.position, self.position + self.front, self.up);
        let projection = Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
        (view, projection)
    }

    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    #[inline]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    #[inline]
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    // ── orientation ───────────────────────────────────────────────────────

    #[test]
    fn default_looks_down_negative_z() {
        let cam = Camera::default();
        assert!(approx(cam.front(), Vec3::new(0.0, 0.0, -1.0)), "{:?}", cam.front());
        assert!(approx(cam.right(), Vec3::X));
        assert!(approx(cam.up(), Vec3::Y));
    }

    #[test]
    fn basis_is_orthonormal_across_angles() {
        let mut cam = Camera::default();
        for yaw in (-360..=360).step_by(15) {
            for pitch in (-88..=88).step_by(8) {
                cam.yaw = yaw as f32;
                cam.pitch = pitch as f32;
                cam.update_orientation();
                let (f, r, u) = (cam.front(), cam.right(), cam.up());

                for v in [f, r, u] {
                    assert!((v.length() - 1.0).abs() < EPS);
                }
                assert!(f.dot(r).abs() < EPS);
                assert!(f.dot(u).abs() < EPS);
                assert!(r.dot(u).abs() < EPS);
                assert!(approx(r, f.cross(cam.world_up()).normalize()));
            }
        }
    }

    #[test]
    fn constrained_rotation_clamps_pitch() {
        let mut cam = Camera::default();
        cam.rotate_by_mouse_delta(0.0, 0.0, 0.0, 100_000.0, true);
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        cam.rotate_by_mouse_delta(0.0, 100_000.0, 0.0, -100_000.0, true);
        assert_eq!(cam.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn unconstrained_rotation_does_not_clamp() {
        let mut cam = Camera::default();
        cam.rotate_by_mouse_delta(0.0, 0.0, 0.0, 1000.0, false);
        assert!((cam.pitch() - 100.0).abs() < EPS);
    }

    #[test]
    fn zero_drag_is_a_no_op() {
        let mut cam = Camera::default();
        let before = cam.clone();
        cam.rotate_by_mouse_delta(5.0, 5.0, 5.0, 5.0, true);
        assert_eq!(cam, before);
    }

    #[test]
    fn drag_applies_sensitivity() {
        let mut cam = Camera::default();
        cam.rotate_by_mouse_delta(10.0, 10.0, 30.0, 0.0, true);
        assert!((cam.yaw() - -88.0).abs() < EPS);
        assert!((cam.pitch() - -1.0).abs() < EPS);
    }

    // ── zoom ──────────────────────────────────────────────────────────────

    #[test]
    fn zoom_stays_within_bounds() {
        let mut cam = Camera::default();
        cam.zoom(1.0e6);
        assert_eq!(cam.fov(), FOV_MIN);
        cam.zoom(-1.0e6);
        assert_eq!(cam.fov(), FOV_MAX);
    }

    #[test]
    fn alternating_zoom_returns_toward_bound() {
        let mut cam = Camera::default();
        let mut last = cam.fov();
        for _ in 0..20 {
            cam.zoom(120.0);
            assert!(cam.fov() <= last && cam.fov() >= FOV_MIN);
            last = cam.fov();
        }
        for _ in 0..20 {
            cam.zoom(-120.0);
            assert!(cam.fov() >= last && cam.fov() <= FOV_MAX);
            last = cam.fov();
        }
        assert_eq!(cam.fov(), FOV_MAX);
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn one_second_forward_moves_speed_units() {
        let mut cam = Camera::default();
        let start = cam.position();
        cam.pan(PanDirection::Forward, true);
        cam.set_delta_time(Duration::from_millis(1000));
        cam.view_and_projection();

        assert!(approx(cam.position() - start, cam.front() * 2.5));
    }

    #[test]
    fn diagonal_is_not_renormalized() {
        let mut cam = Camera::default();
        let start = cam.position();
        cam.pan(PanDirection::Forward, true);
        cam.pan(PanDirection::Right, true);
        cam.update_position(Duration::from_secs(1));

        let moved = cam.position() - start;
        assert!((moved.length() - 2.5 * 2f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn released_intent_stops_movement() {
        let mut cam = Camera::default();
        cam.pan(PanDirection::Left, true);
        cam.pan(PanDirection::Left, false);
        let start = cam.position();
        cam.update_position(Duration::from_secs(3));
        assert_eq!(cam.position(), start);
    }

    #[test]
    fn opposite_intents_cancel() {
        let mut cam = Camera::default();
        let start = cam.position();
        cam.pan(PanDirection::Forward, true);
        cam.pan(PanDirection::Backward, true);
        cam.update_position(Duration::from_secs(1));
        assert!(approx(cam.position(), start));
    }

    // ── matrices ──────────────────────────────────────────────────────────

    #[test]
    fn view_maps_target_onto_negative_z() {
        let mut cam = Camera::default();
        let (view, _) = cam.view_and_projection();
        let origin = view.transform_point3(Vec3::ZERO);
        assert!(approx(origin, Vec3::new(0.0, 0.0, -20.0)));
    }

    #[test]
    fn viewport_size_sets_aspect() {
        let mut cam = Camera::default();
        cam.set_viewport_size(800, 400);
        assert_eq!(cam.aspect(), 2.0);
        cam.set_viewport_size(0, 0);
        assert_eq!(cam.aspect(), 1.0);
    }
}
