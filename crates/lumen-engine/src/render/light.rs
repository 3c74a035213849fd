use glam::{Vec3, Vec4};

/// Point light supplied to shaders each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub intensity: f32,
    pub color: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.0, 0.0, 2.0),
            intensity: 1.0,
            color: Vec3::ONE,
        }
    }
}

impl Light {
    pub fn new(position: Vec3, intensity: f32, color: Vec3) -> Self {
        Self {
            position,
            intensity,
            color,
        }
    }

    pub fn set(&mut self, position: Vec3, intensity: f32, color: Vec3) {
        *self = Self::new(position, intensity, color);
    }

    /// `xyz` = position, `w` = intensity.
    #[inline]
    pub fn position_and_intensity(&self) -> Vec4 {
        self.position.extend(self.intensity)
    }

    /// Position of the animated light at frame `frame`.
    pub fn orbit(frame: u64, z: f32) -> Vec3 {
        let t = frame as f32 * 0.021;
        Vec3::new(1.0 + t.sin() * 2.0, (t / 2.0).sin(), z)
    }
}
