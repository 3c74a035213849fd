/// Rectangle of the render target that draws are mapped into, in physical
/// pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport; width and height are clamped to at least 1.
    #[inline]
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Viewport covering a whole `width` x `height` target.
    #[inline]
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Part of the viewport inside a `target_w` x `target_h` target, as
    /// `(x, y, w, h)`. `None` if nothing remains.
    pub fn fit(self, target_w: u32, target_h: u32) -> Option<(f32, f32, f32, f32)> {
        let x0 = i64::from(self.x).clamp(0, i64::from(target_w));
        let y0 = i64::from(self.y).clamp(0, i64::from(target_h));
        let x1 = (i64::from(self.x) + i64::from(self.width)).clamp(0, i64::from(target_w));
        let y1 = (i64::from(self.y) + i64::from(self.height)).clamp(0, i64::from(target_h));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as f32, y0 as f32, (x1 - x0) as f32, (y1 - y0) as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_to_one_pixel() {
        let v = Viewport::new(0, 0, 0, 0);
        assert_eq!((v.width, v.height), (1, 1));
        assert_eq!(v.aspect(), 1.0);
    }

    #[test]
    fn fit_clips_to_target() {
        let v = Viewport::new(-10, 20, 200, 100);
        assert_eq!(v.fit(100, 100), Some((0.0, 20.0, 100.0, 80.0)));
    }

    #[test]
    fn fit_outside_target_is_none() {
        assert_eq!(Viewport::new(500, 0, 10, 10).fit(100, 100), None);
    }
}
