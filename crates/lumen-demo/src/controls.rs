//! Maps window input onto camera controls.

use lumen_engine::input::{Drag, InputFrame, InputState, Key, MouseButton};
use lumen_engine::render::{Camera, PanDirection};

pub fn pan_direction(key: Key) -> Option<PanDirection> {
    match key {
        Key::W => Some(PanDirection::Forward),
        Key::S => Some(PanDirection::Backward),
        Key::A => Some(PanDirection::Left),
        Key::D => Some(PanDirection::Right),
        _ => None,
    }
}

/// Window y (top-left origin) to bottom-left origin.
#[inline]
pub fn flip_y(y: f32, height: u32) -> f32 {
    height as f32 - y
}

/// Applies one frame of input to the camera. Returns true when Escape was
/// pressed.
pub fn apply(camera: &mut Camera, state: &InputState, frame: &InputFrame, height: u32) -> bool {
    // A key can be both released and pressed within one frame; the held set
    // decides the final pan state.
    for key in frame.keys_pressed.union(&frame.keys_released).copied() {
        if let Some(dir) = pan_direction(key) {
            camera.pan(dir, state.key_down(key));
        }
    }

    if let Some(Drag { from, to }) = frame.drag
        && (state.button_down(MouseButton::Left) || frame.buttons_released.contains(&MouseButton::Left))
    {
        camera.rotate_by_mouse_delta(
            from.0,
            flip_y(from.1, height),
            to.0,
            flip_y(to.1, height),
            true,
        );
    }

    if frame.wheel != 0.0 {
        camera.zoom(frame.wheel);
    }

    frame.keys_pressed.contains(&Key::Escape)
}
