use std::fmt;

/// Wheel units reported for one notch of a line-based wheel.
pub const WHEEL_UNITS_PER_NOTCH: f32 = 120.0;

/// Pixels of high-precision scrolling treated as one notch.
const PIXELS_PER_NOTCH: f32 = 20.0;

/// Keyboard key identifier.
///
/// Only keys the camera controls react to are named; anything else maps to
/// `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    W,
    A,
    S,
    D,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

/// Pressed/released state shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Mouse wheel delta, vertical axis only.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    /// Notches of a line-based wheel. Positive is away from the user.
    Line(f32),
    /// High-precision scrolling in physical pixels.
    Pixel(f32),
}

impl WheelDelta {
    /// Delta expressed in wheel units ([`WHEEL_UNITS_PER_NOTCH`] per notch).
    pub fn units(self) -> f32 {
        match self {
            WheelDelta::Line(n) => n * WHEEL_UNITS_PER_NOTCH,
            WheelDelta::Pixel(px) => px / PIXELS_PER_NOTCH * WHEEL_UNITS_PER_NOTCH,
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Pointer coordinates are physical pixels with the origin at the top-left
/// corner of the window.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: ButtonState,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    PointerMoved { x: f32, y: f32 },
    PointerButton { button: MouseButton, state: ButtonState },
    Wheel(WheelDelta),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Unknown(code) => write!(f, "Unknown({code:#x})"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_notch_is_120_units() {
        assert_eq!(WheelDelta::Line(1.0).units(), 120.0);
        assert_eq!(WheelDelta::Line(-2.0).units(), -240.0);
        assert_eq!(WheelDelta::Pixel(PIXELS_PER_NOTCH).units(), 120.0);
    }

    #[test]
    fn unknown_key_displays_code() {
        assert_eq!(Key::W.to_string(), "W");
        assert_eq!(Key::Unknown(0x2a).to_string(), "Unknown(0x2a)");
    }
}
