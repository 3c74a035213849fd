//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform` translates window-system events into `InputEvent`s.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::{Drag, InputFrame};
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, MouseButton, WheelDelta, WHEEL_UNITS_PER_NOTCH};
