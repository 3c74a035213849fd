use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseButton};

/// Pointer travel with at least one button held, within one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drag {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys/buttons, pointer position).
/// `InputFrame` provides events and transitions for the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,

    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Accumulated wheel movement in wheel units.
    pub wheel: f32,

    /// Combined drag of every pointer move made with a button held.
    pub drag: Option<Drag>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel = 0.0;
        self.drag = None;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Extends this frame's drag to `to`, starting it at `from` if none yet.
    pub(crate) fn record_drag(&mut self, from: (f32, f32), to: (f32, f32)) {
        match &mut self.drag {
            Some(drag) => drag.to = to,
            None => self.drag = Some(Drag { from, to }),
        }
    }
}
