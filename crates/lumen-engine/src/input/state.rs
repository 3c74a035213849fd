use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, MouseButton};

/// Current input state for a single window.
///
/// Holds "is down" information and current pointer position.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in physical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Report held keys and buttons as released so nothing stays stuck.
                    frame.keys_released.extend(self.keys_down.drain());
                    frame.buttons_released.extend(self.buttons_down.drain());
                }
            }

            InputEvent::PointerMoved { x, y } => {
                let to = (*x, *y);
                if let Some(from) = self.pointer_pos
                    && !self.buttons_down.is_empty()
                {
                    frame.record_drag(from, to);
                }
                self.pointer_pos = Some(to);
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                ButtonState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                ButtonState::Pressed => {
                    if self.buttons_down.insert(*button) {
                        frame.buttons_pressed.insert(*button);
                    }
                }
                ButtonState::Released => {
                    if self.buttons_down.remove(button) {
                        frame.buttons_released.insert(*button);
                    }
                }
            },

            InputEvent::Wheel(delta) => {
                frame.wheel += delta.units();
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Drag, WheelDelta};

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            repeat: false,
        }
    }

    fn button(state: ButtonState) -> InputEvent {
        InputEvent::PointerButton {
            button: MouseButton::Left,
            state,
        }
    }

    // ── keys ─────────────────────────────────────────────────────────────

    #[test]
    fn repeated_press_is_one_transition() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, key(Key::W, ButtonState::Pressed));
        state.apply_event(&mut frame, InputEvent::Key {
            key: Key::W,
            state: ButtonState::Pressed,
            repeat: true,
        });

        assert!(state.key_down(Key::W));
        assert_eq!(frame.keys_pressed.len(), 1);
        assert_eq!(frame.events.len(), 2);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, key(Key::A, ButtonState::Pressed));
        state.apply_event(&mut frame, button(ButtonState::Pressed));
        frame.clear();

        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.key_down(Key::A));
        assert!(frame.keys_released.contains(&Key::A));
        assert!(frame.buttons_released.contains(&MouseButton::Left));
    }

    // ── pointer ──────────────────────────────────────────────────────────

    #[test]
    fn moves_without_button_are_not_drags() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 1.0, y: 1.0 });
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 5.0, y: 1.0 });
        assert_eq!(frame.drag, None);
        assert_eq!(state.pointer_pos, Some((5.0, 1.0)));
    }

    #[test]
    fn drag_spans_first_to_last_move() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 10.0, y: 10.0 });
        state.apply_event(&mut frame, button(ButtonState::Pressed));
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 12.0, y: 9.0 });
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 20.0, y: 4.0 });

        assert_eq!(
            frame.drag,
            Some(Drag {
                from: (10.0, 10.0),
                to: (20.0, 4.0),
            })
        );

        frame.clear();
        state.apply_event(&mut frame, button(ButtonState::Released));
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 30.0, y: 4.0 });
        assert_eq!(frame.drag, None);
    }

    #[test]
    fn wheel_accumulates_units() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, InputEvent::Wheel(WheelDelta::Line(1.0)));
        state.apply_event(&mut frame, InputEvent::Wheel(WheelDelta::Line(2.0)));
        assert_eq!(frame.wheel, 360.0);
        frame.clear();
        assert_eq!(frame.wheel, 0.0);
    }
}
