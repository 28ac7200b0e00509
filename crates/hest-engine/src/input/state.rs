use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Current input state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    /// Whether the window has keyboard focus.
    pub focused: bool,

    /// Keys currently held.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and records transitions in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases never arrive for keys held while focus moved away.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }
        }

        frame.events.push(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat }
    }

    #[test]
    fn press_and_release_are_recorded_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed, false));
        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed, true));

        assert!(state.key_down(Key::W));
        assert!(frame.key_pressed(Key::W));
        assert_eq!(frame.keys_pressed.len(), 1);
        assert_eq!(frame.events.len(), 2);

        frame.clear();
        state.apply_event(&mut frame, key(Key::W, KeyState::Released, false));
        assert!(!state.key_down(Key::W));
        assert!(frame.keys_released.contains(&Key::W));
        assert!(!frame.key_pressed(Key::W));
    }

    #[test]
    fn releasing_unheld_key_is_ignored() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::Escape, KeyState::Released, false));
        assert!(frame.keys_released.is_empty());
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Focused(true));
        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed, false));
        state.apply_event(&mut frame, key(Key::ShiftLeft, KeyState::Pressed, false));
        assert!(state.focused);

        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.focused);
        assert!(state.keys_down.is_empty());
    }

    #[test]
    fn key_events_refresh_modifiers() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let shift = Modifiers { shift: true, ..Modifiers::default() };

        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::D, state: KeyState::Pressed, modifiers: shift, repeat: false },
        );
        assert_eq!(state.modifiers, shift);
    }
}
