//! # Input Manager
//!
//! This module turns raw window events into per-frame input snapshots:
//! - Keyboard input state tracking
//! - Mouse button state tracking
//! - Pressed/held/released transitions between frames

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

/// Keys the engine reacts to. F1 toggles mouse capture.
const KEY_CODES: [KeyCode; 2] = [KeyCode::F1, KeyCode::Escape];

/// Left breaks, right places.
const MOUSE_BUTTONS: [MouseButton; 2] = [MouseButton::Left, MouseButton::Right];

/// Manages the state of all input devices and processes input events.
///
/// This struct maintains the current and previous down state of the tracked
/// keys and buttons, so a snapshot can tell a fresh press from a hold.
#[derive(Debug)]
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with every tracked key and button released.
    ///
    /// # Returns
    /// A new `InputManager` instance with default state.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<KeyCode, bool> =
            KEY_CODES.iter().map(|&key| (key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        let mouse_button_inputs_old: HashMap<MouseButton, bool> =
            MOUSE_BUTTONS.iter().map(|&button| (button, false)).collect();
        let mouse_button_inputs_new = mouse_button_inputs_old.clone();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_inputs: MouseInput {
                mouse_button_inputs_old,
                mouse_button_inputs_new,
                mouse_delta: None,
            },
        }
    }

    /// Copies the current states into the previous states.
    ///
    /// Called once per frame after the snapshot is taken, so the next
    /// snapshot compares against this frame.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    ///
    /// Untracked keys and buttons are ignored.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.set_key(*key, *state == ElementState::Pressed),
            WindowEvent::MouseInput { button, state, .. } => {
                self.set_mouse_button(*button, *state == ElementState::Pressed)
            }
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    /// Records the down state of a tracked key.
    pub fn set_key(&mut self, key: KeyCode, down: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = down;
        }
    }

    /// Records the down state of a tracked mouse button.
    pub fn set_mouse_button(&mut self, button: MouseButton, down: bool) {
        if let Some(button_state) = self.mouse_inputs.mouse_button_inputs_new.get_mut(&button) {
            *button_state = down;
        }
    }

    /// Updates the mouse movement delta.
    ///
    /// # Arguments
    /// * `delta` - The (x, y) delta of mouse movement since the last update
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        self.mouse_inputs.mouse_delta = Some(delta);
    }

    /// Marks every tracked input as up, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keyboard_inputs_new.values_mut().for_each(|down| *down = false);
        self.mouse_inputs
            .mouse_button_inputs_new
            .values_mut()
            .for_each(|down| *down = false);
    }

    /// Builds the snapshot of transitions since the previous frame.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                (*button, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            mouse_delta: self.mouse_inputs.mouse_delta,
        }
    }

    /// Returns this frame's snapshot and advances to the next frame.
    pub fn process(&mut self) -> ProcessedInputState {
        let processed = self.create_processed_input_state();
        self.move_old_states();
        self.mouse_inputs.mouse_delta = None;
        processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_then_hold_then_release() {
        let mut manager = InputManager::new();

        manager.set_mouse_button(MouseButton::Left, true);
        let first = manager.process();
        assert_eq!(first.get_mouse_button_state(MouseButton::Left), RawInputState::Pressed);

        let second = manager.process();
        assert_eq!(second.get_mouse_button_state(MouseButton::Left), RawInputState::Held);

        manager.set_mouse_button(MouseButton::Left, false);
        let third = manager.process();
        assert_eq!(third.get_mouse_button_state(MouseButton::Left), RawInputState::Released);

        let fourth = manager.process();
        assert_eq!(fourth.get_mouse_button_state(MouseButton::Left), RawInputState::NotPressed);
    }

    #[test]
    fn untracked_inputs_are_ignored() {
        let mut manager = InputManager::new();
        manager.set_key(KeyCode::KeyQ, true);
        manager.set_mouse_button(MouseButton::Middle, true);

        let state = manager.process();
        assert!(!state.keyboard_states.contains_key(&KeyCode::KeyQ));
        assert!(!state.mouse_button_states.contains_key(&MouseButton::Middle));
    }

    #[test]
    fn mouse_delta_lasts_one_frame() {
        let mut manager = InputManager::new();
        manager.intake_mouse_motion((3.0, -1.0));
        assert_eq!(manager.process().get_mouse_delta(), Some((3.0, -1.0)));
        assert_eq!(manager.process().get_mouse_delta(), None);
    }

    #[test]
    fn release_all_lifts_held_buttons() {
        let mut manager = InputManager::new();
        manager.set_key(KeyCode::F1, true);
        manager.set_mouse_button(MouseButton::Right, true);
        manager.process();

        manager.release_all();
        let state = manager.process();
        assert!(state.get_key_state(KeyCode::F1).is_just_released());
        assert!(state.get_mouse_button_state(MouseButton::Right).is_just_released());
    }
}
