//! Input handling for mouse-look and movement keys, gated by an exclusive
//! pointer-lock focus machine.
//!
//! All look/move intake goes through [`InputState`]. While focus is
//! [`Focus::Unlocked`] every mouse-motion and movement-key event is
//! dropped, so background input can never drift the camera; unlocking
//! clears held keys and pending deltas in the same step, so a partially
//! detached state (mouse ignored but keys still active) is never
//! observable.

use glam::Vec2;
use std::collections::HashSet;

/// Exclusive input focus. Locked corresponds to an engaged pointer lock:
/// relative mouse deltas flow and movement keys are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Unlocked,
    Locked,
}

/// A logical movement direction mapped from WASD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveDirection {
    /// Map a physical key code to a movement direction, if any.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW => Some(Self::Forward),
            KeyCode::KeyS => Some(Self::Backward),
            KeyCode::KeyA => Some(Self::Left),
            KeyCode::KeyD => Some(Self::Right),
            _ => None,
        }
    }
}

/// Per-direction pressed state. One boolean per direction, not a single
/// "current key", so diagonal movement composes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Manages look/move input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    focus: Focus,
    /// Movement keys currently held (only tracked while Locked).
    keys_held: HashSet<KeyCode>,
    /// Mouse delta accumulated since the last drain.
    accumulated_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_locked(&self) -> bool {
        self.focus == Focus::Locked
    }

    /// Engage exclusive focus: mouse-move and key events start flowing.
    pub fn lock(&mut self) {
        if self.focus != Focus::Locked {
            self.focus = Focus::Locked;
            log::debug!("input focus locked");
        }
    }

    /// Release exclusive focus. Held keys and pending mouse deltas are
    /// cleared together with the state switch, one atomic detach.
    pub fn unlock(&mut self) {
        if self.focus != Focus::Unlocked {
            self.focus = Focus::Unlocked;
            self.keys_held.clear();
            self.accumulated_delta = Vec2::ZERO;
            log::debug!("input focus unlocked");
        }
    }

    /// Process a keyboard event. Ignored while unlocked.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        if self.focus != Focus::Locked || MoveDirection::from_key(key).is_none() {
            return;
        }
        match state {
            ElementState::Pressed => {
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process raw mouse motion. Ignored while unlocked.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        if self.focus != Focus::Locked {
            return;
        }
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Take the mouse delta accumulated since the last call.
    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.accumulated_delta)
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Current per-direction movement flags.
    pub fn movement_flags(&self) -> MovementFlags {
        MovementFlags {
            forward: self.is_key_held(KeyCode::KeyW),
            backward: self.is_key_held(KeyCode::KeyS),
            left: self.is_key_held(KeyCode::KeyA),
            right: self.is_key_held(KeyCode::KeyD),
        }
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    /// Events are dropped while unlocked: no flags, no deltas.
    #[test]
    fn unlocked_ignores_events() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_mouse_motion((10.0, -4.0));
        assert_eq!(input.movement_flags(), MovementFlags::default());
        assert_eq!(input.take_mouse_delta(), Vec2::ZERO);
    }

    /// Held directions compose, so diagonal movement is expressible.
    #[test]
    fn diagonal_flags_compose() {
        let mut input = InputState::new();
        input.lock();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        let flags = input.movement_flags();
        assert!(flags.forward && flags.left);
        assert!(!flags.backward && !flags.right);
    }

    /// Unlocking clears keys and deltas in one step.
    #[test]
    fn unlock_is_atomic_detach() {
        let mut input = InputState::new();
        input.lock();
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        input.process_mouse_motion((100.0, 100.0));
        input.unlock();
        assert_eq!(input.movement_flags(), MovementFlags::default());
        assert_eq!(input.take_mouse_delta(), Vec2::ZERO);
    }

    /// Mouse deltas accumulate across events and drain on read.
    #[test]
    fn mouse_delta_accumulates_and_drains() {
        let mut input = InputState::new();
        input.lock();
        input.process_mouse_motion((3.0, 1.0));
        input.process_mouse_motion((-1.0, 2.0));
        assert_eq!(input.take_mouse_delta(), Vec2::new(2.0, 3.0));
        assert_eq!(input.take_mouse_delta(), Vec2::ZERO);
    }

    /// Key releases while locked drop the corresponding flag.
    #[test]
    fn release_clears_flag() {
        let mut input = InputState::new();
        input.lock();
        input.process_keyboard(KeyCode::KeyS, ElementState::Pressed);
        assert!(input.movement_flags().backward);
        input.process_keyboard(KeyCode::KeyS, ElementState::Released);
        assert!(!input.movement_flags().backward);
    }
}
