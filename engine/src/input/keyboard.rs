//! Keyboard Input Module
//!
//! Key state tracking for the locomotion controls.
//! Decoupled from any windowing system by using generic key codes.

/// Generic key codes for locomotion input, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,
    Space,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    C,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Escape,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Tracks the current state of movement keys.
///
/// Held keys are plain booleans. Jump is additionally latched on its press
/// edge so a press shorter than one tick is never lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementKeys {
    /// W / Up
    pub forward: bool,
    /// S / Down
    pub backward: bool,
    /// A / Left
    pub left: bool,
    /// D / Right
    pub right: bool,
    /// Space
    pub jump: bool,
    /// Shift
    pub sprint: bool,
    /// Ctrl or C
    pub crouch: bool,
    jump_latched: bool,
}

impl MovementKeys {
    /// Create a new movement keys state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update movement state based on key press/release.
    ///
    /// Returns `true` if the key was a movement key and was handled,
    /// `false` otherwise.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W | KeyCode::ArrowUp => self.forward = pressed,
            KeyCode::S | KeyCode::ArrowDown => self.backward = pressed,
            KeyCode::A | KeyCode::ArrowLeft => self.left = pressed,
            KeyCode::D | KeyCode::ArrowRight => self.right = pressed,
            KeyCode::Space => {
                if pressed && !self.jump {
                    self.jump_latched = true;
                }
                self.jump = pressed;
            }
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.sprint = pressed,
            KeyCode::ControlLeft | KeyCode::ControlRight | KeyCode::C => self.crouch = pressed,
            _ => return false,
        }
        true
    }

    /// Check if any directional key is currently pressed.
    pub fn any_pressed(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Consume the jump press latch.
    ///
    /// Returns `true` once per press, however long the key is held.
    pub fn take_jump_press(&mut self) -> bool {
        std::mem::take(&mut self.jump_latched)
    }

    /// Reset all movement keys to released state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get the forward/backward movement direction (-1, 0, or 1).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Get the left/right movement direction (-1, 0, or 1).
    pub fn right_axis(&self) -> i32 {
        (self.right as i32) - (self.left as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys_default() {
        let keys = MovementKeys::new();
        assert!(!keys.any_pressed());
        assert_eq!(keys.forward_axis(), 0);
        assert_eq!(keys.right_axis(), 0);
    }

    #[test]
    fn test_movement_keys_forward() {
        let mut keys = MovementKeys::new();
        assert!(keys.handle_key(KeyCode::W, true));
        assert!(keys.forward);
        assert!(keys.any_pressed());
        assert_eq!(keys.forward_axis(), 1);
    }

    #[test]
    fn test_movement_axes() {
        let mut keys = MovementKeys::new();
        keys.handle_key(KeyCode::W, true);
        keys.handle_key(KeyCode::S, true);
        // Both pressed cancels out
        assert_eq!(keys.forward_axis(), 0);

        keys.handle_key(KeyCode::ArrowRight, true);
        assert_eq!(keys.right_axis(), 1);
    }

    #[test]
    fn test_jump_latch_once_per_press() {
        let mut keys = MovementKeys::new();
        keys.handle_key(KeyCode::Space, true);
        // Key repeat while held
        keys.handle_key(KeyCode::Space, true);
        assert!(keys.take_jump_press());
        assert!(!keys.take_jump_press());
        assert!(keys.jump);

        keys.handle_key(KeyCode::Space, false);
        keys.handle_key(KeyCode::Space, true);
        assert!(keys.take_jump_press());
    }

    #[test]
    fn test_jump_tap_between_ticks() {
        let mut keys = MovementKeys::new();
        keys.handle_key(KeyCode::Space, true);
        keys.handle_key(KeyCode::Space, false);
        assert!(!keys.jump);
        assert!(keys.take_jump_press());
    }

    #[test]
    fn test_crouch_keys() {
        let mut keys = MovementKeys::new();
        keys.handle_key(KeyCode::C, true);
        assert!(keys.crouch);
        keys.handle_key(KeyCode::C, false);
        keys.handle_key(KeyCode::ControlLeft, true);
        assert!(keys.crouch);
    }

    #[test]
    fn test_non_movement_key() {
        let mut keys = MovementKeys::new();
        assert!(!keys.handle_key(KeyCode::Escape, true));
        assert!(!keys.any_pressed());
    }
}
