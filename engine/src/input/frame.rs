//! Per-tick input snapshot
//!
//! [`InputFrame`] is what the locomotion core reads each tick. Hosts build
//! one from analog axes ([`InputFrame::from_axes`]) or from keyboard state
//! ([`InputFrame::from_keys`]); both apply the deadzone, turn local axes
//! into a world-space wish direction using the heading, and gate sprint on
//! forward input.

use glam::{Vec2, Vec3};

use crate::player::InputConfig;

use super::keyboard::MovementKeys;

/// Right and forward heading axes for a yaw in radians.
///
/// Yaw 0 looks down -Z; positive yaw turns toward +X.
pub fn heading_axes(yaw: f32) -> (Vec3, Vec3) {
    let (sin, cos) = yaw.sin_cos();
    let forward = Vec3::new(sin, 0.0, -cos);
    let right = Vec3::new(cos, 0.0, sin);
    (right, forward)
}

/// Input for one simulation tick. Read-only to the core.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputFrame {
    /// World-space horizontal wish direction, zero below the deadzone
    pub wish_direction: Vec3,
    /// Jump was pressed since the previous tick
    pub jump_pressed: bool,
    pub crouch_held: bool,
    /// Sprint held while moving forward
    pub sprint_held: bool,
    /// Heading in radians
    pub yaw: f32,
}

impl InputFrame {
    /// Build a frame from local axes (`x` right, `y` forward).
    ///
    /// Axes longer than 1 are clamped so diagonals are not faster.
    pub fn from_axes(
        axes: Vec2,
        yaw: f32,
        jump_pressed: bool,
        crouch_held: bool,
        sprint: bool,
        config: &InputConfig,
    ) -> Self {
        let axes = axes.clamp_length_max(1.0);
        let wish_direction = if axes.length() < config.deadzone {
            Vec3::ZERO
        } else {
            let (right, forward) = heading_axes(yaw);
            right * axes.x + forward * axes.y
        };

        Self {
            wish_direction,
            jump_pressed,
            crouch_held,
            sprint_held: sprint && axes.y > config.run_forward_threshold,
            yaw,
        }
    }

    /// Build a frame from keyboard state, consuming its jump latch.
    pub fn from_keys(keys: &mut MovementKeys, yaw: f32, config: &InputConfig) -> Self {
        let axes = Vec2::new(keys.right_axis() as f32, keys.forward_axis() as f32);
        let jump = keys.take_jump_press();
        Self::from_axes(axes, yaw, jump, keys.crouch, keys.sprint, config)
    }

    /// Frame with no input at the given heading.
    pub fn idle(yaw: f32) -> Self {
        Self {
            yaw,
            ..Self::default()
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    pub fn forward(&self) -> Vec3 {
        heading_axes(self.yaw).1
    }

    pub fn right(&self) -> Vec3 {
        heading_axes(self.yaw).0
    }

    pub fn has_wish(&self) -> bool {
        self.wish_direction != Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use std::f32::consts::FRAC_PI_2;

    fn config() -> InputConfig {
        InputConfig::default()
    }

    #[test]
    fn test_heading_axes() {
        let (right, forward) = heading_axes(0.0);
        assert!((forward - Vec3::NEG_Z).length() < 1e-6);
        assert!((right - Vec3::X).length() < 1e-6);

        let (right, forward) = heading_axes(FRAC_PI_2);
        assert!((forward - Vec3::X).length() < 1e-6);
        assert!((right - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_deadzone() {
        let frame = InputFrame::from_axes(Vec2::new(0.05, 0.0), 0.0, false, false, false, &config());
        assert_eq!(frame.wish_direction, Vec3::ZERO);
        assert!(!frame.has_wish());

        let frame = InputFrame::from_axes(Vec2::new(0.0, 0.5), 0.0, false, false, false, &config());
        assert!((frame.wish_direction - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-6);
    }

    #[test]
    fn test_diagonal_clamped() {
        let frame = InputFrame::from_axes(Vec2::ONE, 0.0, false, false, false, &config());
        assert!((frame.wish_direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_run_gating() {
        let cfg = config();
        let forward = InputFrame::from_axes(Vec2::new(0.0, 1.0), 0.0, false, false, true, &cfg);
        assert!(forward.sprint_held);

        let strafe = InputFrame::from_axes(Vec2::new(1.0, 0.0), 0.0, false, false, true, &cfg);
        assert!(!strafe.sprint_held);

        let backward = InputFrame::from_axes(Vec2::new(0.0, -1.0), 0.0, false, false, true, &cfg);
        assert!(!backward.sprint_held);
    }

    #[test]
    fn test_from_keys_consumes_jump() {
        let mut keys = MovementKeys::new();
        keys.handle_key(KeyCode::W, true);
        keys.handle_key(KeyCode::Space, true);
        keys.handle_key(KeyCode::ShiftLeft, true);

        let frame = InputFrame::from_keys(&mut keys, 0.0, &config());
        assert!(frame.jump_pressed);
        assert!(frame.sprint_held);
        assert!((frame.wish_direction - Vec3::NEG_Z).length() < 1e-6);

        let frame = InputFrame::from_keys(&mut keys, 0.0, &config());
        assert!(!frame.jump_pressed);
    }
}
