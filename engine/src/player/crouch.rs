//! Capsule Crouch System
//!
//! Shrinks the character capsule while crouch is held and grows it back
//! when released. Height moves linearly at the configured crouch rate.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wallrun_engine::player::{CrouchController, LocomotionConfig};
//!
//! let mut crouch = CrouchController::new(&LocomotionConfig::default().capsule);
//!
//! // Each tick:
//! let shape = crouch.update(dt, input.crouch_held);
//! body.set_capsule_height(shape.height);
//! ```

use super::config::CapsuleConfig;

/// Capsule dimensions used by the sensor queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleShape {
    pub radius: f32,
    pub height: f32,
}

impl CapsuleShape {
    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }
}

/// Player stance states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    /// Full standing height
    #[default]
    Standing,
    /// Crouch held (height may still be transitioning)
    Crouching,
}

/// Tracks stance and the current capsule height.
#[derive(Debug, Clone)]
pub struct CrouchController {
    stance: Stance,
    radius: f32,
    standing_height: f32,
    crouch_height: f32,
    /// Meters per second
    rate: f32,
    current_height: f32,
}

impl CrouchController {
    /// Create a controller in standing stance.
    pub fn new(capsule: &CapsuleConfig) -> Self {
        Self {
            stance: Stance::Standing,
            radius: capsule.radius,
            standing_height: capsule.standing_height,
            crouch_height: capsule.crouch_height,
            rate: capsule.crouch_rate,
            current_height: capsule.standing_height,
        }
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Current capsule height in meters.
    ///
    /// This may be between the two stance heights during transitions.
    pub fn current_height(&self) -> f32 {
        self.current_height
    }

    pub fn target_height(&self) -> f32 {
        match self.stance {
            Stance::Standing => self.standing_height,
            Stance::Crouching => self.crouch_height,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        (self.current_height - self.target_height()).abs() > f32::EPSILON
    }

    pub fn shape(&self) -> CapsuleShape {
        CapsuleShape {
            radius: self.radius,
            height: self.current_height,
        }
    }

    /// Update stance from the held crouch input and advance the height.
    pub fn update(&mut self, dt: f32, crouch_held: bool) -> CapsuleShape {
        let dt = dt.max(0.0);
        let stance = if crouch_held {
            Stance::Crouching
        } else {
            Stance::Standing
        };
        if stance != self.stance {
            log::trace!("stance {:?} -> {:?}", self.stance, stance);
            self.stance = stance;
        }

        let target = self.target_height();
        let step = self.rate * dt;
        let diff = target - self.current_height;
        self.current_height = if diff.abs() <= step {
            target
        } else {
            self.current_height + step.copysign(diff)
        };

        self.shape()
    }

    /// Snap back to standing (no transition). Used on respawn.
    pub fn reset(&mut self) {
        self.stance = Stance::Standing;
        self.current_height = self.standing_height;
    }
}
