//! Player Module
//!
//! First-person locomotion: walking, air strafing and wall-running driven
//! through forces on a host rigid body.
//!
//! # Components
//!
//! - [`MotionStateMachine`] - Per-character controller, one [`tick`](MotionStateMachine::tick) per fixed step
//!   - Modes: [`Mode::Walking`], [`Mode::Flying`], [`Mode::Wallrunning`]
//!   - Lifecycle events through [`EventBus`]
//! - [`GroundWallSensor`] - Ground sweep, wall probe and contact classification
//! - [`WalkingModel`], [`AirModel`], [`WallrunModel`] - [`AccelerationModel`] strategies
//! - [`TimerBank`] - Cooldowns and debounce windows
//! - [`CrouchController`] - Capsule height while crouching
//! - [`LocomotionConfig`] - Tuning, loadable from JSON

pub mod acceleration;
pub mod config;
pub mod crouch;
pub mod events;
pub mod motion;
pub mod sensor;
pub mod timers;

pub use acceleration::{
    AccelerationModel, AirModel, MotionContext, MotionDelta, WalkingModel, WallrunModel,
    dash_magnitude, double_jump_impulse, jump_impulse, push_off_impulse, wall_kick_impulse,
    wallrun_camera_tilt,
};
pub use config::{
    AirConfig, CapsuleConfig, ConfigError, GroundConfig, InputConfig, JumpConfig,
    LocomotionConfig, SensorConfig, WallrunConfig,
};
pub use crouch::{CapsuleShape, CrouchController, Stance};
pub use events::{EventBus, LocomotionEvent, SubscriptionId};
pub use motion::{Mode, MotionState, MotionStateMachine, TickReport};
pub use sensor::{ContactBatch, ContactClass, ContactVerdict, GroundWallSensor, WallProbe};
pub use timers::TimerBank;
