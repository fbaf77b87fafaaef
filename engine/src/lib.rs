//! Wallrun Engine Library
//!
//! A physics-driven first-person locomotion controller: ground movement with
//! friction and slope correction, air strafing with double jump, and
//! wall-running with timed anti-gravity and wall kicks. The controller drives
//! a host rigid body through forces and never owns a physics world.
//!
//! # Modules
//!
//! - [`physics`] - Host capability traits plus a box-collider world and capsule body
//! - [`input`] - Key state and the per-tick [`InputFrame`]
//! - [`player`] - [`MotionStateMachine`] and its sensor, models, timers and events
//!
//! # Example
//!
//! ```ignore
//! use wallrun_engine::input::{InputFrame, KeyCode, MovementKeys};
//! use wallrun_engine::physics::{SimBody, StaticWorld};
//! use wallrun_engine::player::{ContactBatch, LocomotionConfig, MotionStateMachine};
//!
//! let mut world = StaticWorld::new();
//! world.add_floor(0.0, 50.0);
//! let mut body = SimBody::standing_on(0.0, 0.0, 0.0, 0.5, 1.8);
//!
//! let config = LocomotionConfig::default();
//! let mut controller = MotionStateMachine::spawn(config, &world, &body);
//! controller.events_mut().subscribe(|event| println!("{event}"));
//!
//! let mut keys = MovementKeys::new();
//! keys.handle_key(KeyCode::W, true);
//!
//! let mut contacts = ContactBatch::new();
//! for _ in 0..120 {
//!     let frame = InputFrame::from_keys(&mut keys, 0.0, &config.input);
//!     controller.tick(&world, &mut body, &frame, &contacts, 0.02);
//!     contacts = body.step(&world, 0.02).into();
//! }
//! ```

pub mod input;
pub mod physics;
pub mod player;

// Re-export commonly used input types
pub use input::{InputFrame, KeyCode, MovementKeys};
// Re-export the host-facing physics surface
pub use physics::{CharacterBody, ColliderId, ColliderTags, ForceMode, PhysicsQuery, SimBody, StaticWorld};
// Re-export player types
pub use player::{
    ContactBatch, LocomotionConfig, LocomotionEvent, Mode, MotionStateMachine, TickReport,
};
