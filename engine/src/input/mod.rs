//! Input Module
//!
//! Platform-agnostic locomotion input. Key state is tracked with generic
//! key codes and turned into one [`InputFrame`] per simulation tick.
//!
//! # Example
//!
//! ```rust,ignore
//! use wallrun_engine::input::{InputFrame, KeyCode, MovementKeys};
//!
//! let mut keys = MovementKeys::new();
//! keys.handle_key(KeyCode::W, true);
//! keys.handle_key(KeyCode::Space, true);
//!
//! // Once per tick:
//! let frame = InputFrame::from_keys(&mut keys, yaw, &config.input);
//! controller.tick(&world, &mut body, &frame, &contacts, dt);
//! ```

pub mod frame;
pub mod keyboard;

pub use frame::{InputFrame, heading_axes};
pub use keyboard::{KeyCode, MovementKeys};
