//! Physics module
//!
//! Host-facing physics surface for the locomotion controller.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//! - Angles in configuration are degrees
//!
//! # Submodules
//!
//! - [`types`] - Vector types re-exported from glam, collider ids/tags, hits, contacts
//! - [`host`] - Capability traits the host must implement ([`PhysicsQuery`], [`CharacterBody`])
//! - [`collision`] - Box-collider [`StaticWorld`] implementing [`PhysicsQuery`]
//! - [`body`] - [`SimBody`] capsule integrator implementing [`CharacterBody`]

pub mod body;
pub mod collision;
pub mod host;
pub mod types;

pub use body::{STANDARD_GRAVITY, SimBody, StepContacts};
pub use collision::{BoxCollider, StaticWorld, aabb_surface_normal, ray_aabb_intersect};
pub use host::{ALL_LAYERS, CharacterBody, PhysicsQuery};
pub use types::{
    ColliderId, ColliderTags, ContactSample, DIRECTION_EPSILON, ForceMode, QueryHit, Quat, Vec2,
    Vec3, angle_deg, horizontal, move_towards, rotate_to_plane, with_horizontal,
};
