//! Host capability traits.
//!
//! The locomotion core never owns a physics world. It asks the host for
//! shape-cast queries and drives the character's rigid body through
//! [`CharacterBody`]. [`StaticWorld`](super::StaticWorld) and
//! [`SimBody`](super::SimBody) are the in-crate implementations used by the
//! tests and the simulation binary.

use glam::Vec3;

use super::types::{ColliderId, ColliderTags, ForceMode, QueryHit};

/// Layer mask that matches every collider.
pub const ALL_LAYERS: u32 = u32::MAX;

/// Shape-cast queries against static level geometry.
pub trait PhysicsQuery {
    /// Sweep a sphere from `origin` along `direction` (normalized) for up to
    /// `max_distance`. Colliders already overlapping the sphere at `origin`
    /// are ignored.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layer_mask: u32,
    ) -> Option<QueryHit>;

    /// Cast a ray from `origin` along `direction` (normalized).
    fn ray_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: u32,
    ) -> Option<QueryHit>;

    /// Gameplay tags of a collider. Unknown colliders have no tags.
    fn collider_tags(&self, collider: ColliderId) -> ColliderTags;
}

/// The character's rigid body as seen by the controller.
pub trait CharacterBody {
    /// Capsule center in world space.
    fn position(&self) -> Vec3;

    fn velocity(&self) -> Vec3;

    /// Gravity acting on the body (e.g. `(0, -9.81, 0)`).
    fn gravity(&self) -> Vec3;

    fn add_force(&mut self, force: Vec3, mode: ForceMode);

    /// Passive linear damping coefficient used from the next step on.
    fn set_linear_damping(&mut self, damping: f32);

    /// Resize the capsule collider (crouching).
    fn set_capsule_height(&mut self, _height: f32) {}

    /// Hard reset used on respawn.
    fn teleport(&mut self, position: Vec3);
}
