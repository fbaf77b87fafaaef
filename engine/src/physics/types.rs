//! Physics types shared between the locomotion core and its host.
//!
//! Vector math is re-exported from glam. The remaining types describe the
//! narrow surface the controller needs from a physics engine: collider
//! identity and tags, query hits, contact samples and force semantics.

pub use glam::{Quat, Vec2, Vec3};

/// Below this length a direction or normal is treated as degenerate.
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// Opaque handle for a collider owned by the host physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

/// Gameplay tags attached to a collider.
///
/// Mirrors the tag strings level designers put on geometry:
/// `NoWallrun`, `InfiniteWallrun` and `Player`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColliderTags {
    /// Wall-running on this surface is never allowed.
    pub no_wallrun: bool,
    /// The wall-run timer does not run down on this surface.
    pub infinite_wallrun: bool,
    /// Another character's body.
    pub player: bool,
}

impl ColliderTags {
    /// Tags for plain level geometry.
    pub const NONE: Self = Self {
        no_wallrun: false,
        infinite_wallrun: false,
        player: false,
    };

    /// Whether a contact with this collider may start a wall-run.
    pub fn allows_wallrun(&self) -> bool {
        !self.no_wallrun && !self.player
    }
}

/// How a force passed to [`CharacterBody::add_force`](super::CharacterBody::add_force)
/// is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous acceleration in m/s^2, integrated over the physics step.
    Acceleration,
    /// Instantaneous velocity change in m/s.
    VelocityChange,
}

/// Result of a ray or sphere cast against the host world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryHit {
    /// World-space contact point on the hit surface
    pub point: Vec3,
    /// Surface normal at the contact (normalized)
    pub normal: Vec3,
    /// Collider that was hit
    pub collider: ColliderId,
    /// Distance travelled along the cast direction
    pub distance: f32,
}

/// One contact reported by the host's collision callbacks for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSample {
    pub normal: Vec3,
    pub collider: ColliderId,
    pub point: Vec3,
    pub relative_velocity: Vec3,
}

impl ContactSample {
    pub fn new(normal: Vec3, collider: ColliderId, point: Vec3) -> Self {
        Self {
            normal,
            collider,
            point,
            relative_velocity: Vec3::ZERO,
        }
    }
}

/// Unsigned angle between two vectors in degrees.
///
/// Returns 0 if either vector is degenerate.
pub fn angle_deg(a: Vec3, b: Vec3) -> f32 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom < DIRECTION_EPSILON * DIRECTION_EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Horizontal (XZ) part of a vector.
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Replace the horizontal part of `v` keeping its vertical component.
#[inline]
pub fn with_horizontal(v: Vec3, horiz: Vec3) -> Vec3 {
    Vec3::new(horiz.x, v.y, horiz.z)
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist < f32::EPSILON {
        target
    } else {
        current + delta / dist * max_delta
    }
}

/// Rotate `v` by the rotation that carries world-up onto `normal`.
///
/// Horizontal wish directions end up lying in the plane perpendicular to
/// `normal`; pushing into a vertical wall becomes climbing up it.
pub fn rotate_to_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let n = normal.normalize_or_zero();
    if n == Vec3::ZERO {
        return v;
    }
    Quat::from_rotation_arc(Vec3::Y, n) * v
}
