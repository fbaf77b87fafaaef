//! Reference rigid body for a capsule character.
//!
//! `SimBody` integrates gravity, continuous accelerations and linear damping,
//! then resolves penetration against a [`StaticWorld`] by treating the capsule
//! as its bounding box. Each step returns the contact batch a physics engine's
//! collision callbacks would report, so the controller can be driven end to end
//! without an external engine.
//!
//! Position is integrated with the midpoint of old and new velocity.

use std::collections::BTreeSet;

use glam::Vec3;

use super::collision::StaticWorld;
use super::host::CharacterBody;
use super::types::{ColliderId, ContactSample, ForceMode};

/// Standard gravity in meters per second squared
pub const STANDARD_GRAVITY: f32 = 9.81;

/// Gap below which a resting body still counts as touching a surface
const CONTACT_SKIN: f32 = 0.01;

/// Contacts produced by one physics step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepContacts {
    /// Contacts touching the body after this step, in collider order
    pub samples: Vec<ContactSample>,
    /// Colliders touched last step but not this one
    pub exited: Vec<ColliderId>,
}

/// Capsule-shaped rigid body integrated against static boxes.
#[derive(Debug, Clone)]
pub struct SimBody {
    position: Vec3,
    velocity: Vec3,
    gravity: Vec3,
    radius: f32,
    height: f32,
    linear_damping: f32,
    pending_acceleration: Vec3,
    touching: BTreeSet<ColliderId>,
}

impl SimBody {
    /// Create a body whose capsule center is at `position`.
    pub fn new(position: Vec3, radius: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            gravity: Vec3::new(0.0, -STANDARD_GRAVITY, 0.0),
            radius,
            height,
            linear_damping: 0.0,
            pending_acceleration: Vec3::ZERO,
            touching: BTreeSet::new(),
        }
    }

    /// Create a body standing on a surface whose top is at `ground_y`.
    pub fn standing_on(ground_y: f32, x: f32, z: f32, radius: f32, height: f32) -> Self {
        Self::new(Vec3::new(x, ground_y + height * 0.5, z), radius, height)
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn linear_damping(&self) -> f32 {
        self.linear_damping
    }

    fn half_extents(&self) -> Vec3 {
        Vec3::new(self.radius, self.height * 0.5, self.radius)
    }

    /// Advance the body by `dt` and resolve collisions.
    ///
    /// Accelerations queued with [`ForceMode::Acceleration`] are consumed.
    pub fn step(&mut self, world: &StaticWorld, dt: f32) -> StepContacts {
        let dt = dt.clamp(0.0001, 0.1);

        let prev_velocity = self.velocity;
        self.velocity += (self.gravity + self.pending_acceleration) * dt;
        self.pending_acceleration = Vec3::ZERO;
        self.velocity *= (1.0 - self.linear_damping * dt).max(0.0);

        self.position += (prev_velocity + self.velocity) * 0.5 * dt;

        self.resolve(world)
    }

    fn resolve(&mut self, world: &StaticWorld) -> StepContacts {
        let mut samples = Vec::new();
        let mut now_touching = BTreeSet::new();

        for collider in world.colliders() {
            let half = self.half_extents();
            let body_min = self.position - half;
            let body_max = self.position + half;

            // Signed overlap per axis; negative means separated by that gap.
            let overlap_pos = collider.max - body_min;
            let overlap_neg = body_max - collider.min;
            let overlap = overlap_pos.min(overlap_neg);
            if overlap.min_element() < -CONTACT_SKIN {
                continue;
            }

            let (axis, depth) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
                (0, overlap.x)
            } else if overlap.y <= overlap.z {
                (1, overlap.y)
            } else {
                (2, overlap.z)
            };
            // Push toward whichever side needs the smaller correction.
            let sign = if overlap_pos[axis] < overlap_neg[axis] { 1.0 } else { -1.0 };
            let mut normal = Vec3::ZERO;
            normal[axis] = sign;

            let relative_velocity = self.velocity;
            if depth > 0.0 {
                self.position += normal * depth;
            }
            let into_surface = self.velocity.dot(normal);
            if into_surface < 0.0 {
                self.velocity -= normal * into_surface;
            }

            now_touching.insert(collider.id);
            samples.push(ContactSample {
                normal,
                collider: collider.id,
                point: collider.closest_point(self.position),
                relative_velocity,
            });
        }

        let exited = self.touching.difference(&now_touching).copied().collect();
        self.touching = now_touching;

        StepContacts { samples, exited }
    }
}

impl CharacterBody for SimBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        match mode {
            ForceMode::Acceleration => self.pending_acceleration += force,
            ForceMode::VelocityChange => self.velocity += force,
        }
    }

    fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping.max(0.0);
    }

    fn set_capsule_height(&mut self, height: f32) {
        // Keep the feet planted while the capsule shrinks or grows.
        let feet = self.position.y - self.height * 0.5;
        self.height = height;
        self.position.y = feet + height * 0.5;
    }

    fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.pending_acceleration = Vec3::ZERO;
        self.touching.clear();
    }
}
