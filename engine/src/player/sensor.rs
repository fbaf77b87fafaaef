//! Ground and wall sensing
//!
//! Stateless queries over the host's [`PhysicsQuery`] plus the contact
//! classification used on collision callbacks. Nothing here mutates the
//! motion state; the state machine decides what a hit (or a miss) means.
//!
//! # Queries
//!
//! - [`GroundWallSensor::check_ground`] - sphere sweep below the capsule
//! - [`GroundWallSensor::vector_to_wall`] - short ray from the capsule top
//!   into the wall currently being run on
//! - [`GroundWallSensor::vector_to_ground`] - straight-down ray used to keep
//!   wall-runs from starting (or continuing) right above the floor

use glam::Vec3;

use crate::physics::{ALL_LAYERS, ColliderId, ContactSample, PhysicsQuery, QueryHit, angle_deg};

use super::config::LocomotionConfig;
use super::crouch::CapsuleShape;

/// Classification of a contact normal by its angle to world-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactClass {
    /// Angle below the wall/floor barrier
    Floor,
    /// Between the barrier and the ceiling limit
    Wall,
    /// Ceilings and overhangs
    Other,
}

/// What a tick's collision callbacks amount to after folding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactVerdict {
    /// Nothing usable was touched
    None,
    /// First floor-like contact of the batch
    Floor(ContactSample),
    /// First wall-like contact that may start a wall-run
    Wall(ContactSample),
}

/// Contacts reported by the host for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactBatch {
    /// Contacts touching the character this tick, in engine order
    pub samples: Vec<ContactSample>,
    /// Colliders the character stopped touching this tick
    pub exited: Vec<ColliderId>,
}

impl ContactBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: Vec<ContactSample>) -> Self {
        Self {
            samples,
            exited: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() && self.exited.is_empty()
    }
}

impl From<crate::physics::StepContacts> for ContactBatch {
    fn from(contacts: crate::physics::StepContacts) -> Self {
        Self {
            samples: contacts.samples,
            exited: contacts.exited,
        }
    }
}

/// Result of probing the wall being run on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallProbe {
    /// From the capsule top to the wall hit point
    pub offset: Vec3,
    /// Wall normal at the hit point
    pub normal: Vec3,
}

/// Ground and wall queries parameterized by the sensing tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundWallSensor {
    wall_floor_barrier: f32,
    wall_ceiling_limit: f32,
    wall_follow_angle: f32,
    ground_check_distance: f32,
    ground_cast_radius_scale: f32,
    ground_mask: u32,
    wall_probe_distance: f32,
}

impl GroundWallSensor {
    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self {
            wall_floor_barrier: config.sensing.wall_floor_barrier,
            wall_ceiling_limit: config.sensing.wall_ceiling_limit,
            wall_follow_angle: config.sensing.wall_follow_angle,
            ground_check_distance: config.sensing.ground_check_distance,
            ground_cast_radius_scale: config.sensing.ground_cast_radius_scale,
            ground_mask: config.sensing.ground_mask,
            wall_probe_distance: config.wall.stick_distance,
        }
    }

    pub fn wall_floor_barrier(&self) -> f32 {
        self.wall_floor_barrier
    }

    /// Classify a contact normal.
    pub fn classify(&self, normal: Vec3) -> ContactClass {
        let angle = angle_deg(normal, Vec3::Y);
        if angle < self.wall_floor_barrier {
            ContactClass::Floor
        } else if angle > self.wall_floor_barrier && angle < self.wall_ceiling_limit {
            ContactClass::Wall
        } else {
            ContactClass::Other
        }
    }

    #[inline]
    pub fn is_floor_like(&self, normal: Vec3) -> bool {
        self.classify(normal) == ContactClass::Floor
    }

    /// Fold one tick's contacts into a single verdict.
    ///
    /// The first floor-like contact wins outright. Otherwise, unless the
    /// character is walking, the first wall-like contact whose collider
    /// allows wall-running is returned.
    pub fn fold_contacts<Q: PhysicsQuery>(
        &self,
        world: &Q,
        samples: &[ContactSample],
        walking: bool,
    ) -> ContactVerdict {
        if let Some(floor) = samples.iter().find(|c| self.is_floor_like(c.normal)) {
            return ContactVerdict::Floor(*floor);
        }
        if walking {
            return ContactVerdict::None;
        }
        samples
            .iter()
            .filter(|c| world.collider_tags(c.collider).allows_wallrun())
            .find(|c| self.classify(c.normal) == ContactClass::Wall)
            .map_or(ContactVerdict::None, |c| ContactVerdict::Wall(*c))
    }

    /// Sweep a sphere down from inside the capsule looking for floor.
    ///
    /// Only hits whose normal is floor-like are accepted.
    pub fn check_ground<Q: PhysicsQuery>(
        &self,
        world: &Q,
        position: Vec3,
        capsule: CapsuleShape,
    ) -> Option<QueryHit> {
        let origin = position + Vec3::Y * capsule.radius;
        let cast_radius = capsule.radius * self.ground_cast_radius_scale;
        let distance = capsule.height * 0.5 - capsule.radius + self.ground_check_distance;

        let hit = world.sphere_cast(origin, cast_radius, -Vec3::Y, distance.max(0.0), self.ground_mask)?;
        if self.is_floor_like(hit.normal) {
            log::trace!("ground hit {:?} at {:.3}m", hit.collider, hit.distance);
            Some(hit)
        } else {
            None
        }
    }

    /// Probe the wall being run on.
    ///
    /// Casts from the capsule top along `-wall_normal`. The hit must be on the
    /// same collider as `wall` and its normal must stay within the follow
    /// angle of `wall_normal`; anything else means the wall is lost.
    pub fn vector_to_wall<Q: PhysicsQuery>(
        &self,
        world: &Q,
        position: Vec3,
        capsule: CapsuleShape,
        wall_normal: Vec3,
        wall: Option<ColliderId>,
    ) -> Option<WallProbe> {
        let wall = wall?;
        let direction = -wall_normal.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let origin = position + Vec3::Y * capsule.height * 0.5;

        let hit = world.ray_cast(origin, direction, self.wall_probe_distance, ALL_LAYERS)?;
        if hit.collider != wall || angle_deg(wall_normal, hit.normal) >= self.wall_follow_angle {
            return None;
        }
        Some(WallProbe {
            offset: hit.point - origin,
            normal: hit.normal,
        })
    }

    /// Offset from the capsule center to the ground straight below, if the
    /// ground is within the wall probe distance.
    pub fn vector_to_ground<Q: PhysicsQuery>(&self, world: &Q, position: Vec3) -> Option<Vec3> {
        world
            .ray_cast(position, -Vec3::Y, self.wall_probe_distance, ALL_LAYERS)
            .map(|hit| hit.point - position)
    }
}
