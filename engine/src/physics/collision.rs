//! Static collision world
//!
//! A minimal host world made of axis-aligned boxes. It answers the ray and
//! sphere casts the locomotion sensors issue and is what the simulation
//! binary and the integration tests run against.
//!
//! # Ray-AABB Intersection
//!
//! The slab method is used for ray-AABB intersection, which finds the
//! intersection points by computing entry and exit times for each axis.
//! Sphere casts are answered by casting the sphere's center against the box
//! grown by the sphere radius (box corners stay square).
//!
//! # Example
//!
//! ```ignore
//! use wallrun_engine::physics::{StaticWorld, PhysicsQuery, ALL_LAYERS};
//! use glam::Vec3;
//!
//! let mut world = StaticWorld::new();
//! let floor = world.add_floor(0.0, 50.0);
//!
//! let hit = world.ray_cast(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 5.0, ALL_LAYERS);
//! assert_eq!(hit.map(|h| h.collider), Some(floor));
//! ```

use glam::Vec3;

use super::host::PhysicsQuery;
use super::types::{ColliderId, ColliderTags, QueryHit};

/// Performs ray-AABB (Axis-Aligned Bounding Box) intersection test using the slab method.
///
/// The slab method works by finding the intersection of the ray with each pair of
/// axis-aligned planes that make up the AABB. If the ray enters and exits the AABB
/// at valid times (t_enter < t_exit and t_exit > 0), there is an intersection.
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Handle near-zero directions by using large values
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min.x - ray_origin.x) * inv_dir.x;
    let t2 = (aabb_max.x - ray_origin.x) * inv_dir.x;

    let mut t_min = t1.min(t2);
    let mut t_max = t1.max(t2);

    let t3 = (aabb_min.y - ray_origin.y) * inv_dir.y;
    let t4 = (aabb_max.y - ray_origin.y) * inv_dir.y;

    t_min = t_min.max(t3.min(t4));
    t_max = t_max.min(t3.max(t4));

    let t5 = (aabb_min.z - ray_origin.z) * inv_dir.z;
    let t6 = (aabb_max.z - ray_origin.z) * inv_dir.z;

    t_min = t_min.max(t5.min(t6));
    t_max = t_max.min(t5.max(t6));

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Ray starts inside the AABB
            Some(t_max)
        }
    } else {
        None
    }
}

/// Computes the outward surface normal for a point on an AABB surface.
///
/// Picks the face whose normalized coordinate has the largest magnitude.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let local = point - center;

    let normalized = local / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.x && abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Whether `point` lies strictly inside the box.
fn aabb_contains(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> bool {
    point.cmpgt(aabb_min).all() && point.cmplt(aabb_max).all()
}

/// An axis-aligned box collider with gameplay tags and a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub id: ColliderId,
    pub min: Vec3,
    pub max: Vec3,
    pub tags: ColliderTags,
    /// Layer bits, tested against a query's layer mask
    pub layer: u32,
}

impl BoxCollider {
    /// Closest point on (or in) the box to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    fn matches(&self, layer_mask: u32) -> bool {
        self.layer & layer_mask != 0
    }
}

/// Collection of static box colliders.
#[derive(Debug, Clone, Default)]
pub struct StaticWorld {
    colliders: Vec<BoxCollider>,
    next_id: u32,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an untagged box on layer 1.
    pub fn add_box(&mut self, min: Vec3, max: Vec3) -> ColliderId {
        self.add_box_with(min, max, ColliderTags::NONE, 1)
    }

    pub fn add_box_with(&mut self, min: Vec3, max: Vec3, tags: ColliderTags, layer: u32) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.colliders.push(BoxCollider {
            id,
            min: min.min(max),
            max: min.max(max),
            tags,
            layer,
        });
        id
    }

    /// Adds a 1m thick floor slab whose top surface is at `top_y`.
    pub fn add_floor(&mut self, top_y: f32, half_size: f32) -> ColliderId {
        self.add_box(
            Vec3::new(-half_size, top_y - 1.0, -half_size),
            Vec3::new(half_size, top_y, half_size),
        )
    }

    pub fn get(&self, id: ColliderId) -> Option<&BoxCollider> {
        self.colliders.iter().find(|c| c.id == id)
    }

    pub fn colliders(&self) -> &[BoxCollider] {
        &self.colliders
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl PhysicsQuery for StaticWorld {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layer_mask: u32,
    ) -> Option<QueryHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let mut best: Option<QueryHit> = None;
        for collider in self.colliders.iter().filter(|c| c.matches(layer_mask)) {
            let grown_min = collider.min - Vec3::splat(radius);
            let grown_max = collider.max + Vec3::splat(radius);
            if aabb_contains(origin, grown_min, grown_max) {
                continue;
            }
            let Some(t) = ray_aabb_intersect(origin, dir, grown_min, grown_max) else {
                continue;
            };
            if t > max_distance || best.is_some_and(|b| b.distance <= t) {
                continue;
            }
            let center = origin + dir * t;
            best = Some(QueryHit {
                point: collider.closest_point(center),
                normal: aabb_surface_normal(center, grown_min, grown_max),
                collider: collider.id,
                distance: t,
            });
        }
        best
    }

    fn ray_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: u32,
    ) -> Option<QueryHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let mut best: Option<QueryHit> = None;
        for collider in self.colliders.iter().filter(|c| c.matches(layer_mask)) {
            if aabb_contains(origin, collider.min, collider.max) {
                continue;
            }
            let Some(t) = ray_aabb_intersect(origin, dir, collider.min, collider.max) else {
                continue;
            };
            if t > max_distance || best.is_some_and(|b| b.distance <= t) {
                continue;
            }
            let point = origin + dir * t;
            best = Some(QueryHit {
                point,
                normal: aabb_surface_normal(point, collider.min, collider.max),
                collider: collider.id,
                distance: t,
            });
        }
        best
    }

    fn collider_tags(&self, collider: ColliderId) -> ColliderTags {
        self.get(collider).map(|c| c.tags).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::host::ALL_LAYERS;

    #[test]
    fn test_ray_hits_aabb_from_front() {
        let t = ray_aabb_intersect(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!((t.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_aabb() {
        let t = ray_aabb_intersect(
            Vec3::new(5.0, 0.0, -5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_surface_normal_faces() {
        let n = aabb_surface_normal(Vec3::new(1.0, 0.2, 0.1), Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(n, Vec3::X);
        let n = aabb_surface_normal(Vec3::new(0.1, 1.0, -0.3), Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(n, Vec3::Y);
    }

    #[test]
    fn test_ray_cast_nearest_collider() {
        let mut world = StaticWorld::new();
        let floor = world.add_floor(0.0, 10.0);
        let _deeper = world.add_floor(-3.0, 10.0);

        let hit = world
            .ray_cast(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 10.0, ALL_LAYERS)
            .unwrap();
        assert_eq!(hit.collider, floor);
        assert!((hit.distance - 2.0).abs() < 1e-4);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_ray_cast_respects_distance_and_mask() {
        let mut world = StaticWorld::new();
        world.add_box_with(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            ColliderTags::NONE,
            0b10,
        );

        let origin = Vec3::new(0.0, 2.0, 0.0);
        assert!(world.ray_cast(origin, -Vec3::Y, 1.5, ALL_LAYERS).is_none());
        assert!(world.ray_cast(origin, -Vec3::Y, 5.0, 0b01).is_none());
        assert!(world.ray_cast(origin, -Vec3::Y, 5.0, 0b10).is_some());
    }

    #[test]
    fn test_sphere_cast_reports_surface_point() {
        let mut world = StaticWorld::new();
        let floor = world.add_floor(0.0, 10.0);

        let hit = world
            .sphere_cast(Vec3::new(0.0, 2.0, 0.0), 0.5, -Vec3::Y, 5.0, ALL_LAYERS)
            .unwrap();
        assert_eq!(hit.collider, floor);
        assert!((hit.distance - 1.5).abs() < 1e-4);
        assert!((hit.point - Vec3::ZERO).length() < 1e-4);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_sphere_cast_ignores_initial_overlap() {
        let mut world = StaticWorld::new();
        world.add_floor(0.0, 10.0);

        // Sphere already intersecting the floor
        let hit = world.sphere_cast(Vec3::new(0.0, 0.2, 0.0), 0.5, -Vec3::Y, 5.0, ALL_LAYERS);
        assert!(hit.is_none());
    }

    #[test]
    fn test_collider_tags_lookup() {
        let mut world = StaticWorld::new();
        let tags = ColliderTags {
            no_wallrun: true,
            ..Default::default()
        };
        let id = world.add_box_with(Vec3::ZERO, Vec3::ONE, tags, 1);
        assert_eq!(world.collider_tags(id), tags);
        assert_eq!(world.collider_tags(ColliderId(99)), ColliderTags::NONE);
    }
}
