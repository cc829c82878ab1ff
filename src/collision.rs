//! Spatial query result structures.
//!
//! These structures hold the results of environment ray casts used for
//! contact scanning and slope detection.

use bevy::prelude::*;

/// Information about a single ray cast against the static environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Normal of the surface at the hit point.
    pub normal: Vec2,
    /// World position of the hit point.
    pub point: Vec2,
    /// Entity that was hit (if the backend tracks one).
    pub entity: Option<Entity>,
}

impl RayHit {
    /// Create a hit result.
    pub fn new(distance: f32, normal: Vec2, point: Vec2, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }

    /// The hit distance with the scanner's breathing room removed.
    ///
    /// Negative when the ray origin sits closer to the surface than the
    /// breathing room allows, which the scanner reads as embedding.
    #[inline]
    pub fn adjusted_distance(&self, breathing_room: f32) -> f32 {
        self.distance - breathing_room
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hit_new() {
        let hit = RayHit::new(5.0, Vec2::Y, Vec2::new(10.0, 0.0), None);

        assert_eq!(hit.distance, 5.0);
        assert_eq!(hit.normal, Vec2::Y);
        assert_eq!(hit.point, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn ray_hit_with_entity() {
        let entity = Entity::from_raw(42);
        let hit = RayHit::new(3.0, Vec2::X, Vec2::ZERO, Some(entity));

        assert_eq!(hit.entity, Some(entity));
    }

    #[test]
    fn adjusted_distance_can_go_negative() {
        let hit = RayHit::new(0.15, Vec2::Y, Vec2::ZERO, None);
        assert!((hit.adjusted_distance(0.1) - 0.05).abs() < 1e-6);
        assert!(hit.adjusted_distance(0.2) < 0.0);
    }
}
