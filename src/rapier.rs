//! Rapier2D environment backend implementation.
//!
//! This module provides the environment backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::backend::{EnvironmentBackend, NoOpBackendPlugin};
use crate::collision::RayHit;

/// Rapier2D environment backend for the character controller.
///
/// Ray queries go through the world's [`RapierContext`]; the character's
/// own collider is excluded from every cast, as are sensors. The backend
/// adds no systems of its own, since Rapier's plugin owns the simulation
/// context.
pub struct Rapier2dBackend;

impl Rapier2dBackend {
    fn context(world: &World) -> Option<&RapierContext> {
        world
            .iter_entities()
            .find_map(|entity| entity.get::<RapierContext>())
    }
}

impl EnvironmentBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        NoOpBackendPlugin
    }

    fn raycast(
        world: &World,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        exclude_entity: Entity,
        collision_groups: Option<(u32, u32)>,
    ) -> Option<RayHit> {
        let context = Self::context(world)?;

        let mut filter = QueryFilter::default()
            .exclude_rigid_body(exclude_entity)
            .exclude_sensors();
        if let Some((memberships, filters)) = collision_groups {
            filter = filter.groups(CollisionGroups::new(
                Group::from_bits_truncate(memberships),
                Group::from_bits_truncate(filters),
            ));
        }

        context
            .cast_ray_and_get_normal(origin, direction, max_distance, true, filter)
            .map(|(hit_entity, intersection)| {
                RayHit::new(
                    intersection.time_of_impact,
                    intersection.normal,
                    intersection.point,
                    Some(hit_entity),
                )
            })
    }

    fn get_collision_groups(world: &World, entity: Entity) -> Option<(u32, u32)> {
        world
            .get::<CollisionGroups>(entity)
            .map(|cg| (cg.memberships.bits(), cg.filters.bits()))
    }
}
