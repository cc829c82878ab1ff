//! Environment query abstraction.
//!
//! This module defines the trait that environment backends must implement
//! to work with the character controller. The controller only ever asks
//! the environment what a single ray hits, so swapping physics engines
//! (Rapier2D, a tile grid, a test double) is a matter of implementing a
//! single method.

use bevy::prelude::*;

use crate::collision::RayHit;

/// Trait for environment backend implementations.
///
/// Implement this trait to let the character controller probe a static
/// environment. The controller casts many rays per tick (contact fans and
/// slope probes), always sequentially from a single thread, and expects
/// deterministic results for a static scene within one tick.
///
/// # Example
///
/// For an example implementation, see the `rapier` module's
/// `Rapier2dBackend`, which implements this trait for Bevy Rapier2D.
pub trait EnvironmentBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Cast a single ray against the static environment.
    ///
    /// # Arguments
    /// * `world` - The ECS world for queries
    /// * `origin` - Ray origin in world space
    /// * `direction` - Cast direction (should be normalized)
    /// * `max_distance` - Maximum cast distance
    /// * `exclude_entity` - Entity to exclude from the cast (usually self)
    /// * `collision_groups` - Optional collision groups for filtering (memberships, filters)
    fn raycast(
        world: &World,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        exclude_entity: Entity,
        collision_groups: Option<(u32, u32)>,
    ) -> Option<RayHit>;

    /// Get the fixed timestep delta time.
    fn fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }

    /// Get the collision groups for an entity (memberships, filters).
    /// Returns None if the entity doesn't have collision groups.
    fn get_collision_groups(_world: &World, _entity: Entity) -> Option<(u32, u32)> {
        // Default implementation returns None
        None
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
