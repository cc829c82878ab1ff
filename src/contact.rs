//! Contact scanning.
//!
//! Every tick, four fans of parallel rays are cast outward from the edges
//! of the character's bounding box. The shortest adjusted hit distance per
//! edge becomes that edge's clearance, and the four contact flags derive
//! from comparing each clearance against a small epsilon band. A fan rather
//! than a single ray avoids tunneling through corners and narrow gaps at
//! the box edges.

use bevy::prelude::*;

use crate::collision::RayHit;
use crate::config::ScanConfig;

/// Sentinel clearance recorded when no ray of a fan hits anything.
///
/// Never treat this value as a measured hit.
pub const MAX_CLEARANCE: f32 = 10.0;

/// Half-width of the contact band: a clearance in `[-EPSILON, EPSILON)`
/// counts as touching. The band tolerates floating-point jitter and slight
/// embedding on either side of the surface.
pub const CONTACT_EPSILON: f32 = 0.02;

/// The character's axis-aligned bounding box for one tick.
///
/// Corners are recomputed from the owner's current position every tick;
/// the box itself carries no per-tick state.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    /// Center position in world space.
    pub center: Vec2,
    /// Half the box width.
    pub half_width: f32,
    /// Half the box height.
    pub half_height: f32,
}

impl BoundingBox {
    /// Build the box around `center` using the scan configuration's
    /// dimensions.
    pub fn new(center: Vec2, config: &ScanConfig) -> Self {
        Self {
            center,
            half_width: config.width / 2.0,
            half_height: config.height / 2.0,
        }
    }

    /// Top-left corner.
    #[inline]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.center.x - self.half_width, self.center.y + self.half_height)
    }

    /// Bottom-right corner.
    #[inline]
    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.center.x + self.half_width, self.center.y - self.half_height)
    }

    /// Bottom-left corner.
    #[inline]
    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.center.x - self.half_width, self.center.y - self.half_height)
    }
}

/// Per-tick contact scan results.
///
/// Fully recomputed every tick by the scanner; nothing here persists across
/// ticks. Clearances start at [`MAX_CLEARANCE`] and only move down when a
/// ray actually hits.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ContactState {
    /// Shortest adjusted hit distance above the box.
    pub clearance_up: f32,
    /// Shortest adjusted hit distance below the box.
    pub clearance_down: f32,
    /// Shortest adjusted hit distance to the left of the box.
    pub clearance_left: f32,
    /// Shortest adjusted hit distance to the right of the box.
    pub clearance_right: f32,

    /// Standing on (or within the contact band of) a floor.
    pub grounded: bool,
    /// Touching a wall on the left.
    pub wall_left: bool,
    /// Touching a wall on the right.
    pub wall_right: bool,
    /// Touching a ceiling.
    pub ceiling: bool,
}

impl Default for ContactState {
    fn default() -> Self {
        Self {
            clearance_up: MAX_CLEARANCE,
            clearance_down: MAX_CLEARANCE,
            clearance_left: MAX_CLEARANCE,
            clearance_right: MAX_CLEARANCE,
            grounded: false,
            wall_left: false,
            wall_right: false,
            ceiling: false,
        }
    }
}

impl ContactState {
    /// Whether a clearance falls inside the contact band.
    #[inline]
    pub fn in_contact_band(clearance: f32) -> bool {
        clearance < CONTACT_EPSILON && clearance >= -CONTACT_EPSILON
    }

    /// Derive the four contact flags from the current clearances.
    pub fn refresh_flags(&mut self) {
        self.grounded = Self::in_contact_band(self.clearance_down);
        self.wall_right = Self::in_contact_band(self.clearance_right);
        self.wall_left = Self::in_contact_band(self.clearance_left);
        self.ceiling = Self::in_contact_band(self.clearance_up);
    }
}

/// Cast one fan of parallel rays and return the shortest adjusted hit
/// distance, or [`MAX_CLEARANCE`] if every ray misses.
///
/// Ray `i` starts at `origin + spacing_direction * spacing * i` and fires
/// along `ray_direction`; `breathing_room` is subtracted from each raw hit.
pub fn fan_clearance(
    origin: Vec2,
    ray_direction: Vec2,
    spacing_direction: Vec2,
    spacing: f32,
    count: u32,
    breathing_room: f32,
    cast: &mut impl FnMut(Vec2, Vec2) -> Option<RayHit>,
) -> f32 {
    let mut shortest = MAX_CLEARANCE;
    for i in 0..count {
        let ray_origin = origin + spacing_direction * (spacing * i as f32);
        if let Some(hit) = cast(ray_origin, ray_direction) {
            let adjusted = hit.adjusted_distance(breathing_room);
            if adjusted < shortest {
                shortest = adjusted;
            }
        }
    }
    shortest
}

/// Scan all four edges of the box and derive the contact flags.
///
/// Fan layout: the top fan walks rightward from the top-left corner, the
/// bottom fan leftward from the bottom-right corner, the left fan downward
/// from the top-left corner, and the right fan upward from the
/// bottom-right corner.
pub fn scan(
    bounds: &BoundingBox,
    config: &ScanConfig,
    cast: &mut impl FnMut(Vec2, Vec2) -> Option<RayHit>,
) -> ContactState {
    let mut contacts = ContactState::default();

    contacts.clearance_up = fan_clearance(
        bounds.top_left(),
        Vec2::Y,
        Vec2::X,
        config.up_ray_spacing(),
        config.up_ray_count,
        config.breathing_room,
        &mut *cast,
    );
    contacts.clearance_down = fan_clearance(
        bounds.bottom_right(),
        Vec2::NEG_Y,
        Vec2::NEG_X,
        config.down_ray_spacing(),
        config.down_ray_count,
        config.breathing_room,
        &mut *cast,
    );
    contacts.clearance_left = fan_clearance(
        bounds.top_left(),
        Vec2::NEG_X,
        Vec2::NEG_Y,
        config.left_ray_spacing(),
        config.left_ray_count,
        config.breathing_room,
        &mut *cast,
    );
    contacts.clearance_right = fan_clearance(
        bounds.bottom_right(),
        Vec2::X,
        Vec2::Y,
        config.right_ray_spacing(),
        config.right_ray_count,
        config.breathing_room,
        &mut *cast,
    );

    contacts.refresh_flags();
    contacts
}
