//! Slope detection and slope-following.
//!
//! Two independent probe passes run each tick on top of the contact scan:
//! a side probe from the lower corners that recognizes climbable up-slopes,
//! and a downward probe from the bottom corners that recognizes descendable
//! down-slopes. When either recognizes a slope, straight-line horizontal
//! motion is projected onto the surface so the box follows the terrain
//! contour instead of stepping through it or free-falling off it.

use bevy::prelude::*;

use crate::collision::RayHit;
use crate::contact::{BoundingBox, ContactState};

/// How close a side-probe hit must be for a surface to count as a climb
/// candidate.
pub const SIDE_PROBE_RANGE: f32 = 0.075;

/// Margin subtracted from a down-probe hit before the descend distance
/// check.
pub const DESCEND_MARGIN: f32 = 0.1;

/// Per-tick slope detection results.
///
/// Angles are in degrees; `0` means no slope was detected on that corner
/// this tick. The down angles persist while a descend stays recognized and
/// reset together when none is.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct SlopeState {
    /// Up-slope angle ahead of the left side.
    pub up_left: f32,
    /// Up-slope angle ahead of the right side.
    pub up_right: f32,
    /// Down-slope angle under the left corner.
    pub down_left: f32,
    /// Down-slope angle under the right corner.
    pub down_right: f32,

    /// A climbable up-slope was recognized.
    pub climbing: bool,
    /// A descendable down-slope was recognized.
    pub descending: bool,
}

/// Unsigned angle in degrees between a surface normal and world up.
#[inline]
pub fn angle_from_up(normal: Vec2) -> f32 {
    normal.dot(Vec2::Y).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Probe for a climbable slope beside the lower corners.
///
/// One ray fires rightward from the bottom-right corner and one leftward
/// from the bottom-left corner; the right probe short-circuits the left
/// one, so at most one side qualifies per tick. A qualifying side marks
/// climbing and suppresses that side's wall flag so wall-stop logic does
/// not fire on a walkable slope.
pub fn probe_side_slopes(
    slopes: &mut SlopeState,
    contacts: &mut ContactState,
    bounds: &BoundingBox,
    max_slope_angle: f32,
    cast: &mut impl FnMut(Vec2, Vec2) -> Option<RayHit>,
) {
    slopes.up_right = 0.0;
    slopes.up_left = 0.0;

    if let Some(hit) = cast(bounds.bottom_right(), Vec2::X) {
        if hit.distance <= SIDE_PROBE_RANGE {
            slopes.up_right = angle_from_up(hit.normal);
            if slopes.up_right <= max_slope_angle {
                slopes.climbing = true;
                contacts.wall_right = false;
            }
            return;
        }
    }

    if let Some(hit) = cast(bounds.bottom_left(), Vec2::NEG_X) {
        if hit.distance <= SIDE_PROBE_RANGE {
            slopes.up_left = angle_from_up(hit.normal);
            if slopes.up_left <= max_slope_angle {
                slopes.climbing = true;
                contacts.wall_left = false;
            }
            return;
        }
    }

    slopes.climbing = false;
}

/// Probe for a descendable slope under the bottom corners.
///
/// A descend is recognized when the surface angle is nonzero, walkable,
/// and the corner is close enough to the surface scaled by how fast the
/// box moves across it: `distance - margin <= tan(angle) * |vx|`. While
/// recognized, the box counts as grounded so it snaps down the slope
/// instead of free-falling.
pub fn probe_down_slopes(
    slopes: &mut SlopeState,
    contacts: &mut ContactState,
    bounds: &BoundingBox,
    max_slope_angle: f32,
    velocity_x: f32,
    cast: &mut impl FnMut(Vec2, Vec2) -> Option<RayHit>,
) {
    let mut recognized = false;

    if let Some(hit) = cast(bounds.bottom_right(), Vec2::NEG_Y) {
        let angle = angle_from_up(hit.normal);
        if angle != 0.0
            && angle <= max_slope_angle
            && hit.distance - DESCEND_MARGIN <= angle.to_radians().tan() * velocity_x.abs()
        {
            slopes.down_right = angle;
            recognized = true;
            slopes.descending = true;
            contacts.grounded = true;
        }
    }

    if let Some(hit) = cast(bounds.bottom_left(), Vec2::NEG_Y) {
        let angle = angle_from_up(hit.normal);
        if angle != 0.0
            && angle <= max_slope_angle
            && hit.distance - DESCEND_MARGIN <= angle.to_radians().tan() * velocity_x.abs()
        {
            slopes.down_left = angle;
            recognized = true;
            slopes.descending = true;
            contacts.grounded = true;
        }
    }

    if !recognized {
        slopes.down_left = 0.0;
        slopes.down_right = 0.0;
        slopes.descending = false;
    }
}

/// Project a horizontal candidate velocity onto the detected slope.
///
/// The angle is chosen by travel direction: moving left prefers the
/// up-left climb angle, falling back to the down-right descend angle;
/// moving right mirrors that. Descend cases invert the vertical sign so
/// the box tracks down the surface.
pub fn follow_slope(velocity: Vec2, slopes: &SlopeState, x_speed: f32) -> Vec2 {
    let distance = velocity.x.abs();

    let (angle, y_modifier) = if velocity.x < 0.0 && slopes.up_left != 0.0 {
        (slopes.up_left, 1.0)
    } else if velocity.x < 0.0 && slopes.down_right != 0.0 {
        (slopes.down_right, -1.0)
    } else if velocity.x > 0.0 && slopes.up_right != 0.0 {
        (slopes.up_right, 1.0)
    } else if velocity.x > 0.0 && slopes.down_left != 0.0 {
        (slopes.down_left, -1.0)
    } else {
        (0.0, 1.0)
    };

    if angle == 0.0 {
        return velocity;
    }

    let radians = angle.to_radians();
    Vec2::new(
        radians.cos() * distance * x_speed.signum(),
        radians.sin() * distance * y_modifier,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;

    fn bounds() -> BoundingBox {
        BoundingBox::new(Vec2::new(0.0, 0.99), &ScanConfig::default())
    }

    /// Normal of a surface rising at `degrees` toward +x.
    fn slope_normal(degrees: f32) -> Vec2 {
        let radians = degrees.to_radians();
        Vec2::new(-radians.sin(), radians.cos())
    }

    // ==================== Angle Tests ====================

    #[test]
    fn angle_from_up_flat() {
        assert!(angle_from_up(Vec2::Y).abs() < 1e-4);
    }

    #[test]
    fn angle_from_up_thirty_degrees() {
        let angle = angle_from_up(slope_normal(30.0));
        assert!((angle - 30.0).abs() < 1e-3);
    }

    #[test]
    fn angle_from_up_wall() {
        assert!((angle_from_up(Vec2::X) - 90.0).abs() < 1e-3);
    }

    // ==================== Side Probe Tests ====================

    #[test]
    fn side_probe_recognizes_climbable_right_slope() {
        let mut slopes = SlopeState::default();
        let mut contacts = ContactState::default();
        contacts.wall_right = true;

        let mut cast = |_origin: Vec2, dir: Vec2| {
            (dir == Vec2::X).then(|| RayHit::new(0.05, slope_normal(30.0), Vec2::ZERO, None))
        };
        probe_side_slopes(&mut slopes, &mut contacts, &bounds(), 45.0, &mut cast);

        assert!(slopes.climbing);
        assert!((slopes.up_right - 30.0).abs() < 1e-3);
        // The wall flag is suppressed so wall-stop logic does not fire on
        // a walkable slope.
        assert!(!contacts.wall_right);
    }

    #[test]
    fn side_probe_too_steep_records_angle_without_climbing() {
        let mut slopes = SlopeState::default();
        let mut contacts = ContactState::default();
        contacts.wall_right = true;

        let mut cast = |_origin: Vec2, dir: Vec2| {
            (dir == Vec2::X).then(|| RayHit::new(0.05, slope_normal(70.0), Vec2::ZERO, None))
        };
        probe_side_slopes(&mut slopes, &mut contacts, &bounds(), 45.0, &mut cast);

        assert!(!slopes.climbing);
        assert!((slopes.up_right - 70.0).abs() < 1e-3);
        assert!(contacts.wall_right);
    }

    #[test]
    fn side_probe_right_short_circuits_left() {
        let mut slopes = SlopeState::default();
        let mut contacts = ContactState::default();
        let mut left_probed = false;

        let mut cast = |_origin: Vec2, dir: Vec2| {
            if dir == Vec2::NEG_X {
                left_probed = true;
            }
            (dir == Vec2::X).then(|| RayHit::new(0.05, slope_normal(20.0), Vec2::ZERO, None))
        };
        probe_side_slopes(&mut slopes, &mut contacts, &bounds(), 45.0, &mut cast);

        assert!(slopes.climbing);
        assert!(!left_probed);
        assert_eq!(slopes.up_left, 0.0);
    }

    #[test]
    fn side_probe_out_of_range_clears_climbing() {
        let mut slopes = SlopeState {
            climbing: true,
            ..default()
        };
        let mut contacts = ContactState::default();

        let mut cast =
            |_origin: Vec2, _dir: Vec2| Some(RayHit::new(0.5, slope_normal(30.0), Vec2::ZERO, None));
        probe_side_slopes(&mut slopes, &mut contacts, &bounds(), 45.0, &mut cast);

        assert!(!slopes.climbing);
        assert_eq!(slopes.up_right, 0.0);
        assert_eq!(slopes.up_left, 0.0);
    }

    // ==================== Down Probe Tests ====================

    fn down_probe_with(distance: f32, degrees: f32, velocity_x: f32) -> (SlopeState, ContactState) {
        let mut slopes = SlopeState::default();
        let mut contacts = ContactState::default();
        let mut cast = |_origin: Vec2, dir: Vec2| {
            (dir == Vec2::NEG_Y).then(|| RayHit::new(distance, slope_normal(degrees), Vec2::ZERO, None))
        };
        probe_down_slopes(&mut slopes, &mut contacts, &bounds(), 45.0, velocity_x, &mut cast);
        (slopes, contacts)
    }

    #[test]
    fn down_probe_recognition_threshold() {
        // At 30 degrees and |vx| = 2 the cutoff is
        // distance - 0.1 <= tan(30) * 2 ~= 1.1547.
        let limit = 30.0_f32.to_radians().tan() * 2.0 + DESCEND_MARGIN;

        let (slopes, contacts) = down_probe_with(limit - 0.01, 30.0, 2.0);
        assert!(slopes.descending);
        assert!(contacts.grounded);

        let (slopes, contacts) = down_probe_with(limit + 0.01, 30.0, 2.0);
        assert!(!slopes.descending);
        assert!(!contacts.grounded);
    }

    #[test]
    fn down_probe_flat_surface_is_not_a_descend() {
        let (slopes, contacts) = down_probe_with(0.05, 0.0, 2.0);
        assert!(!slopes.descending);
        assert!(!contacts.grounded);
        assert_eq!(slopes.down_left, 0.0);
        assert_eq!(slopes.down_right, 0.0);
    }

    #[test]
    fn down_probe_too_steep_is_not_a_descend() {
        let (slopes, _) = down_probe_with(0.05, 70.0, 2.0);
        assert!(!slopes.descending);
    }

    #[test]
    fn down_probe_reset_clears_both_angles() {
        let mut slopes = SlopeState {
            down_left: 25.0,
            down_right: 25.0,
            descending: true,
            ..default()
        };
        let mut contacts = ContactState::default();
        let mut cast = |_origin: Vec2, _dir: Vec2| None;
        probe_down_slopes(&mut slopes, &mut contacts, &bounds(), 45.0, 2.0, &mut cast);

        assert!(!slopes.descending);
        assert_eq!(slopes.down_left, 0.0);
        assert_eq!(slopes.down_right, 0.0);
    }

    // ==================== Slope Following Tests ====================

    #[test]
    fn follow_slope_climb_right() {
        let slopes = SlopeState {
            up_right: 30.0,
            climbing: true,
            ..default()
        };
        let velocity = follow_slope(Vec2::new(0.1, 0.0), &slopes, 0.1);

        let radians = 30.0_f32.to_radians();
        assert!((velocity.x - radians.cos() * 0.1).abs() < 1e-6);
        assert!((velocity.y - radians.sin() * 0.1).abs() < 1e-6);
    }

    #[test]
    fn follow_slope_descend_right_inverts_vertical() {
        let slopes = SlopeState {
            down_left: 30.0,
            descending: true,
            ..default()
        };
        let velocity = follow_slope(Vec2::new(0.1, 0.0), &slopes, 0.1);

        assert!(velocity.y < 0.0);
        assert!(velocity.x > 0.0);
    }

    #[test]
    fn follow_slope_climb_left_keeps_direction() {
        let slopes = SlopeState {
            up_left: 30.0,
            climbing: true,
            ..default()
        };
        let velocity = follow_slope(Vec2::new(-0.1, 0.0), &slopes, -0.1);

        assert!(velocity.x < 0.0);
        assert!(velocity.y > 0.0);
    }

    #[test]
    fn follow_slope_no_angle_is_identity() {
        let slopes = SlopeState::default();
        let velocity = Vec2::new(0.2, -0.05);
        assert_eq!(follow_slope(velocity, &slopes, 0.2), velocity);
    }

    #[test]
    fn follow_slope_preserves_speed_magnitude() {
        let slopes = SlopeState {
            up_right: 45.0,
            climbing: true,
            ..default()
        };
        let velocity = follow_slope(Vec2::new(0.1, 0.0), &slopes, 0.1);
        assert!((velocity.length() - 0.1).abs() < 1e-6);
    }
}
