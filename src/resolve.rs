//! Collision resolution.
//!
//! The candidate velocity is clipped against the contact scan in a fixed
//! order: horizontal first, then vertical, then the hard impact zeroing,
//! then the embedding correction. Slope-angle coupling is injected at
//! clamp time (clamping one axis against a climbable slope converts the
//! clamped amount onto the other axis), which lets slopes and walls
//! interact without a continuous-collision solve. The order must not be
//! rearranged; degenerate contacts (for example both walls at once) are
//! resolved by it rather than reported.

use crate::contact::ContactState;
use crate::jump::JumpState;
use crate::motion::MotionState;
use crate::slope::SlopeState;

/// Clip the committed velocity against the tick's contacts.
///
/// Direction predicates are evaluated once from the incoming velocity;
/// clamp thresholds compare the raw axis speeds while the clamps apply to
/// the (possibly slope-projected) velocity.
pub fn resolve_collisions(
    motion: &mut MotionState,
    jump: &mut JumpState,
    contacts: &ContactState,
    slopes: &SlopeState,
) {
    let mut velocity = motion.velocity;
    let going_left = velocity.x < 0.0;
    let going_right = velocity.x > 0.0;
    let rising = velocity.y > 0.0;
    let falling = velocity.y < 0.0;

    // Horizontal axis. Wall contact in the travel direction stops dead;
    // otherwise overshooting the clearance clamps to exactly it. While
    // climbing into a wall, the clamped run is converted to rise.
    // Both climb branches read the up-right angle; see DESIGN.md.
    if contacts.wall_left && going_left {
        velocity.x = 0.0;
    } else if contacts.wall_right && going_right {
        velocity.x = 0.0;
    } else if motion.x_speed.abs() >= contacts.clearance_left && going_left {
        velocity.x = -contacts.clearance_left;
        if slopes.climbing && contacts.wall_left {
            velocity.y = slopes.up_right.to_radians().tan() * velocity.x.abs();
        }
    } else if motion.x_speed.abs() >= contacts.clearance_right && going_right {
        velocity.x = contacts.clearance_right;
        if slopes.climbing && contacts.wall_right {
            velocity.y = slopes.up_right.to_radians().tan() * velocity.x.abs();
        }
    }

    // Vertical axis. A descend keeps the floor clamp out of the way so the
    // slope snap from the probe pass wins.
    if motion.y_speed.abs() >= contacts.clearance_down && falling && !slopes.descending {
        velocity.y = -contacts.clearance_down;
    } else if motion.y_speed.abs() >= contacts.clearance_up && rising {
        velocity.y = contacts.clearance_up;
        if slopes.climbing {
            velocity.x = velocity.y / slopes.up_right.to_radians().tan() * velocity.x.signum();
        }
    }

    // Hard zero on head or floor impact.
    if (contacts.ceiling && rising) || (contacts.grounded && falling && !slopes.descending) {
        velocity.y = 0.0;
        jump.velocity = 0.0;
    }

    // Embedding correction: a negative down clearance means the box has
    // sunk below the floor; push it back out.
    if contacts.grounded && contacts.clearance_down < 0.0 && !rising {
        velocity.y = contacts.clearance_down.abs();
    }

    motion.velocity = velocity;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::*;

    use crate::config::ControllerConfig;

    fn parts(velocity: Vec2) -> (MotionState, JumpState) {
        let config = ControllerConfig::default();
        let mut motion = MotionState::new(&config);
        motion.velocity = velocity;
        motion.x_speed = velocity.x;
        motion.y_speed = velocity.y;
        (motion, JumpState::new(&config))
    }

    // ==================== Horizontal Tests ====================

    #[test]
    fn wall_contact_stops_horizontal_motion() {
        let (mut motion, mut jump) = parts(Vec2::new(-0.5, 0.0));
        let mut contacts = ContactState::default();
        contacts.wall_left = true;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.x, 0.0);
    }

    #[test]
    fn wall_behind_does_not_stop_motion() {
        let (mut motion, mut jump) = parts(Vec2::new(0.5, 0.0));
        let mut contacts = ContactState::default();
        contacts.wall_left = true;
        contacts.clearance_right = 5.0;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.x, 0.5);
    }

    #[test]
    fn horizontal_overshoot_clamps_to_clearance() {
        let (mut motion, mut jump) = parts(Vec2::new(0.5, 0.0));
        let mut contacts = ContactState::default();
        contacts.clearance_right = 0.3;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.x, 0.3);

        let (mut motion, mut jump) = parts(Vec2::new(-0.5, 0.0));
        let mut contacts = ContactState::default();
        contacts.clearance_left = 0.2;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.x, -0.2);
    }

    #[test]
    fn horizontal_within_clearance_is_untouched() {
        let (mut motion, mut jump) = parts(Vec2::new(0.1, 0.0));
        let mut contacts = ContactState::default();
        contacts.clearance_right = 0.3;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.x, 0.1);
    }

    #[test]
    fn climbing_wall_clamp_converts_run_to_rise() {
        let (mut motion, mut jump) = parts(Vec2::new(0.5, 0.0));
        let mut contacts = ContactState::default();
        contacts.clearance_right = 0.3;
        contacts.wall_right = true;
        let slopes = SlopeState {
            up_right: 45.0,
            climbing: true,
            ..default()
        };

        resolve_collisions(&mut motion, &mut jump, &contacts, &slopes);
        assert_eq!(motion.velocity.x, 0.3);
        // tan(45) = 1, so the rise equals the clamped run.
        assert!((motion.velocity.y - 0.3).abs() < 1e-5);
    }

    // ==================== Vertical Tests ====================

    #[test]
    fn fall_overshoot_clamps_to_down_clearance() {
        let (mut motion, mut jump) = parts(Vec2::new(0.0, -2.0));
        let mut contacts = ContactState::default();
        contacts.clearance_down = 1.0;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.y, -1.0);
    }

    #[test]
    fn descend_skips_the_floor_clamp() {
        let (mut motion, mut jump) = parts(Vec2::new(0.0, -2.0));
        let mut contacts = ContactState::default();
        contacts.clearance_down = 1.0;
        let slopes = SlopeState {
            descending: true,
            down_left: 30.0,
            ..default()
        };

        resolve_collisions(&mut motion, &mut jump, &contacts, &slopes);
        assert_eq!(motion.velocity.y, -2.0);
    }

    #[test]
    fn rise_overshoot_clamps_to_up_clearance() {
        let (mut motion, mut jump) = parts(Vec2::new(0.0, 2.0));
        let mut contacts = ContactState::default();
        contacts.clearance_up = 0.4;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.y, 0.4);
    }

    #[test]
    fn head_impact_zeroes_vertical_and_jump() {
        let (mut motion, mut jump) = parts(Vec2::new(0.0, 0.5));
        jump.velocity = 3.0;
        let mut contacts = ContactState::default();
        contacts.ceiling = true;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.y, 0.0);
        assert_eq!(jump.velocity, 0.0);
    }

    #[test]
    fn floor_impact_zeroes_vertical_and_jump() {
        let (mut motion, mut jump) = parts(Vec2::new(0.0, -0.01));
        jump.velocity = -3.0;
        let mut contacts = ContactState::default();
        contacts.grounded = true;
        contacts.clearance_down = 0.01;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.y, 0.0);
        assert_eq!(jump.velocity, 0.0);
    }

    // ==================== Embedding Tests ====================

    #[test]
    fn embedding_correction_pushes_back_to_surface() {
        let (mut motion, mut jump) = parts(Vec2::new(0.0, 0.0));
        let mut contacts = ContactState::default();
        contacts.grounded = true;
        contacts.clearance_down = -0.015;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert!((motion.velocity.y - 0.015).abs() < 1e-6);
    }

    #[test]
    fn embedding_correction_yields_to_rising_motion() {
        let (mut motion, mut jump) = parts(Vec2::new(0.0, 0.5));
        let mut contacts = ContactState::default();
        contacts.grounded = true;
        contacts.clearance_down = -0.015;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.y, 0.5);
    }

    #[test]
    fn simultaneous_wall_contacts_resolve_by_travel_direction() {
        // Both walls flagged at once: only the travel direction matters,
        // and the fixed ordering never reports ambiguity.
        let (mut motion, mut jump) = parts(Vec2::new(0.2, 0.0));
        let mut contacts = ContactState::default();
        contacts.wall_left = true;
        contacts.wall_right = true;

        resolve_collisions(&mut motion, &mut jump, &contacts, &SlopeState::default());
        assert_eq!(motion.velocity.x, 0.0);
    }
}
