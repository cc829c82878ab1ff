//! Horizontal motion integration.
//!
//! Speeds here are per-tick displacements: acceleration is scaled by the
//! square of the tick delta and the caps by the delta itself, so the
//! committed velocity can be added straight to the transform. Damping is
//! exponential, `speed *= (1 - damping)^dt`, with the coefficient chosen
//! by input state (stopping, turning, or basic).

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::intent::ControlIntent;

/// Speeds below this snap to zero on the ground.
const SPEED_SNAP_EPSILON: f32 = 1e-4;

/// Axis magnitudes below this count as "no input" for damping selection.
const AXIS_DEADZONE: f32 = 0.01;

/// Per-tick motion state.
///
/// Owned exclusively by the integration systems; `velocity` holds the
/// committed displacement of the current tick once resolution has run, and
/// the previous tick's until then.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct MotionState {
    /// Horizontal speed (per-tick displacement).
    pub x_speed: f32,
    /// Vertical speed (per-tick displacement).
    pub y_speed: f32,
    /// Committed velocity for the tick.
    pub velocity: Vec2,
    /// Facing direction: positive is right, negative is left.
    pub facing: f32,
    /// Effective max horizontal speed. Latches to the run cap while
    /// sprinting and ramps back down toward the walk cap when not.
    pub current_max_speed: f32,
}

impl MotionState {
    /// Create motion state for the given configuration.
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            x_speed: 0.0,
            y_speed: 0.0,
            velocity: Vec2::ZERO,
            facing: 1.0,
            current_max_speed: config.max_walk_speed,
        }
    }

    /// Moving left this tick?
    #[inline]
    pub fn moving_left(&self) -> bool {
        self.velocity.x < 0.0
    }

    /// Moving right this tick?
    #[inline]
    pub fn moving_right(&self) -> bool {
        self.velocity.x > 0.0
    }

    /// Moving upward this tick?
    #[inline]
    pub fn rising(&self) -> bool {
        self.velocity.y > 0.0
    }

    /// Moving downward this tick?
    #[inline]
    pub fn falling(&self) -> bool {
        self.velocity.y < 0.0
    }

    /// Turn to face the current travel direction.
    pub fn update_facing(&mut self) {
        if self.moving_left() {
            self.facing = -1.0;
        }
        if self.moving_right() {
            self.facing = 1.0;
        }
    }

    /// Zero the speeds and the committed velocity.
    pub fn halt(&mut self) {
        self.x_speed = 0.0;
        self.y_speed = 0.0;
        self.velocity = Vec2::ZERO;
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new(&ControllerConfig::default())
    }
}

/// Clamp a speed to `[-max, max]`, preserving its sign.
pub fn clamp_speed(speed: f32, max_speed: f32) -> f32 {
    if speed.abs() >= max_speed && speed > 0.0 {
        max_speed
    } else if speed.abs() >= max_speed && speed < 0.0 {
        -max_speed
    } else {
        speed
    }
}

/// Pick the damping decay factor for this tick.
fn damping_factor(axis: f32, speed: f32, stopping: f32, turning: f32, basic: f32, dt: f32) -> f32 {
    let damping = if axis.abs() < AXIS_DEADZONE {
        stopping
    } else if axis.signum() != speed.signum() {
        turning
    } else {
        basic
    };
    (1.0 - damping).powf(dt)
}

/// Advance the horizontal speed by one tick.
///
/// The grounded branch snaps tiny speeds to zero and clamps against the
/// ramping effective cap; the airborne branch keeps tiny speeds (air drift
/// decays through damping alone) and clamps against the walk cap when not
/// sprinting.
pub fn integrate_horizontal(
    motion: &mut MotionState,
    intent: &ControlIntent,
    sprinting: bool,
    grounded: bool,
    config: &ControllerConfig,
    dt: f32,
) {
    let axis = intent.horizontal;

    if grounded {
        let mut speed = motion.x_speed + config.ground_acceleration * axis * dt * dt;
        speed *= damping_factor(
            axis,
            speed,
            config.ground_damping_stopping,
            config.ground_damping_turning,
            config.ground_damping_basic,
            dt,
        );

        if speed.abs() < SPEED_SNAP_EPSILON {
            motion.x_speed = 0.0;
            return;
        }

        if sprinting {
            motion.current_max_speed = config.max_run_speed;
            motion.x_speed = clamp_speed(speed, config.max_run_speed * dt);
        } else {
            // Ramp the elevated cap back down, never past the walk cap.
            motion.current_max_speed = (motion.current_max_speed - config.ground_acceleration)
                .max(config.max_walk_speed);
            motion.x_speed = clamp_speed(speed, motion.current_max_speed * dt);
        }
    } else {
        let mut speed = motion.x_speed + config.air_acceleration * axis * dt * dt;
        speed *= damping_factor(
            axis,
            speed,
            config.air_damping_stopping,
            config.air_damping_turning,
            config.air_damping_basic,
            dt,
        );

        if sprinting {
            motion.current_max_speed = config.max_run_speed;
            motion.x_speed = clamp_speed(speed, config.max_run_speed * dt);
        } else {
            motion.current_max_speed = (motion.current_max_speed - config.air_acceleration)
                .max(config.max_walk_speed);
            motion.x_speed = clamp_speed(speed, config.max_walk_speed * dt);
        }
    }
}
