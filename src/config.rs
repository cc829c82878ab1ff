//! Controller configuration components.
//!
//! This module defines the tuning surface for the character controller:
//! scan geometry, movement/jump parameters, colorscape timings, and the
//! ability unlock flags. Configuration problems are caught once at setup
//! via [`ScanConfig::validate`]; everything past that point is total.

use bevy::prelude::*;
use thiserror::Error;

/// Fatal configuration error, raised at setup time.
///
/// A malformed configuration is a startup-time fatal condition, not a
/// per-tick fault: the plugin panics with this error when a freshly added
/// [`ScanConfig`] fails validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A ray fan needs at least two rays, otherwise the spacing
    /// `edge / (count - 1)` divides by zero.
    #[error("ray fan for the {edge} edge needs at least 2 rays, got {count}")]
    TooFewRays { edge: &'static str, count: u32 },

    /// The bounding box must have positive extent on both axes.
    #[error("bounding box dimensions must be positive, got {width}x{height}")]
    InvalidBox { width: f32, height: f32 },
}

/// Scan geometry for the four contact ray fans.
///
/// Each edge of the character's bounding box fires `count` parallel rays
/// spaced evenly along the edge. `breathing_room` is subtracted from every
/// measured hit so the rays can start flush against a surface without the
/// cast beginning inside a collider.
///
/// Do not set `breathing_room` to zero (a ray starting inside a collider
/// detects nothing) or beyond the box dimensions.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ScanConfig {
    /// Ray count along the top edge. Must be at least 2.
    pub up_ray_count: u32,
    /// Ray count along the bottom edge. Must be at least 2.
    pub down_ray_count: u32,
    /// Ray count along the left edge. Must be at least 2.
    pub left_ray_count: u32,
    /// Ray count along the right edge. Must be at least 2.
    pub right_ray_count: u32,

    /// Distance subtracted from every raw hit distance.
    pub breathing_room: f32,

    /// Full height of the bounding box.
    pub height: f32,
    /// Full width of the bounding box.
    pub width: f32,

    /// Steepest surface angle (degrees) still treated as walkable slope.
    pub max_slope_angle: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            up_ray_count: 4,
            down_ray_count: 4,
            left_ray_count: 4,
            right_ray_count: 4,
            breathing_room: 0.2,
            height: 1.98,
            width: 1.0,
            max_slope_angle: 60.0,
        }
    }
}

impl ScanConfig {
    /// Spacing between adjacent rays of the top fan.
    #[inline]
    pub fn up_ray_spacing(&self) -> f32 {
        self.width / (self.up_ray_count - 1) as f32
    }

    /// Spacing between adjacent rays of the bottom fan.
    #[inline]
    pub fn down_ray_spacing(&self) -> f32 {
        self.width / (self.down_ray_count - 1) as f32
    }

    /// Spacing between adjacent rays of the left fan.
    #[inline]
    pub fn left_ray_spacing(&self) -> f32 {
        self.height / (self.left_ray_count - 1) as f32
    }

    /// Spacing between adjacent rays of the right fan.
    #[inline]
    pub fn right_ray_spacing(&self) -> f32 {
        self.height / (self.right_ray_count - 1) as f32
    }

    /// Check the invariants that the scanner depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (edge, count) in [
            ("up", self.up_ray_count),
            ("down", self.down_ray_count),
            ("left", self.left_ray_count),
            ("right", self.right_ray_count),
        ] {
            if count < 2 {
                return Err(ConfigError::TooFewRays { edge, count });
            }
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::InvalidBox {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Builder: set all four ray counts at once.
    pub fn with_ray_counts(mut self, count: u32) -> Self {
        self.up_ray_count = count;
        self.down_ray_count = count;
        self.left_ray_count = count;
        self.right_ray_count = count;
        self
    }

    /// Builder: set the box dimensions.
    pub fn with_box(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder: set the breathing room offset.
    pub fn with_breathing_room(mut self, breathing_room: f32) -> Self {
        self.breathing_room = breathing_room;
        self
    }

    /// Builder: set the maximum walkable slope angle (degrees).
    pub fn with_max_slope_angle(mut self, degrees: f32) -> Self {
        self.max_slope_angle = degrees;
        self
    }
}

/// Movement and jump tuning for the character controller.
///
/// Horizontal speeds are expressed in units/second and scaled by the tick
/// delta internally; damping coefficients are per-second decay fractions in
/// `[0, 1]` applied as `speed *= (1 - damping)^dt`.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ControllerConfig {
    // === Horizontal movement ===
    /// Grounded horizontal acceleration (units/s^2).
    pub ground_acceleration: f32,
    /// Airborne horizontal acceleration (units/s^2).
    pub air_acceleration: f32,
    /// Max horizontal speed while walking (units/s).
    pub max_walk_speed: f32,
    /// Max horizontal speed while sprinting (units/s).
    pub max_run_speed: f32,

    // === Damping ===
    /// Grounded damping when there is no horizontal input.
    pub ground_damping_stopping: f32,
    /// Grounded damping when input opposes the current speed.
    pub ground_damping_turning: f32,
    /// Grounded damping otherwise.
    pub ground_damping_basic: f32,
    /// Airborne damping when there is no horizontal input.
    pub air_damping_stopping: f32,
    /// Airborne damping when input opposes the current speed.
    pub air_damping_turning: f32,
    /// Airborne damping otherwise.
    pub air_damping_basic: f32,

    // === Jumping ===
    /// How high a full jump reaches, in world units.
    pub jump_height: f32,
    /// Seconds to reach `jump_height` after a full jump fires.
    pub time_to_jump_height: f32,
    /// Fall-speed multiplier while moving downward. Above 1 the character
    /// falls faster than it rises, below 1 slower, 1 is symmetric.
    pub falling_modifier: f32,
    /// Max fall speed (units/s).
    pub max_fall_speed: f32,
    /// Grace window after leaving the ground in which a jump still fires.
    pub air_jump_time: f32,
    /// Delay between pressing jump and the jump firing. Releasing inside
    /// this window produces a weaker jump; pressing shortly before landing
    /// buffers the jump until the countdown elapses.
    pub max_jump_startup_time: f32,

    // === Climbing ===
    /// Seconds a ledge climb takes before the pop-off fires.
    pub climbing_time: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            ground_acceleration: 60.0,
            air_acceleration: 30.0,
            max_walk_speed: 6.0,
            max_run_speed: 9.0,

            ground_damping_stopping: 0.99,
            ground_damping_turning: 0.95,
            ground_damping_basic: 0.1,
            air_damping_stopping: 0.9,
            air_damping_turning: 0.85,
            air_damping_basic: 0.05,

            jump_height: 2.0,
            time_to_jump_height: 0.4,
            falling_modifier: 1.2,
            max_fall_speed: 12.0,
            air_jump_time: 0.15,
            max_jump_startup_time: 0.1,

            climbing_time: 0.6,
        }
    }
}

impl ControllerConfig {
    /// Gravity derived from the jump curve: `-2h / t^2`.
    #[inline]
    pub fn gravity(&self) -> f32 {
        -(2.0 * self.jump_height) / (self.time_to_jump_height * self.time_to_jump_height)
    }

    /// Initial vertical velocity of a full jump: `2h / t`.
    #[inline]
    pub fn initial_jump_velocity(&self) -> f32 {
        (2.0 * self.jump_height) / self.time_to_jump_height
    }

    /// Create a config tuned for responsive player control.
    pub fn player() -> Self {
        Self {
            ground_acceleration: 90.0,
            max_jump_startup_time: 0.08,
            falling_modifier: 1.4,
            ..default()
        }
    }

    /// Builder: set the walk and run speed caps.
    pub fn with_speed_caps(mut self, walk: f32, run: f32) -> Self {
        self.max_walk_speed = walk;
        self.max_run_speed = run;
        self
    }

    /// Builder: set ground and air acceleration.
    pub fn with_acceleration(mut self, ground: f32, air: f32) -> Self {
        self.ground_acceleration = ground;
        self.air_acceleration = air;
        self
    }

    /// Builder: set the jump curve.
    pub fn with_jump(mut self, height: f32, time_to_height: f32) -> Self {
        self.jump_height = height;
        self.time_to_jump_height = time_to_height;
        self
    }

    /// Builder: set the grounded damping triple (stopping, turning, basic).
    pub fn with_ground_damping(mut self, stopping: f32, turning: f32, basic: f32) -> Self {
        self.ground_damping_stopping = stopping;
        self.ground_damping_turning = turning;
        self.ground_damping_basic = basic;
        self
    }

    /// Builder: set the airborne damping triple (stopping, turning, basic).
    pub fn with_air_damping(mut self, stopping: f32, turning: f32, basic: f32) -> Self {
        self.air_damping_stopping = stopping;
        self.air_damping_turning = turning;
        self.air_damping_basic = basic;
        self
    }

    /// Builder: set the jump startup (charge) duration.
    pub fn with_jump_startup_time(mut self, time: f32) -> Self {
        self.max_jump_startup_time = time;
        self
    }

    /// Builder: set the post-ground-loss jump grace window.
    pub fn with_air_jump_time(mut self, time: f32) -> Self {
        self.air_jump_time = time;
        self
    }

    /// Builder: set the max fall speed.
    pub fn with_max_fall_speed(mut self, speed: f32) -> Self {
        self.max_fall_speed = speed;
        self
    }

    /// Builder: set the ledge climb duration.
    pub fn with_climbing_time(mut self, time: f32) -> Self {
        self.climbing_time = time;
        self
    }
}

/// Timing and impulse tuning for the colorscape ability.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ColorscapeConfig {
    /// Delay between the trigger and the colorscape appearing.
    pub windup_time: f32,
    /// Delay after the trigger before the gate reopens.
    pub cooldown_time: f32,
    /// Horizontal recoil applied when casting left/right while airborne.
    pub force_x: f32,
    /// Vertical recoil applied when casting up/down while airborne.
    pub force_y: f32,
    /// How far from the character's center a colorscape spawns.
    pub range: f32,
}

impl Default for ColorscapeConfig {
    fn default() -> Self {
        Self {
            windup_time: 0.1,
            cooldown_time: 0.3,
            force_x: 1.0,
            force_y: 2.0,
            range: 1.5,
        }
    }
}

impl ColorscapeConfig {
    /// Builder: set the windup and cooldown durations.
    pub fn with_timings(mut self, windup: f32, cooldown: f32) -> Self {
        self.windup_time = windup;
        self.cooldown_time = cooldown;
        self
    }

    /// Builder: set the airborne recoil impulses.
    pub fn with_forces(mut self, force_x: f32, force_y: f32) -> Self {
        self.force_x = force_x;
        self.force_y = force_y;
        self
    }

    /// Builder: set the spawn range.
    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }
}

/// Which abilities the character has unlocked.
///
/// Unlocks are granted by external collaborators (pickups, story beats);
/// the controller only reads them.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Abilities {
    /// Can summon colorscapes at all.
    pub paintbrush: bool,
    /// Can hang from and climb ledges.
    pub climbing: bool,
    /// Can sprint up to the run speed cap.
    pub sprint: bool,
}

impl Abilities {
    /// All abilities unlocked.
    pub fn all() -> Self {
        Self {
            paintbrush: true,
            climbing: true,
            sprint: true,
        }
    }
}
