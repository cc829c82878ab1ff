//! Vertical motion and the jump state machine.
//!
//! Gravity and the full-jump launch velocity are derived once from the
//! designer-facing pair (`jump_height`, `time_to_jump_height`). Jump input
//! is decoupled from jump permission: a press starts a startup countdown
//! during which hold time accumulates, and the jump fires only when the
//! countdown elapses with a valid hold, inside the airborne grace window,
//! with no ceiling overhead. Pressing shortly before landing therefore
//! still jumps, and so does stepping off a ledge moments earlier.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::contact::ContactState;
use crate::intent::ControlIntent;
use crate::motion::{clamp_speed, MotionState};

/// Jump machine state.
///
/// Mutated only by the vertical integration; the collision resolver zeroes
/// `velocity` on head or floor impact.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct JumpState {
    /// Current jump velocity (units/s), advanced by gravity while airborne.
    pub velocity: f32,
    /// A jump is in progress.
    pub jumping: bool,
    /// The jump button is still held since the last press.
    pub button_held: bool,
    /// How long the button has been held, capped at the startup duration.
    pub time_held: f32,
    /// Countdown from press to fire.
    pub countdown: f32,
    /// Time since the ground was last touched.
    pub air_timer: f32,

    /// Gravity (units/s^2), derived from the jump curve.
    pub gravity: f32,
    /// Launch velocity of a full jump (units/s), derived from the jump curve.
    pub initial_velocity: f32,
}

impl JumpState {
    /// Create jump state with gravity and launch velocity derived from
    /// the configuration.
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            velocity: 0.0,
            jumping: false,
            button_held: false,
            time_held: 0.0,
            countdown: 0.0,
            air_timer: 0.0,
            gravity: config.gravity(),
            initial_velocity: config.initial_jump_velocity(),
        }
    }
}

impl Default for JumpState {
    fn default() -> Self {
        Self::new(&ControllerConfig::default())
    }
}

/// Advance the vertical speed and the jump machine by one tick.
///
/// Airborne, the vertical displacement is rebuilt from the jump velocity
/// each tick (`v*dt + g*dt^2/2`), multiplied by the falling modifier when
/// the previous tick moved downward, and clamped to the fall cap. On the
/// ground, vertical speed, jump velocity and the grace timer all reset.
pub fn integrate_vertical(
    motion: &mut MotionState,
    jump: &mut JumpState,
    intent: &ControlIntent,
    contacts: &ContactState,
    config: &ControllerConfig,
    dt: f32,
) {
    let mut y_speed;
    if !contacts.grounded {
        y_speed = jump.velocity * dt + 0.5 * jump.gravity * dt * dt;
        if motion.falling() {
            y_speed *= config.falling_modifier;
        }
        jump.velocity += jump.gravity * dt;
        jump.air_timer += dt;
        y_speed = clamp_speed(y_speed, config.max_fall_speed * dt);
    } else {
        jump.air_timer = 0.0;
        y_speed = 0.0;
        jump.velocity = 0.0;
    }

    // A press arms the countdown; re-pressing while armed does nothing.
    if intent.jump_pressed && jump.countdown <= 0.0 {
        jump.countdown = config.max_jump_startup_time;
        jump.button_held = true;
    }

    if jump.countdown > 0.0 {
        jump.countdown -= dt;
        if jump.button_held {
            jump.time_held = (jump.time_held + dt).min(config.max_jump_startup_time);
        }
    }

    if intent.jump_released && jump.button_held {
        jump.button_held = false;
    }

    // Fire when the countdown has elapsed with a valid hold, within the
    // grace window, and with headroom.
    if jump.time_held != 0.0
        && jump.countdown <= 0.0
        && jump.air_timer <= config.air_jump_time
        && !contacts.ceiling
    {
        let impulse = jump.initial_velocity * (jump.time_held / config.max_jump_startup_time);
        jump.time_held = 0.0;
        jump.velocity = impulse;
        y_speed = impulse * dt;
        jump.jumping = true;
    } else if jump.countdown <= 0.0 {
        jump.time_held = 0.0;
    }

    motion.y_speed = y_speed;
}
