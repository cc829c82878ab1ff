//! Core controller systems.
//!
//! One tick runs a fixed pipeline: contact scan, then the mode-dispatched
//! movement stage (integration, slope probes, colorscapes and collision
//! resolution for normal movement; the frozen ledge and stopped paths
//! otherwise), then the position commit, then the output stage. Systems
//! that cast rays are exclusive so the backend can see the whole world;
//! everything else is an ordinary query system.

use bevy::prelude::*;

use crate::backend::EnvironmentBackend;
use crate::colorscape::{self, ColorPalette, ColorscapeSpawned, ColorscapeState};
use crate::config::{Abilities, ColorscapeConfig, ControllerConfig, ScanConfig};
use crate::contact::{self, BoundingBox, ContactState, MAX_CLEARANCE};
use crate::intent::{CastDirection, ControlIntent};
use crate::jump::{self, JumpState};
use crate::motion::{self, MotionState};
use crate::resolve;
use crate::slope::{self, SlopeState};
use crate::state::{Airborne, ControllerOutput, Grounded, PlayerMode, HANG_INPUT_THRESHOLD};

/// Fixed timestep delta, with a fallback for test scenarios that run the
/// schedule directly.
fn fixed_dt(time: Option<Res<Time<Fixed>>>) -> f32 {
    time.map(|t| t.delta_secs())
        .filter(|&d| d > 0.0)
        .unwrap_or(1.0 / 60.0)
}

/// Reject malformed scan configurations the moment they appear.
///
/// A bad ray count or degenerate box is a setup mistake, not a runtime
/// condition, so this is fatal.
pub fn validate_scan_configs(query: Query<(Entity, &ScanConfig), Added<ScanConfig>>) {
    for (entity, config) in &query {
        if let Err(err) = config.validate() {
            error!("rejecting scan configuration on {entity}: {err}");
            panic!("invalid scan configuration: {err}");
        }
    }
}

/// Refresh every character's [`ContactState`] from the four edge fans.
///
/// Runs for every mode: even a frozen character needs current contact
/// flags for the systems and collaborators that read them.
pub fn scan_contacts<B: EnvironmentBackend>(world: &mut World) {
    let targets: Vec<(Entity, Vec2, ScanConfig)> = world
        .query::<(Entity, &Transform, &ScanConfig)>()
        .iter(world)
        .map(|(entity, transform, config)| (entity, transform.translation.truncate(), *config))
        .collect();

    for (entity, position, config) in targets {
        let groups = B::get_collision_groups(world, entity);
        let bounds = BoundingBox::new(position, &config);
        let range = MAX_CLEARANCE + config.breathing_room;

        let contacts = contact::scan(&bounds, &config, &mut |origin, direction| {
            B::raycast(world, origin, direction, range, entity, groups)
        });

        if let Some(mut state) = world.get_mut::<ContactState>(entity) {
            *state = contacts;
        }
    }
}

/// Advance the speeds of characters in normal movement.
///
/// Horizontal first (which also lands any finished jump), then vertical
/// with the jump machine; the result becomes the tick's candidate
/// velocity.
pub fn integrate_motion(
    mut query: Query<(
        &mut MotionState,
        &mut JumpState,
        &ContactState,
        &ControlIntent,
        &Abilities,
        &ControllerConfig,
        &PlayerMode,
    )>,
    time: Option<Res<Time<Fixed>>>,
) {
    let dt = fixed_dt(time);
    for (mut motion, mut jump, contacts, intent, abilities, config, mode) in &mut query {
        if !mode.is_normal() {
            continue;
        }

        if contacts.grounded {
            jump.jumping = false;
        }

        let sprinting = intent.sprint_held && abilities.sprint;
        motion::integrate_horizontal(&mut motion, intent, sprinting, contacts.grounded, config, dt);
        jump::integrate_vertical(&mut motion, &mut jump, intent, contacts, config, dt);

        motion.velocity = Vec2::new(motion.x_speed, motion.y_speed);
    }
}

/// Run the slope probes and project the candidate velocity onto a
/// recognized slope.
///
/// Must run after integration (the descend probe scales with the tick's
/// horizontal velocity) and before resolution (which reads the slope
/// flags).
pub fn update_slopes<B: EnvironmentBackend>(world: &mut World) {
    let targets: Vec<(Entity, Vec2, ScanConfig, Vec2, f32, bool)> = world
        .query::<(
            Entity,
            &Transform,
            &ScanConfig,
            &MotionState,
            &JumpState,
            &PlayerMode,
        )>()
        .iter(world)
        .filter(|(.., mode)| mode.is_normal())
        .map(|(entity, transform, config, motion, jump, _)| {
            (
                entity,
                transform.translation.truncate(),
                *config,
                motion.velocity,
                motion.x_speed,
                jump.jumping,
            )
        })
        .collect();

    for (entity, position, config, mut velocity, x_speed, jumping) in targets {
        let groups = B::get_collision_groups(world, entity);
        let bounds = BoundingBox::new(position, &config);

        let (Some(mut slopes), Some(mut contacts)) = (
            world.get::<SlopeState>(entity).copied(),
            world.get::<ContactState>(entity).copied(),
        ) else {
            continue;
        };

        {
            let mut cast = |origin: Vec2, direction: Vec2| {
                B::raycast(world, origin, direction, MAX_CLEARANCE, entity, groups)
            };
            slope::probe_side_slopes(
                &mut slopes,
                &mut contacts,
                &bounds,
                config.max_slope_angle,
                &mut cast,
            );
            slope::probe_down_slopes(
                &mut slopes,
                &mut contacts,
                &bounds,
                config.max_slope_angle,
                velocity.x,
                &mut cast,
            );
        }

        if contacts.grounded && (slopes.climbing || slopes.descending) && !jumping {
            velocity = slope::follow_slope(velocity, &slopes, x_speed);
        }

        if let Some(mut state) = world.get_mut::<SlopeState>(entity) {
            *state = slopes;
        }
        if let Some(mut state) = world.get_mut::<ContactState>(entity) {
            *state = contacts;
        }
        if let Some(mut motion) = world.get_mut::<MotionState>(entity) {
            motion.velocity = velocity;
        }
    }
}

/// Drive the colorscape machine: triggers while the gate is open, the
/// windup/cooldown timer while it is closed.
///
/// A completed windup emits the spawn event, consumes the color, and
/// recoils an airborne caster opposite the cast direction.
pub fn update_colorscapes(
    mut query: Query<(
        Entity,
        &Transform,
        &mut ColorscapeState,
        &mut ColorPalette,
        &mut MotionState,
        &mut JumpState,
        &ContactState,
        &ControlIntent,
        &Abilities,
        &ColorscapeConfig,
        &PlayerMode,
    )>,
    time: Option<Res<Time<Fixed>>>,
    mut spawns: EventWriter<ColorscapeSpawned>,
) {
    let dt = fixed_dt(time);
    for (
        entity,
        transform,
        mut state,
        mut palette,
        mut motion,
        mut jump,
        contacts,
        intent,
        abilities,
        config,
        mode,
    ) in &mut query
    {
        if !mode.is_normal() || !abilities.paintbrush {
            continue;
        }

        if state.can_cast {
            colorscape::try_trigger(&mut state, &palette, intent, contacts.grounded);
        } else if let Some((direction, color)) = colorscape::advance_timer(&mut state, config, dt) {
            let position = transform.translation.truncate() + direction.vec() * config.range;
            debug!("colorscape fired: {color:?} toward {direction:?}");
            spawns.send(ColorscapeSpawned {
                caster: entity,
                color,
                direction,
                position,
            });
            palette.spend(color);

            if !contacts.grounded {
                match direction {
                    CastDirection::Up => jump.velocity = -config.force_y,
                    CastDirection::Down => jump.velocity = config.force_y,
                    CastDirection::Right => motion.x_speed -= config.force_x,
                    CastDirection::Left => motion.x_speed += config.force_x,
                }
            }
        }
    }
}

/// Clip the candidate velocity against this tick's contacts.
pub fn resolve_movement(
    mut query: Query<(
        &mut MotionState,
        &mut JumpState,
        &ContactState,
        &SlopeState,
        &PlayerMode,
    )>,
) {
    for (mut motion, mut jump, contacts, slopes, mode) in &mut query {
        if !mode.is_normal() {
            continue;
        }
        resolve::resolve_collisions(&mut motion, &mut jump, contacts, slopes);
    }
}

/// The frozen ledge path: hanging waits on vertical input, climbing runs
/// its timer and pops the character up over the ledge when it completes.
pub fn climb_movement(
    mut query: Query<(
        &mut PlayerMode,
        &mut MotionState,
        &mut JumpState,
        &ControlIntent,
        &ScanConfig,
        &ControllerConfig,
    )>,
    time: Option<Res<Time<Fixed>>>,
) {
    let dt = fixed_dt(time);
    for (mut mode, mut motion, mut jump, intent, scan, config) in &mut query {
        if !mode.on_ledge() {
            continue;
        }

        motion.halt();
        jump.velocity = 0.0;

        if intent.vertical >= HANG_INPUT_THRESHOLD && *mode == PlayerMode::Hanging {
            debug!("climb started");
            *mode = PlayerMode::Climbing { timer: 0.0 };
        } else if intent.vertical <= -HANG_INPUT_THRESHOLD && *mode == PlayerMode::Hanging {
            *mode = PlayerMode::Normal;
        } else if let PlayerMode::Climbing { timer } = &*mode {
            let timer = *timer;
            if timer >= config.climbing_time {
                debug!("climb finished");
                *mode = PlayerMode::Normal;
                motion.velocity = Vec2::new(scan.width * 0.5 * motion.facing, scan.height);
            } else {
                *mode = PlayerMode::Climbing { timer: timer + dt };
            }
        }
    }
}

/// The stopped path: pin the character in place every tick.
pub fn halt_movement(mut query: Query<(&mut MotionState, &PlayerMode)>) {
    for (mut motion, mode) in &mut query {
        if *mode == PlayerMode::Stopped {
            motion.halt();
        }
    }
}

/// Commit the resolved velocity: update facing, then translate.
pub fn commit_movement(mut query: Query<(&mut Transform, &mut MotionState)>) {
    for (mut transform, mut motion) in &mut query {
        motion.update_facing();
        transform.translation.x += motion.velocity.x;
        transform.translation.y += motion.velocity.y;
    }
}

/// Sync the [`Grounded`] / [`Airborne`] marker components to the scan.
pub fn sync_state_markers(
    mut commands: Commands,
    query: Query<(Entity, &ContactState, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, contacts, has_grounded, has_airborne) in &query {
        if contacts.grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !contacts.grounded && has_grounded {
            commands.entity(entity).remove::<Grounded>();
            commands.entity(entity).insert(Airborne);
        } else if !contacts.grounded && !has_airborne && !has_grounded {
            commands.entity(entity).insert(Airborne);
        }
    }
}

/// Emit the once-per-tick telemetry snapshot for animation and effects.
pub fn emit_output(
    query: Query<(
        Entity,
        &MotionState,
        &JumpState,
        &ContactState,
        &ColorscapeState,
    )>,
    mut output: EventWriter<ControllerOutput>,
) {
    for (entity, motion, jump, contacts, colorscape) in &query {
        output.send(ControllerOutput {
            entity,
            velocity: motion.velocity,
            grounded: contacts.grounded,
            jumping: jump.jumping,
            can_cast: colorscape.can_cast,
            winding_left: colorscape.winding_left,
            winding_right: colorscape.winding_right,
            winding_up: colorscape.winding_up,
            winding_down: colorscape.winding_down,
        });
    }
}

/// Clear the per-tick input edges once the controller has consumed them.
pub fn clear_intent_edges(mut query: Query<&mut ControlIntent>) {
    for mut intent in &mut query {
        intent.clear_edges();
    }
}
