//! Player mode and state marker components.
//!
//! The top-level mode is a tagged union: each arm owns exactly the data it
//! needs (only the climbing arm carries a timer). The marker components
//! mirror the contact scan so game systems can use plain query filters,
//! and [`ControllerOutput`] is the once-per-tick telemetry event consumed
//! by animation and effects.

use bevy::prelude::*;

use crate::config::Abilities;

/// Vertical-axis magnitude that commits a hanging character to climbing
/// (positive) or dropping back to normal movement (negative).
pub const HANG_INPUT_THRESHOLD: f32 = 0.3;

/// Top-level movement mode.
///
/// `Normal` runs the full movement pipeline. `Hanging` and `Climbing`
/// freeze the character on a ledge; `Stopped` pins it in place until an
/// external collaborator resets the mode. All transitions except the
/// climbing timer are driven from outside (ledge sensors, cutscenes).
#[derive(Component, Reflect, Debug, Clone, PartialEq, Default)]
#[reflect(Component)]
pub enum PlayerMode {
    /// Full movement and ability pipeline.
    #[default]
    Normal,
    /// Holding a ledge, waiting for vertical input.
    Hanging,
    /// Pulling up over a ledge; pops off when the timer completes.
    Climbing {
        /// Time spent climbing so far.
        timer: f32,
    },
    /// Frozen in place until externally reset.
    Stopped,
}

impl PlayerMode {
    /// Grab a ledge: hangs when the climbing ability is unlocked,
    /// otherwise stays in normal movement.
    pub fn grab_ledge(&mut self, abilities: &Abilities) {
        *self = if abilities.climbing {
            debug!("ledge grabbed, hanging");
            PlayerMode::Hanging
        } else {
            PlayerMode::Normal
        };
    }

    /// In the full-pipeline mode?
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, PlayerMode::Normal)
    }

    /// Holding or climbing a ledge?
    #[inline]
    pub fn on_ledge(&self) -> bool {
        matches!(self, PlayerMode::Hanging | PlayerMode::Climbing { .. })
    }
}

/// Marker component indicating the character is grounded.
///
/// Added automatically when the contact scan reports ground within the
/// contact band. Removed when the character becomes airborne.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Per-tick telemetry for animation and effects.
///
/// Emitted once per tick per character after the position commit; carries
/// everything the animation layer keys off.
#[derive(Event, Debug, Clone)]
pub struct ControllerOutput {
    /// The character this snapshot describes.
    pub entity: Entity,
    /// Committed velocity of the tick.
    pub velocity: Vec2,
    /// Grounded this tick.
    pub grounded: bool,
    /// A jump is in progress.
    pub jumping: bool,
    /// The colorscape gate is open.
    pub can_cast: bool,
    /// Winding up a leftward cast.
    pub winding_left: bool,
    /// Winding up a rightward cast.
    pub winding_right: bool,
    /// Winding up an upward cast.
    pub winding_up: bool,
    /// Winding up a downward cast.
    pub winding_down: bool,
}
