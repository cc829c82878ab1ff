//! The colorscape ability machine.
//!
//! Colorscapes are directional summons gated by a per-color resource pool
//! and a shared windup/cooldown timer. Each trigger row pairs a grounded
//! state, a cast direction and a color; a trigger closes the gate, a
//! windup later the colorscape spawns (consuming its color), and the gate
//! reopens once the cooldown elapses. Casting while airborne also recoils
//! the character opposite the cast direction.

use bevy::prelude::*;

use crate::config::ColorscapeConfig;
use crate::intent::{CastDirection, ControlIntent};

/// The colorscape color wheel.
///
/// Only the first seven colors participate in the resource pool.
/// `UltraViolet`, `Rainbow` and `None` exist for collaborators (palette
/// pickups, composite effects) and are never produced by a trigger row.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorscapeColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
    UltraViolet,
    Rainbow,
    None,
}

/// Number of colors in the resource pool.
pub const PALETTE_SIZE: usize = 7;

/// The per-color resource pool.
///
/// A flag is spent when its color's colorscape spawns and restored by an
/// external collaborator when the player regains the color. Colors outside
/// the pool are ignored by every operation.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ColorPalette {
    available: [bool; PALETTE_SIZE],
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::empty()
    }
}

impl ColorPalette {
    /// A palette with every color spent. New characters start here and
    /// gain colors from the world.
    pub fn empty() -> Self {
        Self {
            available: [false; PALETTE_SIZE],
        }
    }

    /// A palette with every color available.
    pub fn full() -> Self {
        Self {
            available: [true; PALETTE_SIZE],
        }
    }

    fn slot(color: ColorscapeColor) -> Option<usize> {
        let index = color as usize;
        (index < PALETTE_SIZE).then_some(index)
    }

    /// Whether `color` is currently available.
    pub fn is_available(&self, color: ColorscapeColor) -> bool {
        Self::slot(color).is_some_and(|index| self.available[index])
    }

    /// Restore `color` to the pool. Colors outside the pool are ignored.
    pub fn gain(&mut self, color: ColorscapeColor) {
        if let Some(index) = Self::slot(color) {
            self.available[index] = true;
        }
    }

    /// Spend `color` from the pool. Colors outside the pool are ignored.
    pub fn spend(&mut self, color: ColorscapeColor) {
        if let Some(index) = Self::slot(color) {
            self.available[index] = false;
        }
    }
}

/// The fixed trigger rows: (requires grounded, direction, color).
///
/// Rows are checked in order; a later match in the same tick overwrites
/// the pending cast of an earlier one.
pub const TRIGGER_TABLE: [(bool, CastDirection, ColorscapeColor); 7] = [
    (true, CastDirection::Left, ColorscapeColor::Blue),
    (true, CastDirection::Right, ColorscapeColor::Violet),
    (true, CastDirection::Up, ColorscapeColor::Indigo),
    (false, CastDirection::Down, ColorscapeColor::Green),
    (false, CastDirection::Up, ColorscapeColor::Orange),
    (false, CastDirection::Left, ColorscapeColor::Red),
    (false, CastDirection::Right, ColorscapeColor::Yellow),
];

/// Windup / cooldown machine state.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ColorscapeState {
    /// Gate: a new cast may be triggered.
    pub can_cast: bool,
    /// Shared windup/cooldown timer, running while the gate is closed.
    pub timer: f32,

    /// Winding up a leftward cast.
    pub winding_left: bool,
    /// Winding up a rightward cast.
    pub winding_right: bool,
    /// Winding up an upward cast.
    pub winding_up: bool,
    /// Winding up a downward cast.
    pub winding_down: bool,

    /// Direction of the pending cast.
    pub direction: Option<CastDirection>,
    /// Color of the pending cast.
    pub color: ColorscapeColor,
}

impl Default for ColorscapeState {
    fn default() -> Self {
        Self {
            can_cast: true,
            timer: 0.0,
            winding_left: false,
            winding_right: false,
            winding_up: false,
            winding_down: false,
            direction: None,
            color: ColorscapeColor::None,
        }
    }
}

impl ColorscapeState {
    /// Any direction currently winding up?
    pub fn any_winding(&self) -> bool {
        self.winding_left || self.winding_right || self.winding_up || self.winding_down
    }

    /// Close the gate and begin winding up a cast.
    pub fn start_windup(&mut self, direction: CastDirection, color: ColorscapeColor) {
        self.can_cast = false;
        self.timer = 0.0;
        self.direction = Some(direction);
        self.color = color;

        match direction {
            CastDirection::Left => self.winding_left = true,
            CastDirection::Right => self.winding_right = true,
            CastDirection::Up => self.winding_up = true,
            CastDirection::Down => self.winding_down = true,
        }
    }

    fn clear_winding(&mut self) {
        self.winding_left = false;
        self.winding_right = false;
        self.winding_up = false;
        self.winding_down = false;
    }
}

/// Check the trigger table against this tick's input.
///
/// A row triggers when its grounded requirement matches, its button was
/// pressed this tick and its color is in the pool. A failed row is a
/// silent no-op.
pub fn try_trigger(
    state: &mut ColorscapeState,
    palette: &ColorPalette,
    intent: &ControlIntent,
    grounded: bool,
) {
    for (requires_grounded, direction, color) in TRIGGER_TABLE {
        if grounded == requires_grounded
            && intent.cast_pressed(direction)
            && palette.is_available(color)
        {
            state.start_windup(direction, color);
        }
    }
}

/// Advance the windup/cooldown timer by one tick.
///
/// Returns the (direction, color) of a cast whose windup completed this
/// tick, exactly once per cast. The timer keeps running past the windup
/// toward the cooldown; at the cooldown the gate reopens and the pending
/// cast clears.
pub fn advance_timer(
    state: &mut ColorscapeState,
    config: &ColorscapeConfig,
    dt: f32,
) -> Option<(CastDirection, ColorscapeColor)> {
    state.timer += dt;

    let mut fired = None;
    if state.timer >= config.windup_time && state.any_winding() {
        state.clear_winding();
        if let Some(direction) = state.direction {
            fired = Some((direction, state.color));
        }
    }

    if state.timer >= config.cooldown_time {
        state.can_cast = true;
        state.direction = None;
        state.timer = 0.0;
    }

    fired
}

/// Fired when a colorscape's windup completes.
///
/// This is the spawn sink: a collaborator instantiates the actual
/// colorscape object at `position`. The controller never reads anything
/// back.
#[derive(Event, Debug, Clone)]
pub struct ColorscapeSpawned {
    /// The casting character.
    pub caster: Entity,
    /// Color of the summoned colorscape.
    pub color: ColorscapeColor,
    /// Direction it was cast in.
    pub direction: CastDirection,
    /// World position to spawn at.
    pub position: Vec2,
}
