//! Control input snapshot.
//!
//! The controller never polls devices. Whatever drives the character
//! (keyboard, gamepad, AI, replay) writes one [`ControlIntent`] snapshot
//! per tick; the controller reads it and clears the per-tick edge flags at
//! the end of the tick.

use bevy::prelude::*;

/// One of the four cast directions for the colorscape ability.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastDirection {
    Left,
    Right,
    Up,
    Down,
}

impl CastDirection {
    /// Unit vector for this direction.
    pub fn vec(self) -> Vec2 {
        match self {
            CastDirection::Left => Vec2::NEG_X,
            CastDirection::Right => Vec2::X,
            CastDirection::Up => Vec2::Y,
            CastDirection::Down => Vec2::NEG_Y,
        }
    }
}

/// Input snapshot for one tick.
///
/// Axes are continuous state in `[-1, 1]`; `sprint_held` is level state;
/// the jump and cast fields are edges that are only true on the tick the
/// button was pressed (or released) and are cleared automatically after
/// the controller has run.
///
/// # Example
///
/// ```rust,ignore
/// // Your code handles input, the controller receives plain state:
/// intent.set_horizontal(axis_value);
/// intent.press_jump();           // on the press edge
/// intent.release_jump();         // on the release edge
/// intent.press_cast(CastDirection::Left);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct ControlIntent {
    /// Horizontal movement axis (-1.0 = left, 1.0 = right).
    pub horizontal: f32,
    /// Vertical input axis (-1.0 = down, 1.0 = up). Drives the hanging /
    /// climbing transitions.
    pub vertical: f32,
    /// Jump button was pressed this tick.
    pub jump_pressed: bool,
    /// Jump button was released this tick.
    pub jump_released: bool,
    /// Sprint modifier is currently held.
    pub sprint_held: bool,

    /// Left cast button was pressed this tick.
    pub cast_left: bool,
    /// Right cast button was pressed this tick.
    pub cast_right: bool,
    /// Up cast button was pressed this tick.
    pub cast_up: bool,
    /// Down cast button was pressed this tick.
    pub cast_down: bool,
}

impl ControlIntent {
    /// Create an empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal axis (-1.0 = left, 1.0 = right).
    pub fn set_horizontal(&mut self, value: f32) {
        self.horizontal = value.clamp(-1.0, 1.0);
    }

    /// Set the vertical axis (-1.0 = down, 1.0 = up).
    pub fn set_vertical(&mut self, value: f32) {
        self.vertical = value.clamp(-1.0, 1.0);
    }

    /// Record a jump press edge for this tick.
    pub fn press_jump(&mut self) {
        self.jump_pressed = true;
    }

    /// Record a jump release edge for this tick.
    pub fn release_jump(&mut self) {
        self.jump_released = true;
    }

    /// Set whether the sprint modifier is held.
    pub fn set_sprint_held(&mut self, held: bool) {
        self.sprint_held = held;
    }

    /// Record a cast press edge for this tick.
    pub fn press_cast(&mut self, direction: CastDirection) {
        match direction {
            CastDirection::Left => self.cast_left = true,
            CastDirection::Right => self.cast_right = true,
            CastDirection::Up => self.cast_up = true,
            CastDirection::Down => self.cast_down = true,
        }
    }

    /// Whether the cast button for `direction` was pressed this tick.
    pub fn cast_pressed(&self, direction: CastDirection) -> bool {
        match direction {
            CastDirection::Left => self.cast_left,
            CastDirection::Right => self.cast_right,
            CastDirection::Up => self.cast_up,
            CastDirection::Down => self.cast_down,
        }
    }

    /// Clear the per-tick edge flags. Axes and held state persist.
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.jump_released = false;
        self.cast_left = false;
        self.cast_right = false;
        self.cast_up = false;
        self.cast_down = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_clamped() {
        let mut intent = ControlIntent::new();
        intent.set_horizontal(5.0);
        assert_eq!(intent.horizontal, 1.0);

        intent.set_horizontal(-5.0);
        assert_eq!(intent.horizontal, -1.0);

        intent.set_vertical(0.3);
        assert_eq!(intent.vertical, 0.3);
    }

    #[test]
    fn cast_press_round_trip() {
        let mut intent = ControlIntent::new();
        assert!(!intent.cast_pressed(CastDirection::Up));

        intent.press_cast(CastDirection::Up);
        assert!(intent.cast_pressed(CastDirection::Up));
        assert!(!intent.cast_pressed(CastDirection::Down));
    }

    #[test]
    fn clear_edges_keeps_level_state() {
        let mut intent = ControlIntent::new();
        intent.set_horizontal(1.0);
        intent.set_sprint_held(true);
        intent.press_jump();
        intent.release_jump();
        intent.press_cast(CastDirection::Left);

        intent.clear_edges();

        assert_eq!(intent.horizontal, 1.0);
        assert!(intent.sprint_held);
        assert!(!intent.jump_pressed);
        assert!(!intent.jump_released);
        assert!(!intent.cast_left);
    }

    #[test]
    fn cast_direction_vectors() {
        assert_eq!(CastDirection::Left.vec(), Vec2::NEG_X);
        assert_eq!(CastDirection::Right.vec(), Vec2::X);
        assert_eq!(CastDirection::Up.vec(), Vec2::Y);
        assert_eq!(CastDirection::Down.vec(), Vec2::NEG_Y);
    }
}
