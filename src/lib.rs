//! # `satchel_character_controller`
//!
//! A kinematic 2D platformer character controller with environment backend
//! abstraction.
//!
//! This crate provides a tuneable, fully deterministic character controller
//! that:
//! - Detects ground, walls and ceiling with fans of rays cast from the
//!   edges of an axis-aligned bounding box
//! - Recognizes climbable and descendable slopes and projects motion onto
//!   the surface so the character follows terrain contour
//! - Integrates speed under acceleration, exponential damping and a gravity
//!   curve derived from jump height and time-to-apex
//! - Buffers jump input, supports variable jump height from hold duration,
//!   and allows a grace window after stepping off a ledge
//! - Drives a cooldown-gated directional ability system backed by a
//!   per-color resource pool
//! - Abstracts the environment query for easy swapping (Rapier2D included)
//!
//! ## Architecture
//!
//! The controller is **kinematic**: speeds are per-tick displacements
//! applied straight to the transform. Each `FixedUpdate` tick runs a fixed
//! pipeline:
//! 1. Contact scan: four ray fans refresh clearances and contact flags
//! 2. Movement, mode-dispatched: integration, slope probes, colorscapes
//!    and collision resolution for normal movement; frozen paths for
//!    hanging/climbing/stopped
//! 3. Commit: facing update and position translation
//! 4. Output: state markers and the telemetry event
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use satchel_character_controller::prelude::*;
//!
//! // Create controller components for a character
//! let character = CharacterBundle::new(ScanConfig::default(), ControllerConfig::player());
//! ```

use bevy::prelude::*;

use crate::colorscape::{ColorPalette, ColorscapeSpawned, ColorscapeState};
use crate::config::{Abilities, ColorscapeConfig, ControllerConfig, ScanConfig};
use crate::contact::ContactState;
use crate::intent::ControlIntent;
use crate::jump::JumpState;
use crate::motion::MotionState;
use crate::slope::SlopeState;
use crate::state::{ControllerOutput, PlayerMode};

pub mod backend;
pub mod collision;
pub mod colorscape;
pub mod config;
pub mod contact;
pub mod intent;
pub mod jump;
pub mod motion;
pub mod resolve;
pub mod slope;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{EnvironmentBackend, NoOpBackendPlugin};
    pub use crate::collision::RayHit;
    pub use crate::colorscape::{
        ColorPalette, ColorscapeColor, ColorscapeSpawned, ColorscapeState,
    };
    pub use crate::config::{Abilities, ColorscapeConfig, ConfigError, ControllerConfig, ScanConfig};
    pub use crate::contact::ContactState;
    pub use crate::intent::{CastDirection, ControlIntent};
    pub use crate::jump::JumpState;
    pub use crate::motion::MotionState;
    pub use crate::slope::SlopeState;
    pub use crate::state::{Airborne, ControllerOutput, Grounded, PlayerMode};
    pub use crate::{CharacterBundle, ControllerSet, SatchelControllerPlugin};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::Rapier2dBackend;
}

/// Pipeline phases of one controller tick, chained in this order inside
/// `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSet {
    /// Contact scanning (ray fans, contact flags).
    Scan,
    /// Mode dispatch: integration, slopes, colorscapes, resolution.
    Movement,
    /// Facing update and position translation.
    Commit,
    /// State markers and telemetry.
    Output,
}

/// Everything a controlled character needs, wired together.
///
/// The motion and jump state are derived from the supplied configuration;
/// abilities and the color palette start locked/empty and are granted by
/// collaborators.
#[derive(Bundle)]
pub struct CharacterBundle {
    pub scan: ScanConfig,
    pub config: ControllerConfig,
    pub colorscape_config: ColorscapeConfig,
    pub abilities: Abilities,
    pub contacts: ContactState,
    pub slopes: SlopeState,
    pub motion: MotionState,
    pub jump: JumpState,
    pub colorscape: ColorscapeState,
    pub palette: ColorPalette,
    pub intent: ControlIntent,
    pub mode: PlayerMode,
}

impl CharacterBundle {
    /// Build a character from its scan geometry and movement tuning.
    pub fn new(scan: ScanConfig, config: ControllerConfig) -> Self {
        Self {
            motion: MotionState::new(&config),
            jump: JumpState::new(&config),
            scan,
            config,
            colorscape_config: ColorscapeConfig::default(),
            abilities: Abilities::default(),
            contacts: ContactState::default(),
            slopes: SlopeState::default(),
            colorscape: ColorscapeState::default(),
            palette: ColorPalette::default(),
            intent: ControlIntent::default(),
            mode: PlayerMode::default(),
        }
    }

    /// Builder: set the unlocked abilities.
    pub fn with_abilities(mut self, abilities: Abilities) -> Self {
        self.abilities = abilities;
        self
    }

    /// Builder: set the starting color palette.
    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Builder: set the colorscape tuning.
    pub fn with_colorscape_config(mut self, config: ColorscapeConfig) -> Self {
        self.colorscape_config = config;
        self
    }
}

impl Default for CharacterBundle {
    fn default() -> Self {
        Self::new(ScanConfig::default(), ControllerConfig::default())
    }
}

/// Main plugin for the character controller.
///
/// Generic over an environment backend `B` which answers the controller's
/// ray queries (see [`backend::EnvironmentBackend`]).
///
/// # Examples
///
/// With the Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use satchel_character_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(SatchelControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct SatchelControllerPlugin<B: backend::EnvironmentBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::EnvironmentBackend> Default for SatchelControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::EnvironmentBackend> Plugin for SatchelControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ScanConfig>();
        app.register_type::<config::ControllerConfig>();
        app.register_type::<config::ColorscapeConfig>();
        app.register_type::<config::Abilities>();
        app.register_type::<contact::ContactState>();
        app.register_type::<slope::SlopeState>();
        app.register_type::<motion::MotionState>();
        app.register_type::<jump::JumpState>();
        app.register_type::<colorscape::ColorscapeState>();
        app.register_type::<colorscape::ColorPalette>();
        app.register_type::<intent::ControlIntent>();
        app.register_type::<state::PlayerMode>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();

        app.add_event::<ColorscapeSpawned>();
        app.add_event::<ControllerOutput>();

        // Add the environment backend plugin
        app.add_plugins(B::plugin());

        app.configure_sets(
            FixedUpdate,
            (
                ControllerSet::Scan,
                ControllerSet::Movement,
                ControllerSet::Commit,
                ControllerSet::Output,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (systems::validate_scan_configs, systems::scan_contacts::<B>)
                .chain()
                .in_set(ControllerSet::Scan),
        );
        app.add_systems(
            FixedUpdate,
            (
                systems::integrate_motion,
                systems::update_slopes::<B>,
                systems::update_colorscapes,
                systems::resolve_movement,
                systems::climb_movement,
                systems::halt_movement,
            )
                .chain()
                .in_set(ControllerSet::Movement),
        );
        app.add_systems(
            FixedUpdate,
            systems::commit_movement.in_set(ControllerSet::Commit),
        );
        app.add_systems(
            FixedUpdate,
            (systems::sync_state_markers, systems::emit_output).in_set(ControllerSet::Output),
        );

        // Consume input edges once the tick has run
        app.add_systems(FixedPostUpdate, systems::clear_intent_edges);
    }
}
