//! Combat simulation core
//!
//! Implements the ability-casting state machine, the cooldown and mana
//! ledger, the in-flight effect tracker, and timed status effects.
//! Everything advances on one externally driven tick; nothing here blocks
//! or spawns its own timers.

use bevy::prelude::*;

pub mod abilities;
pub mod ability_config;
pub mod casting;
pub mod components;
pub mod constants;
pub mod effects;
pub mod events;
pub mod log;
pub mod movement;
pub mod status;
pub mod systems;
pub mod utils;

use components::{CurrentTarget, GameRng};
use events::*;

/// Plugin wiring the combat simulation into an app.
///
/// Ability definitions are loaded separately (see
/// [`ability_config::AbilityConfigPlugin`]) so tests and tools can supply
/// their own registries.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Input and notification events
            .add_event::<CastRequest>()
            .add_event::<CastFailedEvent>()
            .add_event::<ProjectileSpawnedEvent>()
            .add_event::<ProjectileRemovedEvent>()
            .add_event::<AuraAppliedEvent>()
            .add_event::<AuraRemovedEvent>()
            .add_event::<StatusAppliedEvent>()
            .add_event::<StatusClearedEvent>()
            // Resources
            .init_resource::<log::CombatLog>()
            .init_resource::<CurrentTarget>()
            .init_resource::<GameRng>();

        systems::configure_combat_system_ordering(app);
        systems::add_core_combat_systems(app, || true);
    }
}
