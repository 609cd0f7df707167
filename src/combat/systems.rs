//! Combat Systems API
//!
//! This module provides a stable API for the combat simulation systems.
//! Runner code and tests should import from here rather than directly
//! from internal modules, allowing internal refactoring without breaking
//! external consumers.
//!
//! ## System Phases
//!
//! Combat systems run in three ordered phases each tick:
//!
//! 1. **Upkeep** - match clock, cooldown ticking, damage-over-time ticks,
//!    status expiry
//! 2. **CastingAndEffects** - movement interruption, cast requests, cast
//!    completion, projectile motion and impacts, pending damage/status
//!    application, cosmetic rings, range pruning
//! 3. **Movement** - wander retargeting and status-aware movement
//!
//! Interruption runs before cast completion inside one tick, so a cast
//! that would complete on the same tick its caster moves is canceled,
//! never resolved.

use bevy::prelude::*;

// Re-export all combat systems from internal modules
// This provides a stable API - internal renames only require updating
// these re-exports

// === Phase 1: Upkeep ===
pub use super::log::advance_match_clock;
pub use super::casting::tick_cooldowns;
pub use super::status::process_dot_ticks;
pub use super::status::update_statuses;

// === Phase 2: Casting and Effects ===
pub use super::casting::cancel_casts_on_movement;
pub use super::casting::process_cast_requests;
pub use super::casting::process_casting;
pub use super::effects::move_projectiles;
pub use super::effects::process_projectile_hits;
pub use super::effects::apply_pending_damage;
pub use super::status::apply_pending_statuses;
pub use super::effects::animate_nova_rings;
pub use super::effects::prune_far_effects;

// === Phase 3: Movement ===
pub use super::movement::retarget_wanderers;
pub use super::movement::apply_movement;

// === Components and Resources ===
pub use super::components::{
    ActiveStatuses, CastingState, Character, CurrentTarget, GameRng, MovementIntent, NovaRing,
    PendingDamage, PendingStatus, Projectile, StatusEffect, StatusKind, Wanderer,
};

/// System set labels for combat system ordering.
///
/// Use these to ensure proper ordering when adding custom systems that
/// interact with combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSystemPhase {
    /// Phase 1: clock, cooldowns, damage-over-time, status expiry
    Upkeep,
    /// Phase 2: interruption, casting, projectiles, effect resolution
    CastingAndEffects,
    /// Phase 3: wander retargeting, status-aware movement
    Movement,
}

/// Configures the ordering between combat system phases.
///
/// Call this once during app setup before adding combat systems.
pub fn configure_combat_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            CombatSystemPhase::Upkeep,
            CombatSystemPhase::CastingAndEffects,
            CombatSystemPhase::Movement,
        )
            .chain(),
    );
}

/// Adds the core combat simulation systems to the app.
///
/// These are the systems needed for the combat loop to function, in both
/// scripted headless runs and interactive clients.
///
/// # Arguments
/// * `app` - The Bevy App to add systems to
/// * `run_condition` - A run condition (e.g., `in_state(GameState::Playing)`);
///   use `|| true` to always run
pub fn add_core_combat_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    // Phase 1: Upkeep
    app.add_systems(
        Update,
        (
            advance_match_clock,
            tick_cooldowns,
            process_dot_ticks,
            update_statuses,
        )
            .chain()
            .in_set(CombatSystemPhase::Upkeep)
            .run_if(run_condition.clone()),
    );

    // Flush deferred commands between phases
    app.add_systems(
        Update,
        apply_deferred
            .after(CombatSystemPhase::Upkeep)
            .before(CombatSystemPhase::CastingAndEffects)
            .run_if(run_condition.clone()),
    );

    // Phase 2: Casting and Effects
    app.add_systems(
        Update,
        (
            cancel_casts_on_movement,
            apply_deferred, // flush cancellations before completion runs
            process_cast_requests,
            process_casting,
            apply_deferred, // flush spawned projectiles and pending effects
            move_projectiles,
            process_projectile_hits,
            apply_deferred, // flush impact results before applying them
            apply_pending_damage,
            apply_pending_statuses,
            animate_nova_rings,
            prune_far_effects,
        )
            .chain()
            .in_set(CombatSystemPhase::CastingAndEffects)
            .run_if(run_condition.clone()),
    );

    // Phase 3: Movement
    app.add_systems(
        Update,
        (retarget_wanderers, apply_movement)
            .chain()
            .in_set(CombatSystemPhase::Movement)
            .run_if(run_condition),
    );
}
