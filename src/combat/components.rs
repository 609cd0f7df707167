//! Component Definitions for the Combat Simulation
//!
//! This module contains all ECS components, resources, and data structures
//! used by the simulation core.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use std::collections::HashMap;

use super::ability_config::{DotSpec, SlowSpec};
use super::abilities::AbilityType;
use super::constants::{BASE_MOVE_SPEED, DOT_TICK_INTERVAL};

// ============================================================================
// Resources
// ============================================================================

/// Seedable random number generator resource.
///
/// Using a resource instead of `rand::random()` allows deterministic
/// scenario replays when a seed is provided.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random unit direction in the ground plane.
    pub fn random_direction(&mut self) -> Vec3 {
        let angle = self.random_f32() * std::f32::consts::TAU;
        Vec3::new(angle.cos(), 0.0, angle.sin())
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// The entity the player currently has selected, if any.
///
/// Written by the input collaborator (target selection), read at cast time.
/// Effects hold the entity id only; a despawned target resolves to "gone",
/// never to an error.
#[derive(Resource, Default)]
pub struct CurrentTarget(pub Option<Entity>);

// ============================================================================
// Characters
// ============================================================================

/// Core character component containing health, mana, the known ability kit
/// and per-ability cooldown state.
#[derive(Component, Clone)]
pub struct Character {
    /// Display name for the combat log ("Mage", "Target Dummy")
    pub name: String,
    /// Maximum health points
    pub max_health: f32,
    /// Current health points
    pub current_health: f32,
    /// Maximum mana points
    pub max_mana: f32,
    /// Current mana points (spent to cast abilities)
    pub current_mana: f32,
    /// Movement speed in units per second (before status modifiers)
    pub base_speed: f32,
    /// Abilities this character knows
    pub abilities: Vec<AbilityType>,
    /// Remaining cooldown per ability, in seconds. Absence means ready.
    /// Entries are inserted at effect invocation time, never at cast start.
    pub cooldowns: HashMap<AbilityType, f32>,
    /// Total damage this character has dealt
    pub damage_dealt: f32,
    /// Total damage this character has taken
    pub damage_taken: f32,
    /// Set once on death so elimination is only processed a single time
    pub is_dead: bool,
}

impl Character {
    pub fn new(name: impl Into<String>, abilities: Vec<AbilityType>) -> Self {
        Self {
            name: name.into(),
            max_health: 100.0,
            current_health: 100.0,
            max_mana: 100.0,
            current_mana: 100.0,
            base_speed: BASE_MOVE_SPEED,
            abilities,
            cooldowns: HashMap::new(),
            damage_dealt: 0.0,
            damage_taken: 0.0,
            is_dead: false,
        }
    }

    /// Check if this character is alive (health > 0).
    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }

    pub fn knows(&self, ability: AbilityType) -> bool {
        self.abilities.contains(&ability)
    }

    pub fn can_afford(&self, mana_cost: f32) -> bool {
        self.current_mana >= mana_cost
    }

    /// Deduct mana, clamping at zero. Callers must check `can_afford`
    /// first; the clamp firing indicates a gating bug upstream.
    pub fn spend_mana(&mut self, amount: f32) {
        debug_assert!(
            self.can_afford(amount),
            "spend_mana: cost {} exceeds current mana {}",
            amount,
            self.current_mana
        );
        self.current_mana = (self.current_mana - amount).max(0.0);
    }

    /// Restore mana, clamping at max.
    pub fn restore_mana(&mut self, amount: f32) {
        self.current_mana = (self.current_mana + amount).min(self.max_mana);
    }

    /// Check whether an ability's cooldown has elapsed.
    pub fn is_ability_ready(&self, ability: AbilityType) -> bool {
        !self.cooldowns.contains_key(&ability)
    }

    /// Start an ability's cooldown. Called at effect invocation time only -
    /// a canceled or interrupted cast never reaches this.
    pub fn trigger_cooldown(&mut self, ability: AbilityType, cooldown: f32) {
        if cooldown > 0.0 {
            self.cooldowns.insert(ability, cooldown);
        }
    }

    /// Remaining cooldown in seconds, for the cooldown-overlay widget.
    /// Returns 0.0 when ready.
    pub fn remaining_cooldown(&self, ability: AbilityType) -> f32 {
        self.cooldowns.get(&ability).copied().unwrap_or(0.0)
    }
}

/// Component tracking an active cast or channel in progress.
///
/// At most one exists per character; its presence is what makes a
/// character "casting". Removed on completion, interruption, or
/// completion-time mana failure.
#[derive(Component)]
pub struct CastingState {
    /// The ability being cast
    pub ability: AbilityType,
    /// Total cast time in seconds
    pub cast_time: f32,
    /// Time remaining until the cast completes
    pub time_remaining: f32,
    /// Whether this is a channel (aura shown, mana ticks while active)
    pub channel: bool,
    /// Time until the next channel mana restoration tick
    pub mana_tick_timer: f32,
    /// Target captured at request time (if one was selected)
    pub target: Option<Entity>,
}

impl CastingState {
    /// Cast completion fraction in [0, 1], for the cast-bar widget.
    pub fn progress(&self) -> f32 {
        if self.cast_time <= 0.0 {
            return 1.0;
        }
        (1.0 - self.time_remaining / self.cast_time).clamp(0.0, 1.0)
    }
}

/// Movement direction requested by the input collaborator this tick.
///
/// Any nonzero intent cancels an in-progress cast before it can complete.
#[derive(Component, Default)]
pub struct MovementIntent {
    pub direction: Vec3,
}

impl MovementIntent {
    pub fn is_moving(&self) -> bool {
        self.direction.length_squared() > 0.0
    }
}

/// Component for self-moving practice targets: picks a new random
/// velocity at a fixed interval.
#[derive(Component)]
pub struct Wanderer {
    pub velocity: Vec3,
    /// Time until the next random direction change
    pub redirect_timer: f32,
}

impl Default for Wanderer {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            redirect_timer: 0.0,
        }
    }
}

// ============================================================================
// Active Effects
// ============================================================================

/// Component for spell projectiles in flight.
///
/// `homing_target` is a relation, not ownership: it is resolved by lookup
/// every tick, and a despawned target simply leaves the projectile flying
/// along its last computed velocity until it is pruned.
#[derive(Component)]
pub struct Projectile {
    /// The entity that cast this projectile
    pub caster: Entity,
    /// The ability this projectile represents
    pub ability: AbilityType,
    /// Target the projectile steers toward and collides with
    pub homing_target: Option<Entity>,
    /// Last computed velocity in units per second
    pub velocity: Vec3,
    /// Travel speed in units per second
    pub speed: f32,
    /// Damage applied on impact
    pub damage: f32,
    /// Damage-over-time applied on impact, if any
    pub dot: Option<DotSpec>,
    /// Movement slow applied on impact, if any
    pub slow: Option<SlowSpec>,
}

/// Purely cosmetic expanding ring spawned by the freeze pulse.
/// Self-destructs once its scale passes a fixed threshold.
#[derive(Component)]
pub struct NovaRing {
    pub scale: f32,
}

// ============================================================================
// Status Effects
// ============================================================================

/// Kinds of timed status effects that can sit on a target.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StatusKind {
    /// Movement speed multiplied by a reduction factor (magnitude)
    Slowed,
    /// Velocity overridden to zero
    Frozen,
    /// Transformed into a critter with a slow wandering velocity override
    Transformed,
    /// Periodic damage (magnitude per tick)
    DamageOverTime,
}

impl StatusKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Slowed => "Slowed",
            StatusKind::Frozen => "Frozen",
            StatusKind::Transformed => "Transformed",
            StatusKind::DamageOverTime => "Damage Over Time",
        }
    }
}

/// An active status effect on a character.
#[derive(Clone)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Time remaining before the status expires (in seconds)
    pub time_remaining: f32,
    /// Meaning depends on kind: slow factor for Slowed, damage per tick
    /// for DamageOverTime, unused otherwise.
    pub magnitude: f32,
    /// For DamageOverTime: seconds between damage applications
    pub tick_interval: f32,
    /// For DamageOverTime: time remaining until the next tick
    pub time_until_next_tick: f32,
    /// For Transformed: current wander direction
    pub wander_direction: Vec3,
    /// For Transformed: time until the wander direction is re-rolled
    pub wander_timer: f32,
    /// Who applied this status (for damage attribution)
    pub caster: Option<Entity>,
    /// Name of the ability that created this status (for logging)
    pub source: String,
}

impl StatusEffect {
    pub fn slowed(factor: f32, duration: f32, caster: Option<Entity>, source: &str) -> Self {
        Self {
            kind: StatusKind::Slowed,
            time_remaining: duration,
            magnitude: factor,
            tick_interval: 0.0,
            time_until_next_tick: 0.0,
            wander_direction: Vec3::ZERO,
            wander_timer: 0.0,
            caster,
            source: source.to_string(),
        }
    }

    pub fn frozen(duration: f32, caster: Option<Entity>, source: &str) -> Self {
        Self {
            kind: StatusKind::Frozen,
            time_remaining: duration,
            magnitude: 0.0,
            tick_interval: 0.0,
            time_until_next_tick: 0.0,
            wander_direction: Vec3::ZERO,
            wander_timer: 0.0,
            caster,
            source: source.to_string(),
        }
    }

    pub fn transformed(
        duration: f32,
        wander_direction: Vec3,
        caster: Option<Entity>,
        source: &str,
    ) -> Self {
        Self {
            kind: StatusKind::Transformed,
            time_remaining: duration,
            magnitude: 0.0,
            tick_interval: 0.0,
            time_until_next_tick: 0.0,
            wander_direction,
            wander_timer: 1.0,
            caster,
            source: source.to_string(),
        }
    }

    pub fn damage_over_time(
        damage_per_tick: f32,
        duration: f32,
        caster: Option<Entity>,
        source: &str,
    ) -> Self {
        Self {
            kind: StatusKind::DamageOverTime,
            time_remaining: duration,
            magnitude: damage_per_tick,
            tick_interval: DOT_TICK_INTERVAL,
            time_until_next_tick: DOT_TICK_INTERVAL,
            wander_direction: Vec3::ZERO,
            wander_timer: 0.0,
            caster,
            source: source.to_string(),
        }
    }
}

/// Component tracking active status effects on a character.
///
/// Different kinds coexist independently; reapplying the same kind resets
/// its expiry rather than stacking.
#[derive(Component, Default)]
pub struct ActiveStatuses {
    pub statuses: SmallVec<[StatusEffect; 4]>,
}

impl ActiveStatuses {
    pub fn has(&self, kind: StatusKind) -> bool {
        self.statuses.iter().any(|s| s.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.statuses.iter().find(|s| s.kind == kind)
    }
}

/// Temporary entity queueing a status application.
///
/// Effect resolution spawns these instead of mutating targets directly;
/// `apply_pending_statuses` performs the write later in the same tick.
#[derive(Component)]
pub struct PendingStatus {
    pub target: Entity,
    pub status: StatusEffect,
}

/// Temporary entity queueing direct damage from an instant effect.
#[derive(Component)]
pub struct PendingDamage {
    pub target: Entity,
    pub amount: f32,
    pub caster: Option<Entity>,
    /// Ability name, for the combat log
    pub source: String,
}
