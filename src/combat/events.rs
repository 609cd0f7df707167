//! Combat events
//!
//! Fire-and-forget notifications produced for visual and UI collaborators,
//! plus the cast-request input event. No acknowledgment is expected for
//! any of them.

use bevy::prelude::*;

use super::abilities::{AbilityType, CastError};
use super::components::StatusKind;

/// Input event: a resolved key press asking a character to cast.
///
/// Facing/targeting preconditions for offensive abilities are validated by
/// the sender before this event is emitted.
#[derive(Event)]
pub struct CastRequest {
    pub caster: Entity,
    pub ability: AbilityType,
}

/// A cast request was refused, or an in-progress cast was canceled at
/// completion time. Surfaced to the player as a short-lived notification.
#[derive(Event)]
pub struct CastFailedEvent {
    pub caster: Entity,
    pub ability: AbilityType,
    pub error: CastError,
}

/// Event fired when a projectile entity is created.
#[derive(Event)]
pub struct ProjectileSpawnedEvent {
    pub projectile: Entity,
    pub caster: Entity,
    pub ability: AbilityType,
}

/// Event fired when a projectile entity is removed.
#[derive(Event)]
pub struct ProjectileRemovedEvent {
    pub projectile: Entity,
    pub reason: ProjectileRemovalReason,
}

/// Why a projectile was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileRemovalReason {
    /// Reached its target and resolved
    Impact,
    /// Exceeded the distance bound from its caster
    OutOfRange,
    /// Its target died before impact
    TargetDied,
}

/// Event fired when a channel aura appears on a character.
#[derive(Event)]
pub struct AuraAppliedEvent {
    pub target: Entity,
    pub aura_name: String,
}

/// Event fired when a channel aura is removed.
#[derive(Event)]
pub struct AuraRemovedEvent {
    pub target: Entity,
    pub aura_name: String,
    pub reason: AuraRemovalReason,
}

/// Why an aura was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuraRemovalReason {
    /// The channel ran to completion
    Completed,
    /// The channel was interrupted
    Interrupted,
}

/// Event fired when a status effect lands on a character.
#[derive(Event)]
pub struct StatusAppliedEvent {
    pub target: Entity,
    pub kind: StatusKind,
    pub duration: f32,
}

/// Event fired when a status effect expires, so visual overrides
/// (tint, critter model) can be reverted.
#[derive(Event)]
pub struct StatusClearedEvent {
    pub target: Entity,
    pub kind: StatusKind,
}
