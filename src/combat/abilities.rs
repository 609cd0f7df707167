//! Ability System - Types and Enums
//!
//! This module contains ability-related types and enums.
//! Actual ability definitions are loaded from `assets/config/abilities.ron`
//! via the `ability_config` module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Enum representing available abilities.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AbilityType {
    Fireball,   // 2s cast, homing bolt + burn over time
    FrostBolt,  // 1.5s cast, homing bolt + movement slow
    FrostNova,  // instant, freezes the target in place if close enough
    Innovation, // 8s channel, restores mana to full on completion
    Sheep,      // 2s cast, transforms the target into a wandering critter
}

/// What a successful cast request resolved to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CastOutcome {
    /// The effect resolved synchronously at request time.
    InstantResolved,
    /// A timed cast started; the effect fires on completion.
    CastStarted,
    /// A channel started; the effect fires on completion and an aura is
    /// shown for its duration.
    ChannelStarted,
}

/// Why a cast request was refused. All variants are recoverable,
/// user-facing conditions - never escalated to a fault.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CastError {
    /// The character does not know this ability.
    UnknownAbility,
    /// The ability's cooldown has not elapsed yet.
    OnCooldown,
    /// Another cast or channel is already in progress.
    AlreadyCasting,
    /// Not enough mana at check time.
    InsufficientMana,
    /// Offensive ability used with no target selected (caller-side check).
    NoTarget,
    /// Offensive ability used while not facing the target (caller-side check).
    NotFacingTarget,
}

impl fmt::Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            CastError::UnknownAbility => "ability not known",
            CastError::OnCooldown => "on cooldown",
            CastError::AlreadyCasting => "already casting",
            CastError::InsufficientMana => "not enough mana",
            CastError::NoTarget => "no target selected",
            CastError::NotFacingTarget => "not facing target",
        };
        write!(f, "{}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_error_messages_are_user_facing() {
        assert_eq!(CastError::NoTarget.to_string(), "no target selected");
        assert_eq!(CastError::NotFacingTarget.to_string(), "not facing target");
        assert_eq!(CastError::InsufficientMana.to_string(), "not enough mana");
    }

    #[test]
    fn test_ability_type_round_trips_through_serde() {
        let json = serde_json::to_string(&AbilityType::FrostBolt).unwrap();
        let back: AbilityType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AbilityType::FrostBolt);
    }
}
