//! Casting State Machine
//!
//! Handles the full life cycle of an ability cast:
//! - Precondition gating (known ability, cooldown, busy check, mana)
//! - Instant resolution vs. timed casts vs. channels
//! - Cast completion, including the completion-time mana re-check
//! - Movement interruption
//! - Channel mana restoration ticks
//! - Cooldown ticking
//!
//! A character with no `CastingState` component is idle; inserting the
//! component is the only way to become casting, and removing it is the
//! only way back. Cancellation is therefore a plain component removal,
//! never task cancellation.

use bevy::prelude::*;
use std::collections::HashSet;

use super::abilities::{AbilityType, CastError, CastOutcome};
use super::ability_config::{AbilityConfig, AbilityDefinitions};
use super::components::{CastingState, Character, CurrentTarget, GameRng, MovementIntent};
use super::constants::{CHANNEL_MANA_FRACTION, CHANNEL_MANA_TICK_INTERVAL};
use super::effects::invoke_effect;
use super::events::{
    AuraAppliedEvent, AuraRemovalReason, AuraRemovedEvent, CastFailedEvent, CastRequest,
    ProjectileSpawnedEvent,
};
use super::log::{CombatLog, CombatLogEventType};
use super::utils::is_facing;

/// Decide whether a cast request may proceed, and how it will resolve.
///
/// Checks run in a fixed order and the first failure wins:
/// ability known, cooldown elapsed, not already casting, mana available.
/// The function only reads state; the caller performs the transition.
pub fn check_cast(
    character: &Character,
    is_casting: bool,
    ability: AbilityType,
    def: &AbilityConfig,
) -> Result<CastOutcome, CastError> {
    if !character.knows(ability) {
        return Err(CastError::UnknownAbility);
    }
    if !character.is_ability_ready(ability) {
        return Err(CastError::OnCooldown);
    }
    if is_casting {
        return Err(CastError::AlreadyCasting);
    }
    // A zero-cost channel passes trivially; everything else needs the
    // mana up front, even though timed casts only deduct at completion.
    if !character.can_afford(def.mana_cost) {
        return Err(CastError::InsufficientMana);
    }

    if def.is_instant() {
        Ok(CastOutcome::InstantResolved)
    } else if def.channel {
        Ok(CastOutcome::ChannelStarted)
    } else {
        Ok(CastOutcome::CastStarted)
    }
}

/// Caller-side validation for offensive abilities: a target must be
/// selected and the caster must be looking at it.
///
/// This lives with the core so every input collaborator shares one
/// implementation, but the state machine itself never re-checks it.
pub fn validate_targeting(
    def: &AbilityConfig,
    caster: &Transform,
    target: Option<&Transform>,
) -> Result<(), CastError> {
    if !def.requires_facing {
        return Ok(());
    }
    let Some(target_transform) = target else {
        return Err(CastError::NoTarget);
    };
    if !is_facing(caster, target_transform.translation) {
        return Err(CastError::NotFacingTarget);
    }
    Ok(())
}

/// Consume cast requests from the input collaborator.
///
/// Instants resolve on the spot (deduct mana, start the cooldown, invoke
/// the effect). Timed casts and channels insert a `CastingState` and leave
/// mana untouched until completion.
pub fn process_cast_requests(
    mut commands: Commands,
    mut requests: EventReader<CastRequest>,
    defs: Res<AbilityDefinitions>,
    current_target: Res<CurrentTarget>,
    mut rng: ResMut<GameRng>,
    mut combat_log: ResMut<CombatLog>,
    mut casters: Query<(&mut Character, &Transform, Option<&CastingState>)>,
    positions: Query<&Transform, With<Character>>,
    mut failed: EventWriter<CastFailedEvent>,
    mut aura_applied: EventWriter<AuraAppliedEvent>,
    mut projectile_spawned: EventWriter<ProjectileSpawnedEvent>,
) {
    // CastingState insertions are deferred until the next command flush,
    // so track casts started within this batch as well.
    let mut started_this_tick: HashSet<Entity> = HashSet::new();

    for request in requests.read() {
        let Ok((mut character, transform, casting)) = casters.get_mut(request.caster) else {
            continue;
        };
        if !character.is_alive() {
            continue;
        }

        let def = defs.get_unchecked(&request.ability);
        let is_casting = casting.is_some() || started_this_tick.contains(&request.caster);

        match check_cast(&character, is_casting, request.ability, def) {
            Err(error) => {
                combat_log.log(
                    CombatLogEventType::CastFailed,
                    format!("{}'s {} failed: {}", character.name, def.name, error),
                );
                failed.send(CastFailedEvent {
                    caster: request.caster,
                    ability: request.ability,
                    error,
                });
            }
            Ok(CastOutcome::InstantResolved) => {
                character.spend_mana(def.mana_cost);
                character.trigger_cooldown(request.ability, def.cooldown);
                combat_log.log(
                    CombatLogEventType::AbilityUsed,
                    format!("{} casts {}", character.name, def.name),
                );

                let target = current_target.0;
                let target_pos = target
                    .and_then(|t| positions.get(t).ok())
                    .map(|t| t.translation);
                invoke_effect(
                    &mut commands,
                    &mut rng,
                    &mut combat_log,
                    &mut projectile_spawned,
                    request.caster,
                    &mut character,
                    transform,
                    target,
                    target_pos,
                    request.ability,
                    def,
                );
            }
            Ok(outcome) => {
                commands.entity(request.caster).insert(CastingState {
                    ability: request.ability,
                    cast_time: def.cast_time,
                    time_remaining: def.cast_time,
                    channel: def.channel,
                    mana_tick_timer: CHANNEL_MANA_TICK_INTERVAL,
                    target: current_target.0,
                });
                started_this_tick.insert(request.caster);

                if outcome == CastOutcome::ChannelStarted {
                    // The channel aura is visible for the whole duration.
                    aura_applied.send(AuraAppliedEvent {
                        target: request.caster,
                        aura_name: def.name.clone(),
                    });
                }
                combat_log.log(
                    CombatLogEventType::AbilityUsed,
                    format!(
                        "{} begins casting {} ({:.1}s)",
                        character.name, def.name, def.cast_time
                    ),
                );
            }
        }
    }
}

/// Cancel casts and channels the moment their caster tries to move.
///
/// Runs before cast completion within the tick, so an interrupt always
/// wins over a completion in the same tick. No mana is deducted and no
/// cooldown is started for the canceled cast.
pub fn cancel_casts_on_movement(
    mut commands: Commands,
    defs: Res<AbilityDefinitions>,
    mut combat_log: ResMut<CombatLog>,
    mut aura_removed: EventWriter<AuraRemovedEvent>,
    movers: Query<(Entity, &Character, &MovementIntent, &CastingState)>,
) {
    for (entity, character, intent, casting) in movers.iter() {
        if !intent.is_moving() {
            continue;
        }
        let def = defs.get_unchecked(&casting.ability);
        combat_log.log(
            CombatLogEventType::CastInterrupted,
            format!("{}'s {} canceled by movement", character.name, def.name),
        );
        if casting.channel {
            aura_removed.send(AuraRemovedEvent {
                target: entity,
                aura_name: def.name.clone(),
                reason: AuraRemovalReason::Interrupted,
            });
        }
        commands.entity(entity).remove::<CastingState>();
    }
}

/// Advance in-progress casts and channels; resolve those that complete.
///
/// Channels restore `max_mana / 8` once per elapsed second while active.
/// Non-channels re-check mana at completion - the pool may have changed
/// since the cast started - and cancel without cooldown if it no longer
/// covers the cost.
pub fn process_casting(
    mut commands: Commands,
    time: Res<Time>,
    defs: Res<AbilityDefinitions>,
    mut rng: ResMut<GameRng>,
    mut combat_log: ResMut<CombatLog>,
    mut casters: Query<(Entity, &mut Character, &Transform, &mut CastingState)>,
    positions: Query<&Transform, With<Character>>,
    mut failed: EventWriter<CastFailedEvent>,
    mut aura_removed: EventWriter<AuraRemovedEvent>,
    mut projectile_spawned: EventWriter<ProjectileSpawnedEvent>,
) {
    let dt = time.delta_secs();

    for (entity, mut character, transform, mut casting) in casters.iter_mut() {
        let def = defs.get_unchecked(&casting.ability);

        // Dead casters can't finish spells.
        if !character.is_alive() {
            if casting.channel {
                aura_removed.send(AuraRemovedEvent {
                    target: entity,
                    aura_name: def.name.clone(),
                    reason: AuraRemovalReason::Interrupted,
                });
            }
            commands.entity(entity).remove::<CastingState>();
            continue;
        }

        if casting.channel {
            casting.mana_tick_timer -= dt;
            while casting.mana_tick_timer <= 0.0 {
                let gain = character.max_mana / CHANNEL_MANA_FRACTION;
                character.restore_mana(gain);
                casting.mana_tick_timer += CHANNEL_MANA_TICK_INTERVAL;
                combat_log.log(
                    CombatLogEventType::ManaGain,
                    format!(
                        "{} restores {:.0} mana ({} tick)",
                        character.name, gain, def.name
                    ),
                );
            }
        }

        casting.time_remaining -= dt;
        if casting.time_remaining > 0.0 {
            continue;
        }

        // Cast complete.
        let ability = casting.ability;

        if !casting.channel && !character.can_afford(def.mana_cost) {
            combat_log.log(
                CombatLogEventType::CastFailed,
                format!(
                    "{} no longer has the mana for {}, cast canceled",
                    character.name, def.name
                ),
            );
            failed.send(CastFailedEvent {
                caster: entity,
                ability,
                error: CastError::InsufficientMana,
            });
            commands.entity(entity).remove::<CastingState>();
            continue;
        }

        if !casting.channel {
            character.spend_mana(def.mana_cost);
        }
        character.trigger_cooldown(ability, def.cooldown);

        let target = casting.target;
        let target_pos = target
            .and_then(|t| positions.get(t).ok())
            .map(|t| t.translation);
        invoke_effect(
            &mut commands,
            &mut rng,
            &mut combat_log,
            &mut projectile_spawned,
            entity,
            &mut character,
            transform,
            target,
            target_pos,
            ability,
            def,
        );

        if casting.channel {
            aura_removed.send(AuraRemovedEvent {
                target: entity,
                aura_name: def.name.clone(),
                reason: AuraRemovalReason::Completed,
            });
        }
        combat_log.log(
            CombatLogEventType::AbilityUsed,
            format!("{} finishes casting {}", character.name, def.name),
        );
        commands.entity(entity).remove::<CastingState>();
    }
}

/// Tick down per-ability cooldowns; entries are dropped once elapsed.
pub fn tick_cooldowns(time: Res<Time>, mut characters: Query<&mut Character>) {
    let dt = time.delta_secs();
    for mut character in characters.iter_mut() {
        if character.cooldowns.is_empty() {
            continue;
        }
        for remaining in character.cooldowns.values_mut() {
            *remaining -= dt;
        }
        character.cooldowns.retain(|_, remaining| *remaining > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ability_config::AbilityEffect;

    fn instant_def() -> AbilityConfig {
        AbilityConfig {
            name: "Test Pulse".to_string(),
            cast_time: 0.0,
            range: 8.0,
            mana_cost: 25.0,
            cooldown: 5.0,
            channel: false,
            requires_facing: false,
            effect: AbilityEffect::FreezePulse {
                damage: 3.0,
                radius: 8.0,
                freeze_duration: 8.0,
            },
        }
    }

    fn timed_def() -> AbilityConfig {
        AbilityConfig {
            name: "Test Bolt".to_string(),
            cast_time: 1.5,
            range: 18.0,
            mana_cost: 15.0,
            cooldown: 2.5,
            channel: false,
            requires_facing: true,
            effect: AbilityEffect::Bolt {
                damage: 8.0,
                speed: 12.0,
                dot: None,
                slow: None,
            },
        }
    }

    fn channel_def() -> AbilityConfig {
        AbilityConfig {
            name: "Test Channel".to_string(),
            cast_time: 8.0,
            range: 0.0,
            mana_cost: 0.0,
            cooldown: 12.0,
            channel: true,
            requires_facing: false,
            effect: AbilityEffect::RestoreMana,
        }
    }

    fn caster() -> Character {
        Character::new(
            "Mage",
            vec![AbilityType::FrostNova, AbilityType::FrostBolt, AbilityType::Innovation],
        )
    }

    #[test]
    fn test_unknown_ability_rejected_first() {
        let mut character = caster();
        character.abilities.clear();
        // Even while "busy" and broke, the unknown-ability error wins.
        character.current_mana = 0.0;
        let result = check_cast(&character, true, AbilityType::FrostNova, &instant_def());
        assert_eq!(result, Err(CastError::UnknownAbility));
    }

    #[test]
    fn test_cooldown_checked_before_busy() {
        let mut character = caster();
        character.trigger_cooldown(AbilityType::FrostNova, 5.0);
        let result = check_cast(&character, true, AbilityType::FrostNova, &instant_def());
        assert_eq!(result, Err(CastError::OnCooldown));
    }

    #[test]
    fn test_busy_checked_before_mana() {
        let mut character = caster();
        character.current_mana = 0.0;
        let result = check_cast(&character, true, AbilityType::FrostNova, &instant_def());
        assert_eq!(result, Err(CastError::AlreadyCasting));
    }

    #[test]
    fn test_insufficient_mana_is_last_gate() {
        let mut character = caster();
        character.current_mana = 10.0;
        let result = check_cast(&character, false, AbilityType::FrostNova, &instant_def());
        assert_eq!(result, Err(CastError::InsufficientMana));
    }

    #[test]
    fn test_outcome_matches_ability_shape() {
        let character = caster();
        assert_eq!(
            check_cast(&character, false, AbilityType::FrostNova, &instant_def()),
            Ok(CastOutcome::InstantResolved)
        );
        assert_eq!(
            check_cast(&character, false, AbilityType::FrostBolt, &timed_def()),
            Ok(CastOutcome::CastStarted)
        );
        assert_eq!(
            check_cast(&character, false, AbilityType::Innovation, &channel_def()),
            Ok(CastOutcome::ChannelStarted)
        );
    }

    #[test]
    fn test_zero_cost_channel_castable_at_empty_mana() {
        let mut character = caster();
        character.current_mana = 0.0;
        assert_eq!(
            check_cast(&character, false, AbilityType::Innovation, &channel_def()),
            Ok(CastOutcome::ChannelStarted)
        );
    }

    #[test]
    fn test_validate_targeting_requires_target() {
        let caster_transform = Transform::IDENTITY;
        let result = validate_targeting(&timed_def(), &caster_transform, None);
        assert_eq!(result, Err(CastError::NoTarget));
    }

    #[test]
    fn test_validate_targeting_requires_facing() {
        let caster_transform = Transform::IDENTITY;
        let behind = Transform::from_xyz(0.0, 0.0, 10.0);
        let result = validate_targeting(&timed_def(), &caster_transform, Some(&behind));
        assert_eq!(result, Err(CastError::NotFacingTarget));

        let ahead = Transform::from_xyz(0.0, 0.0, -10.0);
        assert!(validate_targeting(&timed_def(), &caster_transform, Some(&ahead)).is_ok());
    }

    #[test]
    fn test_validate_targeting_skips_untargeted_abilities() {
        let caster_transform = Transform::IDENTITY;
        assert!(validate_targeting(&channel_def(), &caster_transform, None).is_ok());
    }
}
