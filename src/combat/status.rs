//! Status Effect Systems
//!
//! Handles the timed modifiers that sit on targets (slow, freeze,
//! transform, damage-over-time):
//! - Applying queued statuses, with same-kind reapplication resetting
//!   the expiry instead of stacking
//! - Damage-over-time tick processing on the shared tick clock
//! - Duration tracking and expiry

use bevy::prelude::*;
use std::collections::HashMap;

use super::components::{ActiveStatuses, Character, GameRng, PendingStatus, StatusEffect, StatusKind};
use super::events::{StatusAppliedEvent, StatusClearedEvent};
use super::log::{CombatLog, CombatLogEventType};

/// Replace a same-kind entry or append. Reapplication resets the expiry;
/// duration never stacks.
fn upsert_status(list: &mut ActiveStatuses, status: StatusEffect) {
    if let Some(existing) = list.statuses.iter_mut().find(|s| s.kind == status.kind) {
        *existing = status;
    } else {
        list.statuses.push(status);
    }
}

/// Apply pending statuses to their targets.
///
/// Different kinds coexist on one target (a slow does not cancel a burn);
/// reapplying a kind that is already present replaces it, which resets
/// the expiry without stacking duration. Targets that have no status list
/// yet get one; several pendings for the same fresh target within one
/// tick are batched into a single insert.
pub fn apply_pending_statuses(
    mut commands: Commands,
    mut combat_log: ResMut<CombatLog>,
    mut applied: EventWriter<StatusAppliedEvent>,
    pending: Query<(Entity, &PendingStatus)>,
    mut targets: Query<(&Character, Option<&mut ActiveStatuses>)>,
) {
    // Component inserts are deferred, so first-time status lists are
    // accumulated here and inserted once per target.
    let mut fresh_lists: HashMap<Entity, ActiveStatuses> = HashMap::new();

    for (pending_entity, pending) in pending.iter() {
        commands.entity(pending_entity).despawn();

        let Ok((target_character, statuses)) = targets.get_mut(pending.target) else {
            continue;
        };
        if !target_character.is_alive() {
            continue;
        }

        let status = pending.status.clone();
        combat_log.log(
            CombatLogEventType::StatusApplied,
            format!(
                "{} is {} by {} ({:.1}s)",
                target_character.name,
                status.kind.name().to_lowercase(),
                status.source,
                status.time_remaining
            ),
        );
        applied.send(StatusAppliedEvent {
            target: pending.target,
            kind: status.kind,
            duration: status.time_remaining,
        });

        if let Some(mut statuses) = statuses {
            upsert_status(&mut statuses, status);
        } else {
            upsert_status(fresh_lists.entry(pending.target).or_default(), status);
        }
    }

    for (target, statuses) in fresh_lists {
        commands.entity(target).insert(statuses);
    }
}

/// Process damage-over-time ticks.
///
/// Must run BEFORE `update_statuses` so the final tick fires exactly when
/// the effect expires: a 5s effect with 1s ticks deals damage at
/// t=1,2,3,4,5 - five ticks total.
pub fn process_dot_ticks(
    time: Res<Time>,
    mut combat_log: ResMut<CombatLog>,
    mut afflicted: Query<(&mut Character, &mut ActiveStatuses)>,
    mut bystanders: Query<&mut Character, Without<ActiveStatuses>>,
) {
    let dt = time.delta_secs();

    // Caster attribution, applied once target borrows are released.
    let mut damage_dealt_updates: Vec<(Entity, f32)> = Vec::new();

    for (mut character, mut statuses) in afflicted.iter_mut() {
        if !character.is_alive() {
            continue;
        }

        let mut ticks: Vec<(f32, Option<Entity>, String)> = Vec::new();
        for status in statuses
            .statuses
            .iter_mut()
            .filter(|s| s.kind == StatusKind::DamageOverTime)
        {
            status.time_until_next_tick -= dt;

            // Normal tick, or a final tick squeezed in when the status is
            // about to expire this frame before its timer would fire.
            let normal_tick = status.time_until_next_tick <= 0.0;
            let final_tick = !normal_tick && (status.time_remaining - dt) <= 0.0;

            if normal_tick || final_tick {
                ticks.push((status.magnitude, status.caster, status.source.clone()));
                if normal_tick {
                    status.time_until_next_tick += status.tick_interval;
                }
            }
        }

        for (damage, caster, source) in ticks {
            let actual_damage = super::effects::apply_damage(damage, &mut character);
            combat_log.log(
                CombatLogEventType::Damage,
                format!(
                    "{} ticks on {} for {:.0} damage",
                    source, character.name, actual_damage
                ),
            );
            if let Some(caster) = caster {
                damage_dealt_updates.push((caster, actual_damage));
            }

            if !character.is_alive() && !character.is_dead {
                character.is_dead = true;
                combat_log.log(
                    CombatLogEventType::Death,
                    format!("{} has been eliminated", character.name),
                );
                break;
            }
        }
    }

    for (caster, damage) in damage_dealt_updates {
        if let Ok((mut caster_character, _)) = afflicted.get_mut(caster) {
            caster_character.damage_dealt += damage;
        } else if let Ok(mut caster_character) = bystanders.get_mut(caster) {
            caster_character.damage_dealt += damage;
        }
    }
}

/// Update all active statuses - tick down durations and remove expired
/// ones, announcing each removal so visual overrides can revert.
///
/// Transformed targets also re-roll their wander direction here every
/// second or two, the way a panicked critter changes course.
pub fn update_statuses(
    time: Res<Time>,
    mut commands: Commands,
    mut rng: ResMut<GameRng>,
    mut combat_log: ResMut<CombatLog>,
    mut cleared: EventWriter<StatusClearedEvent>,
    mut targets: Query<(Entity, &Character, &mut ActiveStatuses)>,
) {
    let dt = time.delta_secs();

    for (entity, character, mut statuses) in targets.iter_mut() {
        for status in statuses.statuses.iter_mut() {
            status.time_remaining -= dt;

            if status.kind == StatusKind::Transformed {
                status.wander_timer -= dt;
                if status.wander_timer <= 0.0 {
                    status.wander_direction = rng.random_direction();
                    status.wander_timer = 1.0 + rng.random_f32();
                }
            }
        }

        for status in statuses.statuses.iter().filter(|s| s.time_remaining <= 0.0) {
            combat_log.log(
                CombatLogEventType::StatusRemoved,
                format!(
                    "{} fades from {}",
                    status.kind.name(),
                    character.name
                ),
            );
            cleared.send(StatusClearedEvent {
                target: entity,
                kind: status.kind,
            });
        }

        statuses.statuses.retain(|s| s.time_remaining > 0.0);

        if statuses.statuses.is_empty() {
            commands.entity(entity).remove::<ActiveStatuses>();
        }
    }
}
