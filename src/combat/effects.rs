//! Active Effect Tracker
//!
//! Handles everything an ability leaves behind in the world:
//! - Effect invocation (projectile launch, freeze pulse, transform,
//!   mana restoration)
//! - Per-tick projectile homing and integration
//! - Collision resolution against targets
//! - The cosmetic expanding nova ring
//! - Range pruning so stray projectiles never accumulate

use bevy::prelude::*;

use super::ability_config::{AbilityConfig, AbilityEffect, AbilityDefinitions};
use super::abilities::AbilityType;
use super::components::{
    Character, GameRng, NovaRing, PendingDamage, PendingStatus, Projectile, StatusEffect,
};
use super::constants::{COLLISION_RADIUS, EFFECT_PRUNE_RANGE, RING_GROWTH_RATE, RING_MAX_SCALE};
use super::events::{ProjectileRemovalReason, ProjectileRemovedEvent, ProjectileSpawnedEvent};
use super::log::{CombatLog, CombatLogEventType};
use super::utils::forward_vector;

/// Apply damage to a character. Returns the damage actually applied to
/// health (capped by remaining health).
///
/// # Panics (debug only)
/// Panics if damage is negative (damage should always be >= 0).
pub fn apply_damage(damage: f32, target: &mut Character) -> f32 {
    debug_assert!(
        damage >= 0.0,
        "apply_damage: damage cannot be negative, got {}",
        damage
    );
    debug_assert!(
        target.current_health >= 0.0,
        "apply_damage: target health already negative ({})",
        target.current_health
    );

    let actual_damage = damage.min(target.current_health);
    target.current_health = (target.current_health - damage).max(0.0);
    target.damage_taken += actual_damage;
    actual_damage
}

/// Resolve an ability's effect at invocation time (instant resolution or
/// cast/channel completion).
///
/// Targets are never mutated here: damage and statuses are queued as
/// pending entities and applied later in the same tick, after the
/// command flush.
#[allow(clippy::too_many_arguments)]
pub fn invoke_effect(
    commands: &mut Commands,
    rng: &mut GameRng,
    combat_log: &mut CombatLog,
    projectile_spawned: &mut EventWriter<ProjectileSpawnedEvent>,
    caster: Entity,
    caster_character: &mut Character,
    caster_transform: &Transform,
    target: Option<Entity>,
    target_pos: Option<Vec3>,
    ability: AbilityType,
    def: &AbilityConfig,
) {
    match &def.effect {
        AbilityEffect::Bolt { damage, speed, dot, slow } => {
            // Launch along the caster's facing; homing corrects the course
            // toward the captured target every tick after that.
            let velocity = forward_vector(caster_transform) * *speed;
            let projectile = commands
                .spawn((
                    Projectile {
                        caster,
                        ability,
                        homing_target: target,
                        velocity,
                        speed: *speed,
                        damage: *damage,
                        dot: dot.clone(),
                        slow: slow.clone(),
                    },
                    Transform::from_translation(caster_transform.translation),
                ))
                .id();
            projectile_spawned.send(ProjectileSpawnedEvent {
                projectile,
                caster,
                ability,
            });
        }
        AbilityEffect::FreezePulse { damage, radius, freeze_duration } => {
            // The ring is visual-only and always appears.
            commands.spawn((
                NovaRing { scale: 1.0 },
                Transform::from_translation(caster_transform.translation),
            ));

            let Some(target_entity) = target else {
                return;
            };
            let Some(target_pos) = target_pos else {
                return;
            };
            if caster_transform.translation.distance(target_pos) > *radius {
                combat_log.log(
                    CombatLogEventType::MatchEvent,
                    format!("{}'s {} finds nothing in range", caster_character.name, def.name),
                );
                return;
            }

            if *damage > 0.0 {
                commands.spawn(PendingDamage {
                    target: target_entity,
                    amount: *damage,
                    caster: Some(caster),
                    source: def.name.clone(),
                });
            }
            commands.spawn(PendingStatus {
                target: target_entity,
                status: StatusEffect::frozen(*freeze_duration, Some(caster), &def.name),
            });
        }
        AbilityEffect::Transform { duration } => {
            let Some(target_entity) = target else {
                combat_log.log(
                    CombatLogEventType::MatchEvent,
                    format!("{}'s {} fizzles with no target", caster_character.name, def.name),
                );
                return;
            };
            commands.spawn(PendingStatus {
                target: target_entity,
                status: StatusEffect::transformed(
                    *duration,
                    rng.random_direction(),
                    Some(caster),
                    &def.name,
                ),
            });
        }
        AbilityEffect::RestoreMana => {
            caster_character.current_mana = caster_character.max_mana;
            combat_log.log(
                CombatLogEventType::ManaGain,
                format!("{}'s mana fully restored by {}", caster_character.name, def.name),
            );
        }
    }
}

/// Apply queued direct damage from instant effects.
pub fn apply_pending_damage(
    mut commands: Commands,
    mut combat_log: ResMut<CombatLog>,
    pending: Query<(Entity, &PendingDamage)>,
    mut characters: Query<&mut Character>,
) {
    for (pending_entity, damage) in pending.iter() {
        commands.entity(pending_entity).despawn();

        let Ok(mut target) = characters.get_mut(damage.target) else {
            continue;
        };
        if !target.is_alive() {
            continue;
        }

        let actual_damage = apply_damage(damage.amount, &mut target);
        let target_name = target.name.clone();
        combat_log.log(
            CombatLogEventType::Damage,
            format!("{} hits {} for {:.0} damage", damage.source, target_name, actual_damage),
        );

        if !target.is_alive() && !target.is_dead {
            target.is_dead = true;
            combat_log.log(
                CombatLogEventType::Death,
                format!("{} has been eliminated", target_name),
            );
        }

        if let Some(caster) = damage.caster {
            if let Ok(mut caster_character) = characters.get_mut(caster) {
                caster_character.damage_dealt += actual_damage;
            }
        }
    }
}

/// Steer and advance projectiles.
///
/// Homing projectiles recompute their velocity toward the target's
/// current position each tick. If the target entity is gone, the last
/// computed velocity is kept and the projectile continues in a straight
/// line until it is pruned - a despawned target is "gone", not an error.
pub fn move_projectiles(
    time: Res<Time>,
    mut projectiles: Query<(&mut Projectile, &mut Transform)>,
    targets: Query<&Transform, (With<Character>, Without<Projectile>)>,
) {
    let dt = time.delta_secs();

    for (mut projectile, mut transform) in projectiles.iter_mut() {
        if let Some(target) = projectile.homing_target {
            if let Ok(target_transform) = targets.get(target) {
                let direction =
                    (target_transform.translation - transform.translation).normalize_or_zero();
                if direction != Vec3::ZERO {
                    projectile.velocity = direction * projectile.speed;
                }
            }
        }
        let velocity = projectile.velocity;
        transform.translation += velocity * dt;
    }
}

/// Check projectiles against their targets and resolve impacts.
///
/// Only projectiles with a live target reference participate; a hit
/// applies the direct damage immediately and queues any secondary status
/// (slow, damage-over-time) on the target. The damage-over-time schedule
/// lives on the target, so it keeps ticking after the projectile is gone.
pub fn process_projectile_hits(
    mut commands: Commands,
    defs: Res<AbilityDefinitions>,
    mut combat_log: ResMut<CombatLog>,
    mut removed: EventWriter<ProjectileRemovedEvent>,
    projectiles: Query<(Entity, &Projectile, &Transform)>,
    mut targets: Query<(&Transform, &mut Character), Without<Projectile>>,
) {
    // Collect caster attribution to apply after target borrows are done.
    let mut damage_dealt_updates: Vec<(Entity, f32)> = Vec::new();

    for (projectile_entity, projectile, projectile_transform) in projectiles.iter() {
        let Some(target_entity) = projectile.homing_target else {
            continue;
        };
        let Ok((target_transform, mut target)) = targets.get_mut(target_entity) else {
            // Target entity despawned: the projectile flies on until the
            // range prune collects it.
            continue;
        };

        if !target.is_alive() {
            commands.entity(projectile_entity).despawn();
            removed.send(ProjectileRemovedEvent {
                projectile: projectile_entity,
                reason: ProjectileRemovalReason::TargetDied,
            });
            continue;
        }

        let distance = projectile_transform
            .translation
            .distance(target_transform.translation);
        if distance >= COLLISION_RADIUS {
            continue;
        }

        // Impact.
        let def = defs.get_unchecked(&projectile.ability);
        let actual_damage = apply_damage(projectile.damage, &mut target);
        let target_name = target.name.clone();
        combat_log.log(
            CombatLogEventType::Damage,
            format!("{} hits {} for {:.0} damage", def.name, target_name, actual_damage),
        );
        damage_dealt_updates.push((projectile.caster, actual_damage));

        if !target.is_alive() && !target.is_dead {
            target.is_dead = true;
            combat_log.log(
                CombatLogEventType::Death,
                format!("{} has been eliminated", target_name),
            );
        }

        if let Some(dot) = &projectile.dot {
            commands.spawn(PendingStatus {
                target: target_entity,
                status: StatusEffect::damage_over_time(
                    dot.damage,
                    dot.duration,
                    Some(projectile.caster),
                    &def.name,
                ),
            });
        }
        if let Some(slow) = &projectile.slow {
            commands.spawn(PendingStatus {
                target: target_entity,
                status: StatusEffect::slowed(
                    slow.factor,
                    slow.duration,
                    Some(projectile.caster),
                    &def.name,
                ),
            });
        }

        commands.entity(projectile_entity).despawn();
        removed.send(ProjectileRemovedEvent {
            projectile: projectile_entity,
            reason: ProjectileRemovalReason::Impact,
        });
    }

    for (caster, damage) in damage_dealt_updates {
        if let Ok((_, mut caster_character)) = targets.get_mut(caster) {
            caster_character.damage_dealt += damage;
        }
    }
}

/// Grow nova rings and remove them past the scale threshold.
pub fn animate_nova_rings(
    time: Res<Time>,
    mut commands: Commands,
    mut rings: Query<(Entity, &mut NovaRing, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut ring, mut transform) in rings.iter_mut() {
        ring.scale += RING_GROWTH_RATE * dt;
        transform.scale = Vec3::splat(ring.scale);
        if ring.scale > RING_MAX_SCALE {
            commands.entity(entity).despawn();
        }
    }
}

/// Remove projectiles that strayed too far from their caster's current
/// position. Leak prevention, not gameplay: a homing projectile whose
/// target vanished would otherwise fly forever.
pub fn prune_far_effects(
    mut commands: Commands,
    mut removed: EventWriter<ProjectileRemovedEvent>,
    projectiles: Query<(Entity, &Projectile, &Transform)>,
    casters: Query<&Transform, (With<Character>, Without<Projectile>)>,
) {
    for (projectile_entity, projectile, projectile_transform) in projectiles.iter() {
        let out_of_range = match casters.get(projectile.caster) {
            Ok(caster_transform) => {
                projectile_transform
                    .translation
                    .distance(caster_transform.translation)
                    > EFFECT_PRUNE_RANGE
            }
            // Caster gone: nothing to measure from, collect immediately.
            Err(_) => true,
        };

        if out_of_range {
            commands.entity(projectile_entity).despawn();
            removed.send(ProjectileRemovedEvent {
                projectile: projectile_entity,
                reason: ProjectileRemovalReason::OutOfRange,
            });
        }
    }
}
