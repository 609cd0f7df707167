//! Movement Systems
//!
//! The movement collaborator: applies player intent and dummy wandering,
//! reading status effects for their velocity overrides. Movement never
//! writes combat state - cast cancellation on movement is handled by the
//! casting module before any cast can complete.

use bevy::prelude::*;

use super::components::{
    ActiveStatuses, CastingState, Character, GameRng, MovementIntent, StatusKind, Wanderer,
};
use super::constants::{TRANSFORM_WANDER_FACTOR, WANDER_REDIRECT_INTERVAL, WANDER_SPEED};

/// Re-roll wandering dummy velocities at a fixed interval.
pub fn retarget_wanderers(
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    mut wanderers: Query<&mut Wanderer>,
) {
    let dt = time.delta_secs();
    for mut wanderer in wanderers.iter_mut() {
        wanderer.redirect_timer -= dt;
        if wanderer.redirect_timer <= 0.0 {
            wanderer.velocity = rng.random_direction() * WANDER_SPEED;
            wanderer.redirect_timer = WANDER_REDIRECT_INTERVAL;
        }
    }
}

/// Move every character according to intent or wander velocity, with
/// status overrides applied:
/// - Frozen: no movement at all
/// - Transformed: slow wander in the status' direction, ignoring intent
/// - Slowed: velocity multiplied by the slow factor
///
/// Characters keep facing their direction of travel.
pub fn apply_movement(
    time: Res<Time>,
    mut movers: Query<(
        &Character,
        &mut Transform,
        Option<&MovementIntent>,
        Option<&Wanderer>,
        Option<&ActiveStatuses>,
        Option<&CastingState>,
    )>,
) {
    let dt = time.delta_secs();

    for (character, mut transform, intent, wanderer, statuses, casting) in movers.iter_mut() {
        if !character.is_alive() {
            continue;
        }

        // Zero-velocity override wins over everything.
        if statuses.is_some_and(|s| s.has(StatusKind::Frozen)) {
            continue;
        }

        // Transformed targets ignore their own will and waddle.
        if let Some(transformed) = statuses.and_then(|s| s.get(StatusKind::Transformed)) {
            let direction = transformed.wander_direction.normalize_or_zero();
            if direction != Vec3::ZERO {
                let step = character.base_speed * TRANSFORM_WANDER_FACTOR * dt;
                transform.translation += direction * step;
                transform.look_to(direction, Vec3::Y);
            }
            continue;
        }

        // A cast in progress means the character is standing still; any
        // real movement intent already canceled it earlier this tick.
        if casting.is_some() {
            continue;
        }

        let velocity = if let Some(intent) = intent.filter(|i| i.is_moving()) {
            intent.direction.normalize_or_zero() * character.base_speed
        } else if let Some(wanderer) = wanderer {
            wanderer.velocity
        } else {
            continue;
        };

        let mut speed_factor = 1.0;
        if let Some(slow) = statuses.and_then(|s| s.get(StatusKind::Slowed)) {
            speed_factor *= slow.magnitude;
        }

        let step = velocity * speed_factor * dt;
        if step.length_squared() > 0.0 {
            transform.translation += step;
            let direction = step.normalize_or_zero();
            if direction != Vec3::ZERO {
                transform.look_to(direction, Vec3::Y);
            }
        }
    }
}
