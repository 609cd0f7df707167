//! Combat Constants
//!
//! Centralized location for magic numbers used throughout the combat system.
//! This makes it easier to tune balance and ensures consistency.

// ============================================================================
// Projectiles
// ============================================================================

/// Distance at which a projectile is considered to have hit its target.
pub const COLLISION_RADIUS: f32 = 0.5;

/// Projectiles farther than this from their caster's current position are
/// removed regardless of state. Leak prevention, not gameplay.
pub const EFFECT_PRUNE_RANGE: f32 = 50.0;

// ============================================================================
// Channeling
// ============================================================================

/// Seconds between mana restoration ticks while channeling.
pub const CHANNEL_MANA_TICK_INTERVAL: f32 = 1.0;

/// Each channel tick restores `max_mana / CHANNEL_MANA_FRACTION`.
pub const CHANNEL_MANA_FRACTION: f32 = 8.0;

// ============================================================================
// Status Effects
// ============================================================================

/// Movement speed multiplier while slowed.
pub const SLOW_VELOCITY_FACTOR: f32 = 0.3;

/// Seconds between damage applications for damage-over-time effects.
pub const DOT_TICK_INTERVAL: f32 = 1.0;

/// Transformed targets wander at this fraction of their normal speed
/// (sheep waddle slowly).
pub const TRANSFORM_WANDER_FACTOR: f32 = 0.2;

// ============================================================================
// Movement
// ============================================================================

/// A caster counts as facing its target within this half-angle cone.
pub const FACING_CONE: f32 = std::f32::consts::PI / 6.0; // 30 degrees

/// Seconds between random direction changes for wandering dummies.
pub const WANDER_REDIRECT_INTERVAL: f32 = 2.0;

/// Wandering dummy movement speed in units per second.
pub const WANDER_SPEED: f32 = 2.0;

/// Player character movement speed in units per second.
pub const BASE_MOVE_SPEED: f32 = 6.0;

// ============================================================================
// Cosmetic Effects
// ============================================================================

/// Nova ring scale growth per second.
pub const RING_GROWTH_RATE: f32 = 2.0;

/// Nova rings self-destruct once their scale passes this threshold.
pub const RING_MAX_SCALE: f32 = 3.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_constants_are_positive() {
        assert!(COLLISION_RADIUS > 0.0);
        assert!(EFFECT_PRUNE_RANGE > COLLISION_RADIUS);
    }

    #[test]
    fn test_slow_factor_is_a_reduction() {
        assert!(SLOW_VELOCITY_FACTOR > 0.0 && SLOW_VELOCITY_FACTOR < 1.0);
    }

    #[test]
    fn test_channel_tick_interval_is_positive() {
        assert!(CHANNEL_MANA_TICK_INTERVAL > 0.0);
        assert!(CHANNEL_MANA_FRACTION > 0.0);
    }

    #[test]
    fn test_ring_grows_toward_threshold() {
        assert!(RING_GROWTH_RATE > 0.0);
        assert!(RING_MAX_SCALE > 1.0);
    }
}
