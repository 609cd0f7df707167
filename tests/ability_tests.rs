//! Unit tests for ability definitions
//!
//! These tests verify that:
//! - All abilities load from the RON registry with valid stat values
//! - Timing invariants hold (channels have cast times, instants don't)
//! - Effect payloads are sane (positive speeds, bounded slow factors)

use mageduel::combat::abilities::AbilityType;
use mageduel::combat::ability_config::{AbilityDefinitions, AbilityEffect};

/// Get all ability types for exhaustive testing
fn all_abilities() -> Vec<AbilityType> {
    vec![
        AbilityType::Fireball,
        AbilityType::FrostBolt,
        AbilityType::FrostNova,
        AbilityType::Innovation,
        AbilityType::Sheep,
    ]
}

/// Helper to load ability definitions for tests
fn load_abilities() -> AbilityDefinitions {
    AbilityDefinitions::default()
}

#[test]
fn test_registry_passes_validation() {
    let abilities = load_abilities();
    assert!(abilities.validate().is_ok());
}

#[test]
fn test_all_abilities_have_names() {
    let abilities = load_abilities();
    for ability in all_abilities() {
        let def = abilities.get_unchecked(&ability);
        assert!(!def.name.is_empty(), "{:?} should have a name", ability);
    }
}

#[test]
fn test_all_abilities_have_non_negative_numbers() {
    let abilities = load_abilities();
    for ability in all_abilities() {
        let def = abilities.get_unchecked(&ability);
        assert!(
            def.cast_time >= 0.0,
            "{:?} should have non-negative cast time, got {}",
            ability,
            def.cast_time
        );
        assert!(
            def.mana_cost >= 0.0,
            "{:?} should have non-negative mana cost, got {}",
            ability,
            def.mana_cost
        );
        assert!(
            def.cooldown >= 0.0,
            "{:?} should have non-negative cooldown, got {}",
            ability,
            def.cooldown
        );
        assert!(
            def.range >= 0.0,
            "{:?} should have non-negative range, got {}",
            ability,
            def.range
        );
    }
}

#[test]
fn test_channels_have_cast_time() {
    let abilities = load_abilities();
    for ability in all_abilities() {
        let def = abilities.get_unchecked(&ability);
        if def.channel {
            assert!(
                def.cast_time > 0.0,
                "{:?} is a channel and must have a cast time",
                ability
            );
        }
    }
}

#[test]
fn test_innovation_is_the_only_channel() {
    let abilities = load_abilities();
    for ability in all_abilities() {
        let def = abilities.get_unchecked(&ability);
        assert_eq!(
            def.channel,
            ability == AbilityType::Innovation,
            "{:?} channel flag is wrong",
            ability
        );
    }
    let innovation = abilities.get_unchecked(&AbilityType::Innovation);
    assert!(matches!(&innovation.effect, AbilityEffect::RestoreMana));
    assert_eq!(innovation.mana_cost, 0.0, "the mana channel costs nothing");
}

#[test]
fn test_bolt_abilities_have_positive_speed() {
    let abilities = load_abilities();
    for ability in [AbilityType::Fireball, AbilityType::FrostBolt] {
        let def = abilities.get_unchecked(&ability);
        match &def.effect {
            AbilityEffect::Bolt { speed, damage, .. } => {
                assert!(*speed > 0.0, "{:?} should have positive speed", ability);
                assert!(*damage > 0.0, "{:?} should have positive damage", ability);
            }
            other => panic!("{:?} should be a Bolt, got {:?}", ability, other),
        }
    }
}

#[test]
fn test_bolts_require_facing() {
    let abilities = load_abilities();
    for ability in [AbilityType::Fireball, AbilityType::FrostBolt] {
        let def = abilities.get_unchecked(&ability);
        assert!(
            def.requires_facing,
            "{:?} is offensive and must be facing-checked by the caller",
            ability
        );
    }
}

#[test]
fn test_fireball_burn_payload() {
    let abilities = load_abilities();
    let def = abilities.get_unchecked(&AbilityType::Fireball);
    let AbilityEffect::Bolt { dot, .. } = &def.effect else {
        panic!("Fireball should be a Bolt");
    };
    let dot = dot.as_ref().expect("Fireball should burn over time");
    assert!(dot.damage > 0.0);
    assert!(dot.duration > 0.0);
}

#[test]
fn test_frost_bolt_slow_payload() {
    let abilities = load_abilities();
    let def = abilities.get_unchecked(&AbilityType::FrostBolt);
    let AbilityEffect::Bolt { slow, .. } = &def.effect else {
        panic!("Frost Bolt should be a Bolt");
    };
    let slow = slow.as_ref().expect("Frost Bolt should slow");
    assert!(
        slow.factor > 0.0 && slow.factor < 1.0,
        "slow factor must reduce speed, got {}",
        slow.factor
    );
    assert!(slow.duration > 0.0);
}

#[test]
fn test_freeze_pulse_is_instant() {
    let abilities = load_abilities();
    let def = abilities.get_unchecked(&AbilityType::FrostNova);
    assert!(def.is_instant(), "the freeze pulse resolves at cast time");
    match &def.effect {
        AbilityEffect::FreezePulse { radius, freeze_duration, .. } => {
            assert!(*radius > 0.0);
            assert!(*freeze_duration > 0.0);
        }
        other => panic!("Frost Nova should be a FreezePulse, got {:?}", other),
    }
}

#[test]
fn test_sheep_transform_duration() {
    let abilities = load_abilities();
    let def = abilities.get_unchecked(&AbilityType::Sheep);
    match &def.effect {
        AbilityEffect::Transform { duration } => assert!(*duration > 0.0),
        other => panic!("Sheep should be a Transform, got {:?}", other),
    }
}
