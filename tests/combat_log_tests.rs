//! Integration tests for combat logging
//!
//! Verifies that the simulation records a coherent, timestamped account
//! of casts, damage, statuses and interruptions.

use bevy::prelude::*;
use regex::Regex;
use std::time::Duration;

use mageduel::combat::abilities::AbilityType;
use mageduel::combat::ability_config::AbilityDefinitions;
use mageduel::combat::components::{Character, CurrentTarget, GameRng, MovementIntent};
use mageduel::combat::events::CastRequest;
use mageduel::combat::log::{CombatLog, CombatLogEventType};
use mageduel::combat::CombatPlugin;

fn test_app() -> App {
    let mut app = App::new();
    app.insert_resource(Time::<()>::default());
    app.insert_resource(GameRng::from_seed(42));
    app.insert_resource(AbilityDefinitions::default());
    app.add_plugins(CombatPlugin);
    app
}

fn tick(app: &mut App, seconds: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(seconds));
    app.update();
}

fn spawn_duel(app: &mut App) -> Entity {
    let caster = app
        .world_mut()
        .spawn((
            Character::new(
                "Mage",
                vec![AbilityType::FrostNova, AbilityType::Fireball],
            ),
            MovementIntent::default(),
            Transform::from_xyz(0.0, 1.0, 0.0),
        ))
        .id();
    let dummy = app
        .world_mut()
        .spawn((
            Character::new("Target Dummy", vec![]),
            Transform::from_xyz(5.0, 1.0, 0.0),
        ))
        .id();
    app.world_mut().resource_mut::<CurrentTarget>().0 = Some(dummy);
    caster
}

#[test]
fn test_instant_cast_leaves_a_full_trail() {
    let mut app = test_app();
    let caster = spawn_duel(&mut app);

    app.world_mut().send_event(CastRequest {
        caster,
        ability: AbilityType::FrostNova,
    });
    tick(&mut app, 0.01);

    let log = app.world().resource::<CombatLog>();
    let used = log.filter_by_type(CombatLogEventType::AbilityUsed);
    assert!(used.iter().any(|e| e.message == "Mage casts Frost Nova"));

    let damage = log.filter_by_type(CombatLogEventType::Damage);
    assert!(damage
        .iter()
        .any(|e| e.message.contains("Frost Nova hits Target Dummy for 3 damage")));

    let statuses = log.filter_by_type(CombatLogEventType::StatusApplied);
    assert!(statuses
        .iter()
        .any(|e| e.message.contains("Target Dummy is frozen by Frost Nova")));
}

#[test]
fn test_interruption_is_logged() {
    let mut app = test_app();
    let caster = spawn_duel(&mut app);

    app.world_mut().send_event(CastRequest {
        caster,
        ability: AbilityType::Fireball,
    });
    tick(&mut app, 0.0);
    tick(&mut app, 0.5);

    app.world_mut()
        .get_mut::<MovementIntent>(caster)
        .unwrap()
        .direction = Vec3::X;
    tick(&mut app, 0.01);

    let log = app.world().resource::<CombatLog>();
    let interrupted = log.filter_by_type(CombatLogEventType::CastInterrupted);
    assert_eq!(interrupted.len(), 1);
    assert!(interrupted[0].message.contains("Fireball canceled by movement"));
}

#[test]
fn test_entries_are_timestamped_in_order() {
    let mut app = test_app();
    let caster = spawn_duel(&mut app);

    app.world_mut().send_event(CastRequest {
        caster,
        ability: AbilityType::FrostNova,
    });
    tick(&mut app, 0.5);
    tick(&mut app, 1.0);
    app.world_mut().send_event(CastRequest {
        caster,
        ability: AbilityType::FrostNova,
    });
    tick(&mut app, 0.5);

    let log = app.world().resource::<CombatLog>();
    assert!((log.match_time - 2.0).abs() < 1e-4, "clock follows the tick time");
    assert!(!log.entries.is_empty());
    for pair in log.entries.windows(2) {
        assert!(
            pair[0].timestamp <= pair[1].timestamp,
            "log is chronological"
        );
    }
    // The refused second cast carries a later timestamp than the first.
    let failed = log.filter_by_type(CombatLogEventType::CastFailed);
    assert_eq!(failed.len(), 1);
    assert!(failed[0].timestamp > log.entries[0].timestamp);
}

#[test]
fn test_text_rendering_format() {
    let mut app = test_app();
    let caster = spawn_duel(&mut app);

    app.world_mut().send_event(CastRequest {
        caster,
        ability: AbilityType::FrostNova,
    });
    tick(&mut app, 0.01);

    let log = app.world().resource::<CombatLog>();
    let text = log.to_text();
    assert!(!text.is_empty());

    let line_format = Regex::new(r"^\[\s*\d+\.\d{2}\] \[\w+\] .+$").unwrap();
    for line in text.lines() {
        assert!(line_format.is_match(line), "malformed log line: {}", line);
    }
}

#[test]
fn test_recent_caps_the_entry_count() {
    let mut log = CombatLog::default();
    for i in 0..10 {
        log.log(CombatLogEventType::MatchEvent, format!("event {}", i));
    }
    assert_eq!(log.recent(3).len(), 3);
    assert_eq!(log.recent(3)[2].message, "event 9");
}
