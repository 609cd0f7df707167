//! Headless scenario execution
//!
//! Runs scripted combat scenarios without any graphical output. The
//! script driver plays the role of the input collaborator: it resolves
//! scripted key presses to abilities, applies the targeting and facing
//! checks an interactive client would, and forwards the rest to the
//! combat core as cast requests.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;

use crate::combat::ability_config::{AbilityConfigPlugin, AbilityDefinitions};
use crate::combat::casting::validate_targeting;
use crate::combat::components::{Character, CurrentTarget, GameRng, MovementIntent, Wanderer};
use crate::combat::events::CastRequest;
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::combat::systems::CombatSystemPhase;
use crate::combat::CombatPlugin;

use super::config::{ActionKind, ScenarioConfig};

/// Marker for the scripted caster entity.
#[derive(Component)]
pub struct ScriptedCaster;

/// Marker for the wandering practice target.
#[derive(Component)]
pub struct PracticeTarget;

/// Resource tracking scenario playback state.
#[derive(Resource)]
pub struct ScenarioState {
    config: ScenarioConfig,
    /// Elapsed simulation time in seconds
    pub elapsed: f32,
    /// Index of the next unfired script entry
    next_action: usize,
    /// Simulation time at which held movement ends
    move_until: f32,
    /// Whether the scenario has finished
    pub complete: bool,
}

/// Plugin for scripted scenario execution
pub struct ScenarioPlugin {
    pub config: ScenarioConfig,
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        let mut config = self.config.clone();
        // Fire order is script order; make it time order.
        config
            .script
            .sort_by(|a, b| a.at.partial_cmp(&b.at).unwrap_or(std::cmp::Ordering::Equal));

        app.insert_resource(ScenarioState {
            config,
            elapsed: 0.0,
            next_action: 0,
            move_until: 0.0,
            complete: false,
        })
        .add_systems(Startup, setup_scenario)
        .add_systems(
            Update,
            drive_script.before(CombatSystemPhase::Upkeep),
        )
        .add_systems(
            Update,
            check_scenario_end.after(CombatSystemPhase::Movement),
        )
        .add_systems(PostUpdate, exit_on_complete);
    }
}

/// Spawn the caster and (optionally) the practice target.
fn setup_scenario(
    mut commands: Commands,
    state: Res<ScenarioState>,
    mut combat_log: ResMut<CombatLog>,
) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::MatchEvent,
        "Scenario started".to_string(),
    );

    let dummy_position = Vec3::new(5.0, 1.0, 0.0);

    let mut caster_transform = Transform::from_xyz(0.0, 1.0, 0.0);
    if state.config.spawn_dummy {
        caster_transform.look_at(dummy_position, Vec3::Y);
    }
    commands.spawn((
        Character::new("Mage", state.config.abilities.clone()),
        MovementIntent::default(),
        caster_transform,
        ScriptedCaster,
    ));

    if state.config.spawn_dummy {
        commands.spawn((
            Character::new("Target Dummy", vec![]),
            Wanderer::default(),
            Transform::from_translation(dummy_position),
            PracticeTarget,
        ));
    }

    info!(
        "Scenario setup complete: {} scripted actions over {:.0}s",
        state.config.script.len(),
        state.config.duration_secs
    );
}

/// Advance scenario time and fire due script entries.
///
/// Runs before the combat phases so a request fired at time T is
/// processed within the same tick.
fn drive_script(
    time: Res<Time>,
    mut state: ResMut<ScenarioState>,
    mut current_target: ResMut<CurrentTarget>,
    defs: Res<AbilityDefinitions>,
    mut combat_log: ResMut<CombatLog>,
    mut cast_requests: EventWriter<CastRequest>,
    mut casters: Query<(Entity, &Transform, &mut MovementIntent), With<ScriptedCaster>>,
    dummies: Query<(Entity, &Transform), With<PracticeTarget>>,
) {
    if state.complete {
        return;
    }
    state.elapsed += time.delta_secs();

    let Ok((caster_entity, caster_transform, mut intent)) = casters.get_single_mut() else {
        return;
    };

    // Release held movement once its duration is up.
    if intent.is_moving() && state.elapsed >= state.move_until {
        intent.direction = Vec3::ZERO;
    }

    while state.next_action < state.config.script.len()
        && state.config.script[state.next_action].at <= state.elapsed
    {
        let entry = state.config.script[state.next_action].clone();
        state.next_action += 1;

        match entry.action {
            ActionKind::SelectTarget => {
                if let Ok((dummy_entity, _)) = dummies.get_single() {
                    current_target.0 = Some(dummy_entity);
                    info!("Target selected");
                } else {
                    warn!("Script selects a target but no practice target exists");
                }
            }
            ActionKind::ClearTarget => {
                current_target.0 = None;
            }
            ActionKind::Move { x, z, duration } => {
                intent.direction = Vec3::new(x, 0.0, z);
                state.move_until = entry.at + duration;
            }
            ActionKind::Cast(ability) => {
                let def = defs.get_unchecked(&ability);
                let target_transform = current_target
                    .0
                    .and_then(|t| dummies.get(t).ok())
                    .map(|(_, transform)| transform);

                // The targeting preconditions belong to the input layer;
                // the state machine only sees requests that passed them.
                match validate_targeting(def, caster_transform, target_transform) {
                    Ok(()) => {
                        cast_requests.send(CastRequest {
                            caster: caster_entity,
                            ability,
                        });
                    }
                    Err(error) => {
                        warn!("{}: {}", def.name, error);
                        combat_log.log(
                            CombatLogEventType::CastFailed,
                            format!("{} refused: {}", def.name, error),
                        );
                    }
                }
            }
        }
    }
}

/// Finish the scenario once its duration has elapsed: report the outcome
/// and save or print the combat log.
fn check_scenario_end(
    mut state: ResMut<ScenarioState>,
    combat_log: Res<CombatLog>,
    characters: Query<&Character>,
) {
    if state.complete || state.elapsed < state.config.duration_secs {
        return;
    }
    state.complete = true;

    for character in characters.iter() {
        println!(
            "{}: {:.0}/{:.0} hp, {:.0}/{:.0} mana, dealt {:.0}, taken {:.0}",
            character.name,
            character.current_health,
            character.max_health,
            character.current_mana,
            character.max_mana,
            character.damage_dealt,
            character.damage_taken
        );
    }

    match &state.config.output_path {
        Some(path) => match std::fs::write(path, combat_log.to_text()) {
            Ok(()) => println!("Scenario complete. Log saved to: {}", path),
            Err(e) => eprintln!("Failed to save combat log: {}", e),
        },
        None => {
            println!("--- combat log ---");
            print!("{}", combat_log.to_text());
        }
    }
}

/// Exit the app when the scenario is complete
fn exit_on_complete(state: Res<ScenarioState>, mut exit: EventWriter<AppExit>) {
    if state.complete {
        exit.send(AppExit::Success);
    }
}

/// Run a scripted scenario to completion.
pub fn run_scenario(config: ScenarioConfig) -> Result<(), String> {
    config.validate()?;

    println!("Starting headless scenario...");
    println!("  Abilities: {:?}", config.abilities);
    println!("  Duration: {:.0}s", config.duration_secs);

    let mut app = App::new();
    app
        // Minimal plugins - no window, no rendering
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(TransformPlugin)
        .add_plugins(HierarchyPlugin);

    // A seeded RNG makes the run reproducible; CombatPlugin only fills
    // this in when absent.
    match config.random_seed {
        Some(seed) => {
            println!("  Seed: {}", seed);
            app.insert_resource(GameRng::from_seed(seed));
        }
        None => {
            app.insert_resource(GameRng::from_entropy());
        }
    }

    app.add_plugins(AbilityConfigPlugin)
        .add_plugins(CombatPlugin)
        .add_plugins(ScenarioPlugin { config })
        .run();

    Ok(())
}
