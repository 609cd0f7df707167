//! JSON configuration parsing for scripted scenarios
//!
//! A scenario is the input collaborator in file form: a timed script of
//! target selections, casts and movement against a wandering practice
//! target, suitable for automated testing and replay.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::combat::abilities::AbilityType;

/// One timed entry in a scenario script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedAction {
    /// Simulation time in seconds at which the action fires
    pub at: f32,
    pub action: ActionKind,
}

/// What a scripted entry does when it fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActionKind {
    /// Press the key bound to an ability
    Cast(AbilityType),
    /// Hold a movement direction for the given number of seconds
    Move { x: f32, z: f32, duration: f32 },
    /// Select the practice target
    SelectTarget,
    /// Drop the current target
    ClearTarget,
}

/// Scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Abilities granted to the scripted caster
    #[serde(default = "default_kit")]
    pub abilities: Vec<AbilityType>,
    /// Timed script of player actions
    pub script: Vec<ScriptedAction>,
    /// Total simulation duration in seconds
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    /// Random seed for deterministic replays
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the combat log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Whether to spawn the wandering practice target
    #[serde(default = "default_true")]
    pub spawn_dummy: bool,
}

fn default_kit() -> Vec<AbilityType> {
    vec![
        AbilityType::Fireball,
        AbilityType::FrostBolt,
        AbilityType::FrostNova,
        AbilityType::Innovation,
        AbilityType::Sheep,
    ]
}

fn default_duration() -> f32 {
    30.0
}

fn default_true() -> bool {
    true
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario file: {}", e))?;

        let config: ScenarioConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.duration_secs <= 0.0 {
            return Err("duration_secs must be positive".to_string());
        }
        if self.abilities.is_empty() {
            return Err("the caster needs at least one ability".to_string());
        }
        for (index, entry) in self.script.iter().enumerate() {
            if entry.at < 0.0 {
                return Err(format!("script[{}]: negative fire time", index));
            }
            if entry.at > self.duration_secs {
                return Err(format!(
                    "script[{}]: fires at {:.1}s, after the scenario ends",
                    index, entry.at
                ));
            }
            if let ActionKind::Move { duration, .. } = entry.action {
                if duration <= 0.0 {
                    return Err(format!("script[{}]: movement duration must be positive", index));
                }
            }
        }
        Ok(())
    }

    /// The built-in demo duel: one of everything against the practice
    /// target, including a movement-canceled channel.
    pub fn demo() -> Self {
        Self {
            abilities: default_kit(),
            script: vec![
                ScriptedAction { at: 0.2, action: ActionKind::SelectTarget },
                ScriptedAction { at: 0.5, action: ActionKind::Cast(AbilityType::FrostBolt) },
                ScriptedAction { at: 3.0, action: ActionKind::Cast(AbilityType::Fireball) },
                ScriptedAction { at: 6.0, action: ActionKind::Cast(AbilityType::FrostNova) },
                ScriptedAction { at: 7.0, action: ActionKind::Cast(AbilityType::Innovation) },
                // Moving mid-channel cancels it
                ScriptedAction {
                    at: 9.0,
                    action: ActionKind::Move { x: 0.0, z: -1.0, duration: 0.5 },
                },
                ScriptedAction { at: 10.5, action: ActionKind::Cast(AbilityType::Sheep) },
            ],
            duration_secs: 20.0,
            random_seed: None,
            output_path: None,
            spawn_dummy: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scenario_is_valid() {
        assert!(ScenarioConfig::demo().validate().is_ok());
    }

    #[test]
    fn test_rejects_nonpositive_duration() {
        let mut config = ScenarioConfig::demo();
        config.duration_secs = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_actions_after_the_end() {
        let mut config = ScenarioConfig::demo();
        config.script.push(ScriptedAction {
            at: 1000.0,
            action: ActionKind::SelectTarget,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scenario_json_round_trip() {
        let config = ScenarioConfig::demo();
        let json = serde_json::to_string(&config).unwrap();
        let back: ScenarioConfig = serde_json::from_str(&json).unwrap();
        assert!(back.validate().is_ok());
        assert_eq!(back.script.len(), config.script.len());
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let json = r#"{ "script": [] }"#;
        let config: ScenarioConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.duration_secs, 30.0);
        assert_eq!(config.abilities.len(), 5);
        assert!(config.spawn_dummy);
    }
}
