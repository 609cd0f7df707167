//! Data-Driven Ability Configuration
//!
//! Ability definitions are loaded from `assets/config/abilities.ron`
//! instead of being hardcoded in Rust.
//!
//! ## Benefits
//! - Balance changes don't require recompilation
//! - Easier to review and modify ability values
//! - Validates all abilities exist at startup
//!
//! ## Usage
//! ```ignore
//! fn my_system(abilities: Res<AbilityDefinitions>) {
//!     let def = abilities.get_unchecked(&AbilityType::Fireball);
//!     println!("Fireball cast time: {}", def.cast_time);
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::abilities::AbilityType;

/// Damage-over-time payload applied on projectile impact.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DotSpec {
    /// Damage applied per tick
    pub damage: f32,
    /// Total duration of the effect in seconds
    pub duration: f32,
}

/// Movement slow payload applied on projectile impact.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlowSpec {
    /// Velocity multiplier while slowed (0.3 = 70% slower)
    pub factor: f32,
    /// Slow duration in seconds
    pub duration: f32,
}

/// What an ability does when it resolves. One enumeration checked in one
/// place, instead of behavior scattered behind per-ability subclasses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Homing projectile that damages on impact, optionally applying a
    /// damage-over-time or slow status.
    Bolt {
        damage: f32,
        /// Travel speed in units per second
        speed: f32,
        #[serde(default)]
        dot: Option<DotSpec>,
        #[serde(default)]
        slow: Option<SlowSpec>,
    },
    /// Instant area pulse around the caster: freezes the current target
    /// in place if it is within `radius`, and spawns a cosmetic
    /// expanding ring either way.
    FreezePulse {
        #[serde(default)]
        damage: f32,
        radius: f32,
        freeze_duration: f32,
    },
    /// Transform the current target into a slowly wandering critter.
    Transform { duration: f32 },
    /// Restore the caster's mana to full (channel payoff).
    RestoreMana,
}

/// Complete ability configuration loaded from RON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AbilityConfig {
    /// Display name of the ability
    pub name: String,
    /// Cast time in seconds (0.0 = instant)
    #[serde(default)]
    pub cast_time: f32,
    /// Maximum effective range in units
    pub range: f32,
    /// Mana cost
    #[serde(default)]
    pub mana_cost: f32,
    /// Cooldown after the effect resolves, in seconds
    #[serde(default)]
    pub cooldown: f32,
    /// Whether this is a channel (mana ticks + aura while active)
    #[serde(default)]
    pub channel: bool,
    /// Offensive abilities the input layer must target/facing-check
    #[serde(default)]
    pub requires_facing: bool,
    /// What happens when the ability resolves
    pub effect: AbilityEffect,
}

impl AbilityConfig {
    /// Returns true if this ability resolves synchronously at request time.
    pub fn is_instant(&self) -> bool {
        self.cast_time <= 0.0
    }
}

/// Root structure for the abilities.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct AbilitiesConfig {
    pub abilities: HashMap<AbilityType, AbilityConfig>,
}

/// Resource containing all ability definitions.
///
/// Loaded from `assets/config/abilities.ron` at startup.
/// Access via `Res<AbilityDefinitions>` in systems.
#[derive(Resource)]
pub struct AbilityDefinitions {
    definitions: HashMap<AbilityType, AbilityConfig>,
}

impl Default for AbilityDefinitions {
    /// Load ability definitions from the default config file.
    /// Panics if the file cannot be loaded - use for tests only.
    fn default() -> Self {
        load_ability_definitions().expect("Failed to load ability definitions in Default impl")
    }
}

impl AbilityDefinitions {
    /// Create from a loaded config
    pub fn new(config: AbilitiesConfig) -> Self {
        Self {
            definitions: config.abilities,
        }
    }

    /// Get the configuration for an ability type
    pub fn get(&self, ability: &AbilityType) -> Option<&AbilityConfig> {
        self.definitions.get(ability)
    }

    /// Get the configuration for an ability type, panicking if not found.
    /// Use this when you know the ability must exist (validated at startup).
    pub fn get_unchecked(&self, ability: &AbilityType) -> &AbilityConfig {
        self.definitions
            .get(ability)
            .unwrap_or_else(|| panic!("Ability {:?} not found in definitions", ability))
    }

    /// Get all ability types that are defined
    pub fn ability_types(&self) -> impl Iterator<Item = &AbilityType> {
        self.definitions.keys()
    }

    /// Check the registry against its construction-time contract.
    ///
    /// Every ability type must be defined, all numbers must be sane, and
    /// a channel must have a nonzero cast time. A registry that fails here
    /// is rejected at startup rather than misbehaving mid-simulation.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let expected_abilities = [
            AbilityType::Fireball,
            AbilityType::FrostBolt,
            AbilityType::FrostNova,
            AbilityType::Innovation,
            AbilityType::Sheep,
        ];

        let mut problems = Vec::new();

        for ability in expected_abilities {
            if !self.definitions.contains_key(&ability) {
                problems.push(format!("{:?}: missing definition", ability));
            }
        }

        for (ability, def) in &self.definitions {
            if def.name.is_empty() {
                problems.push(format!("{:?}: empty name", ability));
            }
            if def.cast_time < 0.0 {
                problems.push(format!("{:?}: negative cast time {}", ability, def.cast_time));
            }
            if def.mana_cost < 0.0 {
                problems.push(format!("{:?}: negative mana cost {}", ability, def.mana_cost));
            }
            if def.cooldown < 0.0 {
                problems.push(format!("{:?}: negative cooldown {}", ability, def.cooldown));
            }
            if def.range < 0.0 {
                problems.push(format!("{:?}: negative range {}", ability, def.range));
            }
            // An instant "channel" has no duration to channel over.
            if def.channel && def.cast_time <= 0.0 {
                problems.push(format!("{:?}: channel with no cast time", ability));
            }

            match &def.effect {
                AbilityEffect::Bolt { damage, speed, dot, slow } => {
                    if *speed <= 0.0 {
                        problems.push(format!("{:?}: bolt speed must be positive", ability));
                    }
                    if *damage < 0.0 {
                        problems.push(format!("{:?}: negative bolt damage", ability));
                    }
                    if let Some(dot) = dot {
                        if dot.damage <= 0.0 || dot.duration <= 0.0 {
                            problems.push(format!("{:?}: degenerate damage-over-time spec", ability));
                        }
                    }
                    if let Some(slow) = slow {
                        if slow.factor <= 0.0 || slow.factor >= 1.0 || slow.duration <= 0.0 {
                            problems.push(format!("{:?}: degenerate slow spec", ability));
                        }
                    }
                }
                AbilityEffect::FreezePulse { damage, radius, freeze_duration } => {
                    if *radius <= 0.0 || *freeze_duration <= 0.0 || *damage < 0.0 {
                        problems.push(format!("{:?}: degenerate freeze pulse spec", ability));
                    }
                }
                AbilityEffect::Transform { duration } => {
                    if *duration <= 0.0 {
                        problems.push(format!("{:?}: transform duration must be positive", ability));
                    }
                }
                AbilityEffect::RestoreMana => {}
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

/// Load ability definitions from assets/config/abilities.ron
pub fn load_ability_definitions() -> Result<AbilityDefinitions, String> {
    let config_path = "assets/config/abilities.ron";

    let contents = std::fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read {}: {}", config_path, e))?;

    let config: AbilitiesConfig =
        ron::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", config_path, e))?;

    let definitions = AbilityDefinitions::new(config);

    definitions
        .validate()
        .map_err(|problems| format!("Invalid ability definitions: {}", problems.join("; ")))?;

    info!(
        "Loaded {} ability definitions from {}",
        definitions.definitions.len(),
        config_path
    );

    Ok(definitions)
}

/// Bevy plugin for ability configuration loading
pub struct AbilityConfigPlugin;

impl Plugin for AbilityConfigPlugin {
    fn build(&self, app: &mut App) {
        match load_ability_definitions() {
            Ok(definitions) => {
                app.insert_resource(definitions);
            }
            Err(e) => {
                // The registry is a construction-time contract; a bad one
                // must never reach the simulation.
                panic!("Failed to load ability definitions: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt_config(name: &str) -> AbilityConfig {
        AbilityConfig {
            name: name.to_string(),
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

    #[test]
    fn test_is_instant() {
        let mut config = bolt_config("Test Bolt");
        assert!(!config.is_instant());
        config.cast_time = 0.0;
        assert!(config.is_instant());
    }

    #[test]
    fn test_validate_rejects_channel_without_cast_time() {
        let mut abilities = HashMap::new();
        for ability in [
            AbilityType::Fireball,
            AbilityType::FrostBolt,
            AbilityType::FrostNova,
            AbilityType::Innovation,
            AbilityType::Sheep,
        ] {
            abilities.insert(ability, bolt_config("Filler"));
        }
        let broken = abilities.get_mut(&AbilityType::Innovation).unwrap();
        broken.channel = true;
        broken.cast_time = 0.0;

        let defs = AbilityDefinitions::new(AbilitiesConfig { abilities });
        let problems = defs.validate().unwrap_err();
        assert!(problems.iter().any(|p| p.contains("channel with no cast time")));
    }

    #[test]
    fn test_validate_rejects_negative_cost() {
        let mut abilities = HashMap::new();
        for ability in [
            AbilityType::Fireball,
            AbilityType::FrostBolt,
            AbilityType::FrostNova,
            AbilityType::Innovation,
            AbilityType::Sheep,
        ] {
            abilities.insert(ability, bolt_config("Filler"));
        }
        abilities.get_mut(&AbilityType::Fireball).unwrap().mana_cost = -5.0;

        let defs = AbilityDefinitions::new(AbilitiesConfig { abilities });
        assert!(defs.validate().is_err());
    }

    #[test]
    fn test_validate_reports_missing_abilities() {
        let defs = AbilityDefinitions::new(AbilitiesConfig {
            abilities: HashMap::new(),
        });
        let problems = defs.validate().unwrap_err();
        assert_eq!(problems.len(), 5);
    }
}
