//! MageDuel - Client-Simulated Spell Combat Core
//!
//! The simulation core of a small multiplayer action prototype: ability
//! casting (instant, timed, channeled), cooldown and mana gating, in-flight
//! projectiles with homing, and timed status effects (slow, freeze,
//! transform, damage-over-time).
//!
//! Rendering, camera/input handling and the position relay are external
//! collaborators; this library exposes the core game modules for testing
//! and reuse.

pub mod cli;
pub mod combat;
pub mod headless;

// Re-export commonly used types
pub use combat::abilities::{AbilityType, CastError, CastOutcome};
pub use combat::log::{CombatLog, CombatLogEventType};
pub use combat::CombatPlugin;
pub use headless::ScenarioConfig;
