//! Headless mode for scripted testing
//!
//! Runs combat scenarios without any graphical output, suitable for
//! automated testing and replay analysis.
//!
//! ## Usage
//!
//! ```bash
//! # Run the built-in demo duel
//! cargo run --release
//!
//! # Run a scripted scenario
//! cargo run --release -- --scenario scenario.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "script": [
//!     { "at": 0.2, "action": "SelectTarget" },
//!     { "at": 0.5, "action": { "Cast": "FrostBolt" } }
//!   ],
//!   "duration_secs": 10,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::{ActionKind, ScenarioConfig, ScriptedAction};
pub use runner::run_scenario;
