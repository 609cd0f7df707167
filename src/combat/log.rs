//! Combat logging
//!
//! Records all combat events for display and post-run analysis.

use bevy::prelude::*;

/// A single entry in the combat log
#[derive(Debug, Clone)]
pub struct CombatLogEntry {
    /// Timestamp in match time (seconds since simulation start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// Mana restored (channel ticks, channel completion)
    ManaGain,
    /// Ability cast or cast started
    AbilityUsed,
    /// Cast canceled by movement
    CastInterrupted,
    /// Cast request refused or canceled at completion
    CastFailed,
    /// Status effect applied to a target
    StatusApplied,
    /// Status effect expired
    StatusRemoved,
    /// Combatant died
    Death,
    /// Simulation event (start, end, etc.)
    MatchEvent,
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current match time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new run
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Render the log as plain text, one timestamped line per entry.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "[{:8.2}] [{:?}] {}\n",
                entry.timestamp, entry.event_type, entry.message
            ));
        }
        out
    }
}

/// Advance the log's match clock. Runs first each tick so every entry
/// recorded during the tick carries the current timestamp.
pub fn advance_match_clock(time: Res<Time>, mut combat_log: ResMut<CombatLog>) {
    combat_log.match_time += time.delta_secs();
}
