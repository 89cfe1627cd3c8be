//! Run events — everything the engine tells its collaborator.
//!
//! RULE: events are advisory. An observer may display or record them
//! but can never pause, alter or cancel a run.

use crate::types::{Balance, TrialIndex};
use serde::{Deserialize, Serialize};

/// Every event emitted during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Run lifecycle ──────────────────────────────
    RunStarted {
        seed: u64,
        starting_balance: Balance,
        base_bet: f64,
        payout: f64,
        win_threshold: f64,
        iterations: u64,
        loss_multiplier_percent: u32,
        progress_checkpoints: u64,
    },
    RunCompleted {
        trial_count: usize,
        average_rounds_to_ruin: f64,
        average_overall_balance: f64,
    },

    // ── Progress ───────────────────────────────────
    ProgressCheckpoint {
        completed: u64,
        iterations: u64,
        percent: f64,
    },

    // ── Diagnostics ────────────────────────────────
    PayoutOutOfRange {
        payout: f64,
    },
    DegenerateTrial {
        trial: TrialIndex,
        balance: Balance,
        base_bet: f64,
    },
}

impl SimEvent {
    /// Stable name of the variant, matching its serialized tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            SimEvent::RunStarted { .. }         => "run_started",
            SimEvent::RunCompleted { .. }       => "run_completed",
            SimEvent::ProgressCheckpoint { .. } => "progress_checkpoint",
            SimEvent::PayoutOutOfRange { .. }   => "payout_out_of_range",
            SimEvent::DegenerateTrial { .. }    => "degenerate_trial",
        }
    }
}

/// Receives events while a run is in progress.
pub trait SimObserver {
    fn on_event(&mut self, event: &SimEvent);
}

impl<F: FnMut(&SimEvent)> SimObserver for F {
    fn on_event(&mut self, event: &SimEvent) {
        self(event)
    }
}

/// Observer that keeps every event in order. Used by tests and tooling.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentages of every progress checkpoint, in order.
    pub fn progress(&self) -> Vec<f64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::ProgressCheckpoint { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, type_name: &str) -> usize {
        self.events.iter().filter(|e| e.type_name() == type_name).count()
    }
}

impl SimObserver for EventLog {
    fn on_event(&mut self, event: &SimEvent) {
        self.events.push(event.clone());
    }
}
