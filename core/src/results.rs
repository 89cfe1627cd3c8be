//! The outcome of a single trial.

use crate::{
    error::{SimError, SimResult},
    types::Balance,
};
use serde::Serialize;

/// Balance after every roll of one trial, starting with the balance
/// before the first roll. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResult {
    balances: Vec<Balance>,
}

impl TrialResult {
    pub fn new(balances: Vec<Balance>) -> SimResult<Self> {
        if balances.is_empty() {
            return Err(SimError::EmptyTrial);
        }
        Ok(Self { balances })
    }

    /// For balances recorded by a trial, which always hold the start.
    pub(crate) fn from_recorded(balances: Vec<Balance>) -> Self {
        debug_assert!(!balances.is_empty(), "recorded trial lost its starting balance");
        Self { balances }
    }

    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    /// The starting balance is a graph point, not a roll.
    pub fn rounds_to_ruin(&self) -> usize {
        self.balances.len() - 1
    }

    /// Mean of every recorded balance, the starting one included.
    pub fn mean_balance(&self) -> f64 {
        let total: f64 = self.balances.iter().map(|&b| b as f64).sum();
        total / self.balances.len() as f64
    }

    pub fn final_balance(&self) -> Balance {
        // Non-empty by construction.
        self.balances[self.balances.len() - 1]
    }
}
