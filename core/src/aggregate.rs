//! Batch aggregation — folds many trials into one summary.
//!
//! Trials end at different rounds. Before any per-round statistic is
//! taken, every trial's balance sequence is padded with zeros to the
//! length of the longest trial: a ruined trial contributes 0.
//!
//! The median series stops at the first round whose median is 0 (that
//! round is included). Past it, at least half of the column is padding
//! and later medians carry no information about the survivors.

use crate::{
    error::{SimError, SimResult},
    results::TrialResult,
    types::Balance,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    trial_count:             usize,
    average_rounds_to_ruin:  f64,
    average_overall_balance: f64,
    /// Mean balance at each roll index, indexed from the starting balance.
    mean_balance_series:     Vec<f64>,
    /// Median balance at each roll index, cut after the first zero.
    median_balance_series:   Vec<f64>,
}

impl AggregateResult {
    /// Consume a batch of trials. The batch must not be empty.
    pub fn from_trials(trials: Vec<TrialResult>) -> SimResult<Self> {
        if trials.is_empty() {
            return Err(SimError::NoTrials);
        }
        let n = trials.len() as f64;

        let average_rounds_to_ruin =
            trials.iter().map(|t| t.rounds_to_ruin() as f64).sum::<f64>() / n;
        let average_overall_balance =
            trials.iter().map(TrialResult::mean_balance).sum::<f64>() / n;

        let longest = trials.iter().map(|t| t.balances().len()).max().unwrap_or(0);

        let mean_balance_series = (0..longest)
            .map(|round| {
                let total: f64 = padded_column(&trials, round).map(|b| b as f64).sum();
                total / n
            })
            .collect();

        let mut median_balance_series = Vec::new();
        let mut column = Vec::with_capacity(trials.len());
        for round in 0..longest {
            column.clear();
            column.extend(padded_column(&trials, round));
            let median = median(&mut column);
            median_balance_series.push(median);
            if median == 0.0 {
                break;
            }
        }

        Ok(Self {
            trial_count: trials.len(),
            average_rounds_to_ruin,
            average_overall_balance,
            mean_balance_series,
            median_balance_series,
        })
    }

    pub fn trial_count(&self) -> usize {
        self.trial_count
    }

    pub fn average_rounds_to_ruin(&self) -> f64 {
        self.average_rounds_to_ruin
    }

    pub fn average_overall_balance(&self) -> f64 {
        self.average_overall_balance
    }

    pub fn mean_balance_series(&self) -> &[f64] {
        &self.mean_balance_series
    }

    pub fn median_balance_series(&self) -> &[f64] {
        &self.median_balance_series
    }

    /// Length of the longest trial, starting balance included.
    pub fn num_of_rolls(&self) -> usize {
        self.mean_balance_series.len()
    }

    pub fn log_summary(&self) {
        log::info!(
            "results over {} trials: average rolls until bankrupt {:.2}, average balance during run {:.2}",
            self.trial_count,
            self.average_rounds_to_ruin,
            self.average_overall_balance
        );
        log::info!(
            "results: {} mean points, {} median points before the median hit zero",
            self.mean_balance_series.len(),
            self.median_balance_series.len()
        );
    }
}

/// Balance of every trial at `round`, 0 where a trial already ended.
fn padded_column(trials: &[TrialResult], round: usize) -> impl Iterator<Item = Balance> + '_ {
    trials
        .iter()
        .map(move |t| t.balances().get(round).copied().unwrap_or(0))
}

/// Median of a non-empty column; the mean of the middle pair when even.
fn median(column: &mut [Balance]) -> f64 {
    column.sort_unstable();
    let mid = column.len() / 2;
    if column.len() % 2 == 1 {
        column[mid] as f64
    } else {
        (column[mid - 1] as f64 + column[mid] as f64) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_odd_column_is_middle_value() {
        assert_eq!(median(&mut [9, 1, 5]), 5.0);
    }

    #[test]
    fn median_of_even_column_averages_middle_pair() {
        assert_eq!(median(&mut [4, 1, 3, 10]), 3.5);
    }
}
