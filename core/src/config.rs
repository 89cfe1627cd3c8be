//! Betting configuration and the on-disk run settings file.
//!
//! RULE: the win threshold is derived state. It is written only by the
//! constructor and `set_payout`, so it can never be read stale.

use crate::{
    error::{SimError, SimResult},
    odds::{self, WinThreshold},
    types::Balance,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ITERATIONS: u64 = 100;
pub const DEFAULT_LOSS_MULTIPLIER_PERCENT: u32 = 100;
pub const DEFAULT_STARTING_BALANCE: Balance = 200;
pub const DEFAULT_PROGRESS_CHECKPOINTS: i64 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    base_bet: f64,
    payout: f64,
    loss_multiplier_percent: u32,
    iterations: u64,
    win_threshold: WinThreshold,
}

impl SimConfig {
    /// All values are given as they appear on the betting screen:
    /// `payout` is a multiplier, `loss_multiplier_percent` a whole percent
    /// added to the bet after every loss.
    pub fn new(base_bet: f64, payout: f64, iterations: u64, loss_multiplier_percent: u32) -> Self {
        Self {
            base_bet,
            payout,
            loss_multiplier_percent,
            iterations,
            win_threshold: Self::threshold_for(payout),
        }
    }

    /// Load and validate a settings file. See [`RunSettings`].
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        RunSettings::load(path)?.config()
    }

    /// The original program's defaults: bet 1 at 2x, doubling on loss.
    pub fn default_test() -> Self {
        Self::new(1.0, 2.0, DEFAULT_ITERATIONS, DEFAULT_LOSS_MULTIPLIER_PERCENT)
    }

    /// Reject settings that cannot describe a finite batch.
    /// The payout is never rejected; out of range it is only a notice.
    pub fn validate(&self) -> SimResult<()> {
        if !self.base_bet.is_finite() || self.base_bet <= 0.0 {
            return Err(SimError::InvalidConfig {
                field: "base_bet",
                reason: format!("must be a positive number, got {}", self.base_bet),
            });
        }
        if self.iterations == 0 {
            return Err(SimError::InvalidConfig {
                field: "iterations",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    fn threshold_for(payout: f64) -> WinThreshold {
        if !odds::is_valid_payout(payout) {
            log::warn!(
                "payout {payout} is outside the range allowed by the house ({}..={})",
                odds::PAYOUT_MINIMUM,
                odds::PAYOUT_MAXIMUM
            );
        }
        odds::derive_win_threshold(payout)
    }

    pub fn set_base_bet(&mut self, base_bet: f64) {
        self.base_bet = base_bet;
    }

    pub fn set_payout(&mut self, payout: f64) {
        self.payout = payout;
        self.win_threshold = Self::threshold_for(payout);
    }

    pub fn set_iterations(&mut self, iterations: u64) {
        self.iterations = iterations;
    }

    pub fn set_loss_multiplier_percent(&mut self, percent: u32) {
        self.loss_multiplier_percent = percent;
    }

    pub fn base_bet(&self) -> f64 {
        self.base_bet
    }

    pub fn payout(&self) -> f64 {
        self.payout
    }

    pub fn is_payout_valid(&self) -> bool {
        odds::is_valid_payout(self.payout)
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn loss_multiplier_percent(&self) -> u32 {
        self.loss_multiplier_percent
    }

    /// The loss multiplier as a fraction (100% -> 1.0).
    pub fn loss_multiplier_decimal(&self) -> f64 {
        self.loss_multiplier_percent as f64 / 100.0
    }

    pub fn win_threshold(&self) -> WinThreshold {
        self.win_threshold
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::default_test()
    }
}

/// Everything a collaborator supplies for one run, as stored in a
/// JSON settings file. Missing optional fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub base_bet: f64,
    pub payout: f64,
    #[serde(default = "default_iterations")]
    pub iterations: u64,
    #[serde(default = "default_loss_multiplier", alias = "loss_adder")]
    pub loss_multiplier_percent: u32,
    #[serde(default = "default_starting_balance", alias = "balance")]
    pub starting_balance: Balance,
    #[serde(default = "default_checkpoints")]
    pub progress_checkpoints: i64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_iterations() -> u64 { DEFAULT_ITERATIONS }
fn default_loss_multiplier() -> u32 { DEFAULT_LOSS_MULTIPLIER_PERCENT }
fn default_starting_balance() -> Balance { DEFAULT_STARTING_BALANCE }
fn default_checkpoints() -> i64 { DEFAULT_PROGRESS_CHECKPOINTS }

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            base_bet: 1.0,
            payout: 2.0,
            iterations: DEFAULT_ITERATIONS,
            loss_multiplier_percent: DEFAULT_LOSS_MULTIPLIER_PERCENT,
            starting_balance: DEFAULT_STARTING_BALANCE,
            progress_checkpoints: DEFAULT_PROGRESS_CHECKPOINTS,
            seed: None,
        }
    }
}

impl RunSettings {
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the validated betting configuration.
    pub fn config(&self) -> SimResult<SimConfig> {
        let config = SimConfig::new(
            self.base_bet,
            self.payout,
            self.iterations,
            self.loss_multiplier_percent,
        );
        config.validate()?;
        Ok(config)
    }
}
