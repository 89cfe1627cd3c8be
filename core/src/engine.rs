//! The simulation engine — runs a batch of trials and aggregates them.
//!
//! RULES:
//!   - The engine is the only context object. It owns the canonical
//!     configuration and account; nothing is process-global.
//!   - Trials run strictly one after another. Each one bets from its
//!     own clone of the starting account.
//!   - All randomness flows through the RngBank: trial `i` always draws
//!     from stream `i` of the master seed.
//!   - Observers hear about progress only at checkpoints.

use crate::{
    account::Account,
    aggregate::AggregateResult,
    config::SimConfig,
    error::SimResult,
    event::{SimEvent, SimObserver},
    results::TrialResult,
    rng::RngBank,
    strategy::MartingaleStrategy,
    types::TrialIndex,
};

pub struct SimEngine {
    config:   SimConfig,
    account:  Account,
    rng_bank: RngBank,
}

impl SimEngine {
    pub fn new(config: SimConfig, account: Account, seed: u64) -> Self {
        Self {
            config,
            account,
            rng_bank: RngBank::new(seed),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Settings may be changed between runs.
    pub fn config_mut(&mut self) -> &mut SimConfig {
        &mut self.config
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn account_mut(&mut self) -> &mut Account {
        &mut self.account
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng_bank = RngBank::new(seed);
    }

    /// Clamp a requested checkpoint count into `1..=iterations`.
    /// Anything non-positive or above the iteration count becomes the
    /// iteration count.
    pub fn verify_progress_checkpoints(&self, requested: i64) -> u64 {
        let iterations = self.config.iterations();
        match u64::try_from(requested) {
            Ok(n) if n > 0 && n <= iterations => n,
            _ => iterations,
        }
    }

    /// Run trial `trial` of this engine's seed on its own.
    pub fn run_trial(&self, trial: TrialIndex) -> TrialResult {
        let mut rng = self.rng_bank.for_trial(trial);
        MartingaleStrategy::new(&self.config).run_trial(&self.account, &mut rng)
    }

    /// Run `iterations` trials and aggregate them.
    ///
    /// Checkpoint `k` of `n` fires once, right after the first trial that
    /// brings completion to at least `k / n` of the batch, and reports
    /// `k * 100 / n` percent. The last checkpoint is always 100%.
    pub fn run(
        &self,
        progress_checkpoints: i64,
        observer: &mut dyn SimObserver,
    ) -> SimResult<AggregateResult> {
        self.config.validate()?;
        let checkpoints = self.verify_progress_checkpoints(progress_checkpoints);
        let iterations = self.config.iterations();

        self.announce(checkpoints, observer);

        let mut trials = Vec::new();
        let mut next_checkpoint: u64 = 1;

        for trial in 0..iterations {
            let result = self.run_trial(trial);
            log::debug!(
                "trial={trial} rounds={} final_balance={}",
                result.rounds_to_ruin(),
                result.final_balance()
            );
            if result.rounds_to_ruin() == 0 {
                observer.on_event(&SimEvent::DegenerateTrial {
                    trial,
                    balance: self.account.balance(),
                    base_bet: self.config.base_bet(),
                });
            }
            trials.push(result);

            // checkpoints <= iterations, so one trial crosses at most one.
            let completed = trial + 1;
            if next_checkpoint <= checkpoints
                && u128::from(completed) * u128::from(checkpoints)
                    >= u128::from(next_checkpoint) * u128::from(iterations)
            {
                observer.on_event(&SimEvent::ProgressCheckpoint {
                    completed,
                    iterations,
                    percent: next_checkpoint as f64 * 100.0 / checkpoints as f64,
                });
                next_checkpoint += 1;
            }
        }

        let aggregate = AggregateResult::from_trials(trials)?;
        aggregate.log_summary();
        observer.on_event(&SimEvent::RunCompleted {
            trial_count:             aggregate.trial_count(),
            average_rounds_to_ruin:  aggregate.average_rounds_to_ruin(),
            average_overall_balance: aggregate.average_overall_balance(),
        });
        Ok(aggregate)
    }

    /// Echo the settings in use and flag an out-of-range payout.
    fn announce(&self, checkpoints: u64, observer: &mut dyn SimObserver) {
        let config = &self.config;
        log::info!("running new simulation (seed {})", self.seed());
        log::info!("  balance:     {}", self.account.balance());
        log::info!("  base bet:    {}", config.base_bet());
        log::info!(
            "  payout:      {} (win below {:.2})",
            config.payout(),
            config.win_threshold().as_percent()
        );
        log::info!("  iterations:  {}", config.iterations());
        log::info!("  loss adder:  {}%", config.loss_multiplier_percent());

        observer.on_event(&SimEvent::RunStarted {
            seed:                    self.seed(),
            starting_balance:        self.account.balance(),
            base_bet:                config.base_bet(),
            payout:                  config.payout(),
            win_threshold:           config.win_threshold().as_percent(),
            iterations:              config.iterations(),
            loss_multiplier_percent: config.loss_multiplier_percent(),
            progress_checkpoints:    checkpoints,
        });

        if !config.is_payout_valid() {
            log::warn!("payout {} is outside the range allowed by the house", config.payout());
            observer.on_event(&SimEvent::PayoutOutOfRange { payout: config.payout() });
        }
    }
}
