//! Martingale betting strategy — one trial of betting until ruin.
//!
//! Every roll:
//!   1. The current bet is debited from the account.
//!   2. A win credits `bet * payout` and resets the bet to the base bet.
//!   3. A loss raises the bet by the configured loss multiplier.
//!
//! The trial ends as soon as the balance cannot cover the current bet.
//! The bet itself is never truncated; only account mutations are.

use crate::{
    account::Account,
    config::SimConfig,
    results::TrialResult,
    rng::RollSource,
};

pub struct MartingaleStrategy<'a> {
    config:      &'a SimConfig,
    current_bet: f64,
}

impl<'a> MartingaleStrategy<'a> {
    pub fn new(config: &'a SimConfig) -> Self {
        Self {
            config,
            current_bet: config.base_bet(),
        }
    }

    pub fn current_bet(&self) -> f64 {
        self.current_bet
    }

    /// Draw one roll and report whether it beat the win threshold.
    pub fn roll<R: RollSource + ?Sized>(&self, rolls: &mut R) -> bool {
        self.config.win_threshold().wins(rolls.next_roll())
    }

    /// Raise the bet by the loss multiplier.
    pub fn increase_bet(&mut self) {
        self.current_bet += self.current_bet * self.config.loss_multiplier_decimal();
    }

    pub fn reset_bet(&mut self) {
        self.current_bet = self.config.base_bet();
    }

    pub fn lose_roll(&mut self) {
        self.increase_bet();
    }

    pub fn win_roll(&mut self, account: &mut Account) {
        account.add(self.current_bet * self.config.payout());
        self.reset_bet();
    }

    pub fn can_cover(&self, account: &Account) -> bool {
        account.balance() as f64 >= self.current_bet
    }

    /// Bet from a private copy of `starting` until it cannot cover the
    /// current bet.
    pub fn run_trial<R: RollSource + ?Sized>(
        &mut self,
        starting: &Account,
        rolls: &mut R,
    ) -> TrialResult {
        self.reset_bet();
        let mut account = starting.clone();

        let mut balances = vec![account.balance()];
        while self.can_cover(&account) {
            account.subtract(self.current_bet);
            if self.roll(rolls) {
                self.win_roll(&mut account);
            } else {
                self.lose_roll();
            }
            balances.push(account.balance());
        }

        if balances.len() == 1 {
            log::warn!(
                "balance {} cannot cover the base bet {}; the configuration does not allow a single roll",
                starting.balance(),
                self.config.base_bet()
            );
        }

        TrialResult::from_recorded(balances)
    }
}
