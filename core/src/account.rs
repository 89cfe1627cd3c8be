//! The bettor's account. Holds a whole-number balance.
//!
//! RULE: every mutation truncates its amount toward zero first, so
//! fractional rewards and escalated bets never leave cents behind.
//! The account never refuses an operation; detecting ruin is the
//! strategy's job.

use crate::types::Balance;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    balance: Balance,
}

impl Account {
    pub fn new(balance: Balance) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn set_balance(&mut self, new_balance: f64) {
        self.balance = truncate(new_balance);
    }

    /// Credit `amount` (truncated). Returns the new balance.
    pub fn add(&mut self, amount: f64) -> Balance {
        self.balance = self.balance.saturating_add(truncate(amount));
        self.balance
    }

    /// Debit `amount` (truncated). Returns the new balance.
    pub fn subtract(&mut self, amount: f64) -> Balance {
        self.balance = self.balance.saturating_sub(truncate(amount));
        self.balance
    }
}

fn truncate(amount: f64) -> Balance {
    // `as` truncates toward zero and saturates out-of-range values.
    amount as Balance
}
