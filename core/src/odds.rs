//! Odds model — maps a payout multiplier to the house's win chance.
//!
//! The house publishes a payout/win-chance table. Its points fit the
//! power law `f(x) = k * x^n` with k = 98.998 and n = -0.99999, where
//! x is the payout and f(x) the win chance in percent. Higher payouts
//! mean a lower chance of winning.
//!
//! ROUNDING: the fitted value is rounded to 2 decimal places using
//! round-half-to-even on the exact binary value of the product. The
//! result is kept as integer hundredths so roll comparisons are exact.

use crate::types::Roll;
use serde::{Deserialize, Serialize};

pub const FIT_COEFFICIENT: f64 = 98.998;
pub const FIT_EXPONENT: f64 = -0.99999;

/// Smallest payout the house accepts.
pub const PAYOUT_MINIMUM: f64 = 1.01202;
/// Largest payout the house accepts.
pub const PAYOUT_MAXIMUM: f64 = 9900.0;

/// Roll-under value in hundredths of a percent (4950 == 49.50%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinThreshold(u32);

impl WinThreshold {
    pub fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub fn hundredths(&self) -> u32 {
        self.0
    }

    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// A roll wins strictly below the threshold; a tie is a loss.
    pub fn wins(&self, roll: Roll) -> bool {
        roll < self.0
    }
}

/// Derive the roll-under threshold for `payout`.
///
/// Out-of-range payouts are not rejected: whatever the formula yields is
/// used, saturated into `u32` hundredths (NaN becomes 0).
pub fn derive_win_threshold(payout: f64) -> WinThreshold {
    let win_chance = FIT_COEFFICIENT * payout.powf(FIT_EXPONENT);
    WinThreshold(round_hundredths_half_even(win_chance) as u32)
}

/// Whether the house would accept `payout`.
pub fn is_valid_payout(payout: f64) -> bool {
    (PAYOUT_MINIMUM..=PAYOUT_MAXIMUM).contains(&payout)
}

/// Round `value` to a whole number of hundredths, ties to even.
/// Returns the hundredths count.
fn round_hundredths_half_even(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return scaled;
    }
    // Exact error of the multiplication; decides ties that the
    // product rounded onto.
    let residual = value.mul_add(100.0, -scaled);
    let floor = scaled.floor();
    if scaled - floor != 0.5 {
        return scaled.round();
    }
    if residual > 0.0 {
        floor + 1.0
    } else if residual < 0.0 {
        floor
    } else {
        scaled.round_ties_even()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_ties_round_to_even() {
        assert_eq!(round_hundredths_half_even(0.125), 12.0);
        assert_eq!(round_hundredths_half_even(0.375), 38.0);
        assert_eq!(round_hundredths_half_even(2.5), 250.0);
    }

    #[test]
    fn non_ties_round_to_nearest() {
        assert_eq!(round_hundredths_half_even(49.49934), 4950.0);
        assert_eq!(round_hundredths_half_even(32.99969), 3300.0);
        assert_eq!(round_hundredths_half_even(1.004), 100.0);
    }

    #[test]
    fn products_that_look_like_ties_use_the_exact_value() {
        // 0.015 is stored slightly below 0.015, so it rounds down even
        // though 0.015 * 100.0 evaluates to exactly 1.5.
        assert_eq!(round_hundredths_half_even(0.015), 1.0);
        // 0.025 is stored slightly above, so it rounds up.
        assert_eq!(round_hundredths_half_even(0.025), 3.0);
    }

    #[test]
    fn nan_saturates_to_zero_threshold() {
        assert_eq!(derive_win_threshold(f64::NAN).hundredths(), 0);
    }
}
