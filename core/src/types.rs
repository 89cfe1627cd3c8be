//! Shared primitive types used across the entire simulation.

/// An account balance. Always a whole number of units.
pub type Balance = i64;

/// A dice roll in hundredths of a percent: 0 ..= 9999 maps to 0.00 ..= 99.99.
pub type Roll = u32;

/// Zero-based index of a trial within a batch.
pub type TrialIndex = u64;

/// Number of distinct roll outcomes.
pub const ROLL_OUTCOMES: Roll = 10_000;
