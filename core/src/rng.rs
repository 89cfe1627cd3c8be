//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All dice rolls flow through a RollSource. Production rolls come
//! from TrialRng instances derived from the single master seed of a run.
//!
//! Each trial gets its own RNG stream, seeded deterministically
//! from (master_seed XOR trial_index * golden ratio). This means:
//!   - Any single trial of a batch can be replayed in isolation.
//!   - Changing the iteration count never changes earlier trials.

use crate::types::{Roll, TrialIndex, ROLL_OUTCOMES};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Anything that can produce dice rolls for a trial.
pub trait RollSource {
    /// Draw one roll in hundredths, uniformly over `0..ROLL_OUTCOMES`.
    fn next_roll(&mut self) -> Roll;
}

/// The RNG stream for a single trial.
pub struct TrialRng {
    pub trial: TrialIndex,
    inner: Pcg64Mcg,
}

impl TrialRng {
    /// Create a trial RNG from the master seed and the trial's index.
    pub fn new(master_seed: u64, trial: TrialIndex) -> Self {
        let derived_seed = master_seed ^ trial.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            trial,
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }
}

impl RollSource for TrialRng {
    fn next_roll(&mut self) -> Roll {
        self.inner.gen_range(0..ROLL_OUTCOMES)
    }
}

/// Hands out per-trial RNG streams for one run.
#[derive(Debug, Clone, Copy)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_trial(&self, trial: TrialIndex) -> TrialRng {
        TrialRng::new(self.master_seed, trial)
    }
}

/// Replays a fixed list of rolls, then wraps around.
/// Used to drive trials through exact win/loss sequences.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    rolls: Vec<Roll>,
    cursor: usize,
}

impl ScriptedRolls {
    pub fn new(rolls: Vec<Roll>) -> Self {
        assert!(!rolls.is_empty(), "scripted roll list must not be empty");
        Self { rolls, cursor: 0 }
    }

    /// How many rolls have been drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RollSource for ScriptedRolls {
    fn next_roll(&mut self) -> Roll {
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll
    }
}
