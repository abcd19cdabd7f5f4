//! Random sources
//!
//! The cascade only ever asks for two things: a fair coin and a uniform
//! float for ball colors. Runs are reproducible from the seed alone.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Randomness consumed by the simulation
pub trait RandomSource {
    /// Fair coin. `true` means right.
    fn coin(&mut self) -> bool;
    /// Uniform in [0, 1)
    fn unit(&mut self) -> f32;
}

/// PCG generator seeded from a run seed
#[derive(Debug, Clone)]
pub struct SeededSource {
    seed: u64,
    rng: Pcg32,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this source was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededSource {
    fn coin(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed coin script, cycling when it runs out
///
/// An empty script always answers left. `unit` returns a constant.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    coins: Vec<bool>,
    next: usize,
    unit: f32,
}

impl ScriptedSource {
    pub fn new(coins: Vec<bool>) -> Self {
        Self {
            coins,
            next: 0,
            unit: 0.5,
        }
    }

    /// Constant returned by `unit`
    pub fn with_unit(mut self, unit: f32) -> Self {
        self.unit = unit;
        self
    }

    /// Coins handed out so far
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl RandomSource for ScriptedSource {
    fn coin(&mut self) -> bool {
        if self.coins.is_empty() {
            return false;
        }
        let value = self.coins[self.next % self.coins.len()];
        self.next += 1;
        value
    }

    fn unit(&mut self) -> f32 {
        self.unit
    }
}
