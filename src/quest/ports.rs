//! Seams the quest sequencer reaches through for chance and pacing, so a
//! run can be replayed exactly and tests never wait on a real timer.

use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Randomness
// ---------------------------------------------------------------------------

/// Source of uniform draws in [0, 1).
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Adapter over any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Seeded generator for reproducible runs, or entropy when `seed` is `None`.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(StdRng::seed_from_u64(seed)),
            None => Self::new(StdRng::from_entropy()),
        }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct FixedRandom {
    values: Vec<f64>,
    index: usize,
}

impl FixedRandom {
    /// Values are clamped into [0, 1).
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.0] } else { values };
        Self {
            values: values
                .into_iter()
                .map(|v| v.clamp(0.0, 0.999_999))
                .collect(),
            index: 0,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.index
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}

// ---------------------------------------------------------------------------
// Pacing
// ---------------------------------------------------------------------------

/// Suspends the story between a step starting and its outcome.
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Blocks the current thread for the full delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pause(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Advances a virtual clock instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    elapsed: Duration,
    pauses: Vec<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn pauses(&self) -> &[Duration] {
        &self.pauses
    }
}

impl Pacer for VirtualClock {
    fn pause(&mut self, delay: Duration) {
        self.elapsed += delay;
        self.pauses.push(delay);
        debug!("Virtual clock advanced to {:?}", self.elapsed);
    }
}
