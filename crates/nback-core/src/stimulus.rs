//! Random stimulus sequences.
//!
//! The generator never touches a global RNG: callers inject any [`rand::Rng`],
//! and [`StimulusGenerator::seeded`] gives reproducible sequences.

use std::ops::Deref;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::ConfigError;

/// The digits shown during one session, in presentation order. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StimulusSequence(Vec<u8>);

impl StimulusSequence {
    /// Wrap a pre-built sequence, checking every value lies in `1..=range_max`.
    pub fn from_values(values: Vec<u8>, range_max: u8) -> Result<Self, ConfigError> {
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|&(_, &v)| v == 0 || v > range_max)
        {
            return Err(ConfigError::StimulusOutOfRange {
                index,
                value,
                range_max,
            });
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for StimulusSequence {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

/// Draws stimuli uniformly from `1..=range_max`.
#[derive(Debug, Clone)]
pub struct StimulusGenerator<R = StdRng> {
    rng: R,
}

impl StimulusGenerator<StdRng> {
    /// Deterministic generator for tests and `--seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system.
    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> StimulusGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate `total` independent stimuli in `1..=range_max`.
    pub fn generate(&mut self, total: usize, range_max: u8) -> StimulusSequence {
        let hi = range_max.max(1);
        let values = (0..total).map(|_| self.rng.random_range(1..=hi)).collect();
        StimulusSequence(values)
    }
}
