//! SimConfig - Simulation Configuration
//!
//! TigerStyle: Seed management and delay limits for deterministic testing.

use rand::Rng;
use std::env;

use crate::constants::{
    DST_DELAY_MS_DEFAULT, DST_DELAY_MS_MAX, DST_DELAY_PROBABILITY_DEFAULT,
    DST_FAULT_PROBABILITY_MAX,
};

/// Environment variable holding the seed to replay.
pub const DST_SEED_ENV: &str = "DST_SEED";

/// Configuration for a simulated backend.
///
/// TigerStyle:
/// - Immutable after creation
/// - Seed logged for reproducibility
/// - All limits explicit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Random seed for deterministic execution
    seed: u64,
    /// Probability that an operation is delayed
    delay_probability: f64,
    /// Exclusive upper bound of a delay in milliseconds
    delay_ms_max: u64,
}

impl SimConfig {
    /// Create config with explicit seed and default delay settings.
    ///
    /// # Example
    /// ```
    /// use artable_core::dst::SimConfig;
    /// let config = SimConfig::with_seed(12345);
    /// assert_eq!(config.seed(), 12345);
    /// ```
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            delay_probability: DST_DELAY_PROBABILITY_DEFAULT,
            delay_ms_max: DST_DELAY_MS_DEFAULT,
        }
    }

    /// Create config from the `DST_SEED` env var, or a random seed.
    ///
    /// A random seed is logged so a failing run can be replayed.
    ///
    /// # Panics
    /// Panics if `DST_SEED` is set but is not a valid u64.
    #[must_use]
    pub fn from_env_or_random() -> Self {
        let seed = match env::var(DST_SEED_ENV) {
            Ok(seed_str) => seed_str.parse::<u64>().unwrap_or_else(|_| {
                panic!("{DST_SEED_ENV} must be a valid u64, got: {seed_str}");
            }),
            Err(_) => {
                let seed = rand::thread_rng().gen::<u64>();
                tracing::info!(seed, "DST: generated random seed (replay with {DST_SEED_ENV}={seed})");
                seed
            }
        };

        Self::with_seed(seed)
    }

    /// Get the seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the delay probability.
    #[must_use]
    pub fn delay_probability(&self) -> f64 {
        self.delay_probability
    }

    /// Get the exclusive delay bound in milliseconds.
    #[must_use]
    pub fn delay_ms_max(&self) -> u64 {
        self.delay_ms_max
    }

    /// Create a new config with a different delay probability.
    ///
    /// # Panics
    /// Panics if probability is not in [0, 1].
    #[must_use]
    pub fn with_delay_probability(self, probability: f64) -> Self {
        // Precondition
        assert!(
            (0.0..=DST_FAULT_PROBABILITY_MAX).contains(&probability),
            "delay probability must be in [0, 1], got {probability}"
        );

        Self {
            delay_probability: probability,
            ..self
        }
    }

    /// Create a new config with a different delay bound.
    ///
    /// # Panics
    /// Panics if the bound is zero or exceeds `DST_DELAY_MS_MAX`.
    #[must_use]
    pub fn with_delay_ms_max(self, delay_ms_max: u64) -> Self {
        // Preconditions
        assert!(delay_ms_max > 0, "delay_ms_max must be positive");
        assert!(
            delay_ms_max <= DST_DELAY_MS_MAX,
            "delay_ms_max({delay_ms_max}) exceeds max ({DST_DELAY_MS_MAX})"
        );

        Self {
            delay_ms_max,
            ..self
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_env_or_random()
    }
}
