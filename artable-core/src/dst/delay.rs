//! Schedule Perturbation - Cancellable Random Delays
//!
//! TigerStyle: Widen race windows in callers by suspending backend operations
//! for a seeded, random amount of time. The wait always races the caller's
//! cancellation token.

use std::fmt::Debug;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::config::SimConfig;
use super::rng::DeterministicRng;
use crate::backend::{BackendError, BackendResult};

/// Hook a backend awaits before it touches its state.
///
/// Test harnesses install an implementation to reshuffle the order in which
/// concurrent operations reach the backend.
#[async_trait]
pub trait SchedulePerturbation: Send + Sync + Debug {
    /// Possibly suspend.
    ///
    /// # Errors
    /// Returns `BackendError::Cancelled` if the token fired before or during
    /// the wait.
    async fn perturb(&self, interruptor: &CancellationToken) -> BackendResult<()>;
}

/// Perturbation that never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl SchedulePerturbation for NoDelay {
    async fn perturb(&self, interruptor: &CancellationToken) -> BackendResult<()> {
        if interruptor.is_cancelled() {
            return Err(BackendError::Cancelled);
        }
        Ok(())
    }
}

/// Seeded random delay.
///
/// With `delay_probability` the operation sleeps for a duration drawn from
/// `[0, delay_ms_max)` milliseconds; otherwise it returns at once.
#[derive(Debug)]
pub struct RandomDelay {
    rng: Mutex<DeterministicRng>,
    probability: f64,
    delay_ms_max: u64,
}

impl RandomDelay {
    /// Create a delay drawing from the given RNG with the config's limits.
    #[must_use]
    pub fn new(config: SimConfig, rng: DeterministicRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            probability: config.delay_probability(),
            delay_ms_max: config.delay_ms_max(),
        }
    }

    /// Create a delay seeded from the config.
    #[must_use]
    pub fn from_config(config: SimConfig) -> Self {
        Self::new(config, DeterministicRng::new(config.seed()))
    }

    /// Roll the next delay in milliseconds. None means no wait.
    fn next_delay_ms(&self) -> Option<u64> {
        // A poisoned lock still holds a usable generator
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if rng.next_bool(self.probability) {
            Some(rng.next_below(self.delay_ms_max))
        } else {
            None
        }
    }
}

#[async_trait]
impl SchedulePerturbation for RandomDelay {
    async fn perturb(&self, interruptor: &CancellationToken) -> BackendResult<()> {
        if interruptor.is_cancelled() {
            return Err(BackendError::Cancelled);
        }

        let Some(delay_ms) = self.next_delay_ms() else {
            return Ok(());
        };
        tracing::trace!(delay_ms, "perturbing schedule");

        tokio::select! {
            biased;
            () = interruptor.cancelled() => Err(BackendError::Cancelled),
            () = tokio::time::sleep(Duration::from_millis(delay_ms)) => Ok(()),
        }
    }
}
