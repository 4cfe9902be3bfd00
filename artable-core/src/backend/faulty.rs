//! `FaultyBackend` - Fault Injection Wrapper
//!
//! `TigerStyle`: Wraps any backend and fails operations on demand, so callers
//! can be tested against the failure channel of the contract.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::{BackendError, BackendResult};
use super::in_memory::InMemoryBackend;
use super::table::TableBackend;
use crate::datum::Datum;
use crate::dst::{
    DeterministicRng, FaultConfig, FaultInjector, FaultInjectorBuilder, RandomDelay, SimConfig,
};

/// Backend decorator that consults a shared `FaultInjector` before each
/// operation.
///
/// An injected fault is reported as `BackendError::Failed` and the inner
/// backend is not called, so state is unchanged. Cancellation takes priority
/// over faults.
#[derive(Debug, Clone)]
pub struct FaultyBackend<B> {
    inner: B,
    faults: Arc<FaultInjector>,
}

impl FaultyBackend<InMemoryBackend> {
    /// Create an in-memory backend with random delays and injected faults,
    /// both replaying from the config's seed.
    ///
    /// The delay hook and the fault injector draw from separate forks of one
    /// root RNG, so adding a fault does not shift the delay schedule.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn simulated(config: SimConfig, faults: impl IntoIterator<Item = FaultConfig>) -> Self {
        let mut rng = DeterministicRng::new(config.seed());
        let delay = RandomDelay::new(config, rng.fork());
        let injector = faults
            .into_iter()
            .fold(FaultInjectorBuilder::new(rng.fork()), FaultInjectorBuilder::with_fault)
            .build();

        Self::new(
            InMemoryBackend::with_perturbation(Arc::new(delay)),
            Arc::new(injector),
        )
    }
}

impl<B: TableBackend> FaultyBackend<B> {
    /// Wrap a backend.
    #[must_use]
    pub fn new(inner: B, faults: Arc<FaultInjector>) -> Self {
        Self { inner, faults }
    }

    /// Get the wrapped backend.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Get the fault injector for inspection.
    #[must_use]
    pub fn fault_injector(&self) -> &Arc<FaultInjector> {
        &self.faults
    }

    fn maybe_inject_fault(
        &self,
        operation: &str,
        interruptor: &CancellationToken,
    ) -> BackendResult<()> {
        if interruptor.is_cancelled() {
            return Err(BackendError::Cancelled);
        }
        match self.faults.should_inject(operation) {
            Some(fault_type) => Err(BackendError::failed(format!(
                "simulated fault: {} during {operation}",
                fault_type.as_str()
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<B: TableBackend> TableBackend for FaultyBackend<B> {
    fn primary_key_name(&self) -> &str {
        self.inner.primary_key_name()
    }

    async fn read_all_primary_keys(
        &self,
        interruptor: &CancellationToken,
    ) -> BackendResult<Vec<Datum>> {
        self.maybe_inject_fault("read_all_primary_keys", interruptor)?;
        self.inner.read_all_primary_keys(interruptor).await
    }

    async fn read_row(
        &self,
        primary_key: &Datum,
        interruptor: &CancellationToken,
    ) -> BackendResult<Option<Datum>> {
        self.maybe_inject_fault("read_row", interruptor)?;
        self.inner.read_row(primary_key, interruptor).await
    }

    async fn write_row(
        &self,
        primary_key: &Datum,
        new_value: Option<Datum>,
        interruptor: &CancellationToken,
    ) -> BackendResult<()> {
        self.maybe_inject_fault("write_row", interruptor)?;
        self.inner.write_row(primary_key, new_value, interruptor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dst::FaultType;
    use serde_json::json;

    fn injector(configs: &[FaultConfig]) -> Arc<FaultInjector> {
        let builder = configs.iter().cloned().fold(
            FaultInjectorBuilder::new(DeterministicRng::new(42)),
            FaultInjectorBuilder::with_fault,
        );
        Arc::new(builder.build())
    }

    #[tokio::test]
    async fn test_no_faults_passes_through() {
        let backend = FaultyBackend::new(InMemoryBackend::without_perturbation(), injector(&[]));
        let token = CancellationToken::new();
        let row = Datum::new(json!({"id": 1}));

        backend
            .write_row(&Datum::from(1), Some(row.clone()), &token)
            .await
            .unwrap();
        assert_eq!(
            backend.read_row(&Datum::from(1), &token).await.unwrap(),
            Some(row)
        );
        assert_eq!(backend.primary_key_name(), "id");
    }

    #[tokio::test]
    async fn test_write_fault_leaves_state_unchanged() {
        let backend = FaultyBackend::new(
            InMemoryBackend::without_perturbation(),
            injector(&[FaultConfig::new(FaultType::BackendWriteFail, 1.0)]),
        );
        let token = CancellationToken::new();

        let outcome = backend
            .write_row(&Datum::from(1), Some(Datum::new(json!({"id": 1}))), &token)
            .await;
        assert!(matches!(outcome, Err(BackendError::Failed { .. })));

        // Reads are unaffected and see no row
        assert_eq!(backend.read_row(&Datum::from(1), &token).await.unwrap(), None);
        assert_eq!(backend.fault_injector().total_injections(), 1);
    }

    #[tokio::test]
    async fn test_scan_fault() {
        let backend = FaultyBackend::new(
            InMemoryBackend::without_perturbation(),
            injector(&[FaultConfig::new(FaultType::BackendScanFail, 1.0)]),
        );
        let outcome = backend
            .read_all_primary_keys(&CancellationToken::new())
            .await;
        assert!(outcome.unwrap_err().is_failure());
    }

    #[tokio::test]
    async fn test_cancellation_beats_fault() {
        let backend = FaultyBackend::new(
            InMemoryBackend::without_perturbation(),
            injector(&[FaultConfig::new(FaultType::BackendReadFail, 1.0)]),
        );
        let token = CancellationToken::new();
        token.cancel();

        let outcome = backend.read_row(&Datum::from(1), &token).await;
        assert_eq!(outcome, Err(BackendError::Cancelled));
        assert_eq!(backend.fault_injector().total_injections(), 0);
    }
}
