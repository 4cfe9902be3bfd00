//! DST Tests for Fault Injection
//!
//! `FaultyBackend` drives the failure channel that the in-memory backend
//! never uses on its own.

mod common;

use std::sync::Arc;

use artable_core::{
    BackendError, DeterministicRng, FaultConfig, FaultInjectorBuilder, FaultType, FaultyBackend,
    InMemoryBackend, SimConfig, TableBackend,
};
use common::{init_tracing, key, row, sorted_keys, TEST_SEEDS};
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn test_failed_writes_never_land() {
    init_tracing();
    for seed in TEST_SEEDS {
        let backend = FaultyBackend::simulated(
            SimConfig::with_seed(seed),
            [FaultConfig::new(FaultType::BackendWriteFail, 0.5)],
        );
        let faults = Arc::clone(backend.fault_injector());
        let token = CancellationToken::new();
        let mut landed = Vec::new();

        for id in 0..40 {
            match backend.write_row(&key(id), Some(row(id, "v")), &token).await {
                Ok(()) => landed.push(key(id)),
                Err(err) => assert!(err.is_failure(), "seed {seed}: {err}"),
            }
        }

        let keys = backend.read_all_primary_keys(&token).await.unwrap();
        assert_eq!(sorted_keys(&keys), sorted_keys(&landed), "seed {seed}");
        assert_eq!(
            faults.total_injections(),
            40 - landed.len() as u64,
            "seed {seed}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_read_faults_are_transient() {
    let faults = Arc::new(
        FaultInjectorBuilder::new(DeterministicRng::new(42))
            .with_fault(FaultConfig::new(FaultType::BackendReadFail, 1.0).with_max_injections(2))
            .build(),
    );
    let backend = FaultyBackend::new(InMemoryBackend::new(SimConfig::with_seed(42)), faults);
    let token = CancellationToken::new();

    backend.write_row(&key(1), Some(row(1, "a")), &token).await.unwrap();

    assert!(matches!(
        backend.read_row(&key(1), &token).await,
        Err(BackendError::Failed { .. })
    ));
    assert!(matches!(
        backend.read_row(&key(1), &token).await,
        Err(BackendError::Failed { .. })
    ));
    assert_eq!(
        backend.read_row(&key(1), &token).await.unwrap(),
        Some(row(1, "a"))
    );
}

/// Same seed, same delays and same faults: the final table replays exactly.
#[tokio::test(start_paused = true)]
async fn test_simulated_backend_replays_from_seed() {
    async fn run(seed: u64) -> (Vec<bool>, Vec<String>) {
        let backend = FaultyBackend::simulated(
            SimConfig::with_seed(seed),
            [
                FaultConfig::new(FaultType::BackendWriteFail, 0.3),
                FaultConfig::new(FaultType::BackendReadFail, 0.3),
            ],
        );
        let token = CancellationToken::new();
        let mut outcomes = Vec::new();
        for id in 0..30 {
            outcomes.push(backend.write_row(&key(id), Some(row(id, "v")), &token).await.is_ok());
            outcomes.push(backend.read_row(&key(id), &token).await.is_ok());
        }
        let keys = backend.inner().read_all_primary_keys(&token).await.unwrap();
        (outcomes, sorted_keys(&keys))
    }

    let first = run(11).await;
    assert_eq!(first, run(11).await);
    assert!(first.0.iter().any(|ok| !ok), "some operation should have faulted");
}

#[tokio::test(start_paused = true)]
async fn test_same_seed_same_faults() {
    async fn fault_pattern(seed: u64) -> Vec<bool> {
        let faults = Arc::new(
            FaultInjectorBuilder::new(DeterministicRng::new(seed))
                .with_backend_faults(0.5)
                .build(),
        );
        let backend = FaultyBackend::new(InMemoryBackend::without_perturbation(), faults);
        let token = CancellationToken::new();
        let mut pattern = Vec::new();
        for id in 0..30 {
            pattern.push(backend.read_row(&key(id), &token).await.is_err());
        }
        pattern
    }

    assert_eq!(fault_pattern(9).await, fault_pattern(9).await);
}
