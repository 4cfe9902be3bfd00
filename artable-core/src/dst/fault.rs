//! FaultInjector - Probabilistic Fault Injection
//!
//! TigerStyle: Explicit fault injection for exercising a caller's failure
//! handling against a backend that would otherwise always succeed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::rng::DeterministicRng;
use crate::constants::DST_FAULT_PROBABILITY_MAX;

/// Types of faults that can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultType {
    /// Listing primary keys fails
    BackendScanFail,
    /// Reading a row fails
    BackendReadFail,
    /// Writing or deleting a row fails
    BackendWriteFail,
}

impl FaultType {
    /// Get the fault type name as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BackendScanFail => "backend_scan_fail",
            Self::BackendReadFail => "backend_read_fail",
            Self::BackendWriteFail => "backend_write_fail",
        }
    }

    /// Operation name this fault applies to by default.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::BackendScanFail => "read_all_primary_keys",
            Self::BackendReadFail => "read_row",
            Self::BackendWriteFail => "write_row",
        }
    }
}

/// Configuration for a specific fault.
#[derive(Debug, Clone)]
pub struct FaultConfig {
    /// The type of fault
    pub fault_type: FaultType,
    /// Probability of injection (0.0 to 1.0)
    pub probability: f64,
    /// Operation filter (substring match); defaults to the fault's own operation
    pub operation_filter: Option<String>,
    /// Maximum number of injections (None = unlimited)
    pub max_injections: Option<u64>,
}

impl FaultConfig {
    /// Create a new fault configuration scoped to the fault's operation.
    ///
    /// # Panics
    /// Panics if probability is not in [0, 1].
    #[must_use]
    pub fn new(fault_type: FaultType, probability: f64) -> Self {
        // Precondition
        assert!(
            (0.0..=DST_FAULT_PROBABILITY_MAX).contains(&probability),
            "probability must be in [0, {DST_FAULT_PROBABILITY_MAX}], got {probability}"
        );

        Self {
            fault_type,
            probability,
            operation_filter: Some(fault_type.operation().to_string()),
            max_injections: None,
        }
    }

    /// Override the operation filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.operation_filter = Some(filter.into());
        self
    }

    /// Apply to every operation.
    #[must_use]
    pub fn for_any_operation(mut self) -> Self {
        self.operation_filter = None;
        self
    }

    /// Set maximum number of injections.
    ///
    /// # Panics
    /// Panics if max is zero.
    #[must_use]
    pub fn with_max_injections(mut self, max: u64) -> Self {
        // Precondition
        assert!(max > 0, "max_injections must be positive");
        self.max_injections = Some(max);
        self
    }
}

/// Fault injector shared by wrapped backends.
///
/// Interior mutability lets one injector sit behind an `Arc` and serve
/// several callers; registration happens through the builder before sharing.
#[derive(Debug)]
pub struct FaultInjector {
    rng: Mutex<DeterministicRng>,
    configs: Vec<FaultConfig>,
    injection_counts: HashMap<FaultType, AtomicU64>,
}

impl FaultInjector {
    /// Create a fault injector with no registered faults.
    #[must_use]
    pub fn new(rng: DeterministicRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            configs: Vec::new(),
            injection_counts: HashMap::new(),
        }
    }

    /// Register a fault configuration.
    pub fn register(&mut self, config: FaultConfig) {
        self.injection_counts
            .entry(config.fault_type)
            .or_insert_with(|| AtomicU64::new(0));
        self.configs.push(config);
    }

    /// Check if a fault should be injected for the given operation.
    ///
    /// Returns the fault type if one should be injected, None otherwise.
    /// The cap check, the roll and the count update happen under one lock, so
    /// concurrent callers never exceed `max_injections`.
    pub fn should_inject(&self, operation: &str) -> Option<FaultType> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        for config in &self.configs {
            if let Some(ref filter) = config.operation_filter {
                if !operation.contains(filter.as_str()) {
                    continue;
                }
            }

            let count = &self.injection_counts[&config.fault_type];
            if let Some(max) = config.max_injections {
                if count.load(Ordering::Relaxed) >= max {
                    continue;
                }
            }

            if rng.next_bool(config.probability) {
                count.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(fault = config.fault_type.as_str(), operation, "injecting fault");
                return Some(config.fault_type);
            }
        }

        None
    }

    /// Get injection counts keyed by fault name.
    #[must_use]
    pub fn injection_stats(&self) -> HashMap<String, u64> {
        self.injection_counts
            .iter()
            .map(|(fault_type, count)| {
                (
                    fault_type.as_str().to_string(),
                    count.load(Ordering::Relaxed),
                )
            })
            .collect()
    }

    /// Get total number of injections.
    #[must_use]
    pub fn total_injections(&self) -> u64 {
        self.injection_counts
            .values()
            .map(|count| count.load(Ordering::Relaxed))
            .sum()
    }

    /// Reset all statistics, re-arming capped faults.
    pub fn reset_stats(&self) {
        let _rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        for count in self.injection_counts.values() {
            count.store(0, Ordering::Relaxed);
        }
    }
}

/// Builder for `FaultInjector`.
#[derive(Debug)]
pub struct FaultInjectorBuilder {
    rng: DeterministicRng,
    configs: Vec<FaultConfig>,
}

impl FaultInjectorBuilder {
    /// Create a new builder with the given RNG.
    #[must_use]
    pub fn new(rng: DeterministicRng) -> Self {
        Self {
            rng,
            configs: Vec::new(),
        }
    }

    /// Add a fault configuration.
    #[must_use]
    pub fn with_fault(mut self, config: FaultConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Add read, scan and write faults at the same probability.
    #[must_use]
    pub fn with_backend_faults(self, probability: f64) -> Self {
        self.with_fault(FaultConfig::new(FaultType::BackendScanFail, probability))
            .with_fault(FaultConfig::new(FaultType::BackendReadFail, probability))
            .with_fault(FaultConfig::new(FaultType::BackendWriteFail, probability))
    }

    /// Build the `FaultInjector`.
    #[must_use]
    pub fn build(self) -> FaultInjector {
        let mut injector = FaultInjector::new(self.rng);
        for config in self.configs {
            injector.register(config);
        }
        injector
    }
}
