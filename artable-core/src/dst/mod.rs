//! DST - Deterministic Simulation Testing hooks
//!
//! Seeded randomness for backends under test: scheduling perturbation that
//! reshuffles concurrent callers, and fault injection that drives the failure
//! channel of the backend contract.
//!
//! # Usage
//!
//! ```rust,no_run
//! use artable_core::backend::{InMemoryBackend, TableBackend};
//! use artable_core::dst::SimConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() {
//! let backend = InMemoryBackend::new(SimConfig::with_seed(42));
//! let keys = backend
//!     .read_all_primary_keys(&CancellationToken::new())
//!     .await
//!     .unwrap();
//! assert!(keys.is_empty());
//! # }
//! ```
//!
//! Run with explicit seed for reproducibility:
//! ```bash
//! DST_SEED=12345 cargo test
//! ```

mod config;
mod delay;
mod fault;
mod rng;

pub use config::{SimConfig, DST_SEED_ENV};
pub use delay::{NoDelay, RandomDelay, SchedulePerturbation};
pub use fault::{FaultConfig, FaultInjector, FaultInjectorBuilder, FaultType};
pub use rng::DeterministicRng;
