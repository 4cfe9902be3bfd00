//! Artable Core - Table Backends with DST
//!
//! TigerStyle simulation-first table backends inspired by TigerBeetle/FoundationDB.
//!
//! A table backend is the storage contract behind a query table: list keys,
//! read a row, write or delete a row. The layer above cannot tell whether rows
//! are stored, synthesized, or held in memory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Query-table adapter (caller)       │
//! ├─────────────────────────────────────────────┤
//! │  TableBackend trait     │ cancellable ops    │
//! │  InMemoryBackend        │ home-task map      │
//! │  FaultyBackend          │ injected failures  │
//! ├─────────────────────────────────────────────┤
//! │  DST hooks              │ seeded delays      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use artable_core::{Datum, InMemoryBackend, SimConfig, TableBackend};
//! use serde_json::json;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = InMemoryBackend::new(SimConfig::with_seed(42));
//! let token = CancellationToken::new();
//!
//! let row = Datum::new(json!({"id": 1, "x": "a"}));
//! backend.write_row(&Datum::from(1), Some(row.clone()), &token).await.unwrap();
//! assert_eq!(backend.read_row(&Datum::from(1), &token).await.unwrap(), Some(row));
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod constants;
pub mod datum;
pub mod dst;

// Re-export common types
pub use backend::{BackendError, BackendResult, FaultyBackend, InMemoryBackend, TableBackend};
pub use constants::*;
pub use datum::Datum;
pub use dst::{
    DeterministicRng, FaultConfig, FaultInjector, FaultInjectorBuilder, FaultType, NoDelay,
    RandomDelay, SchedulePerturbation, SimConfig,
};
