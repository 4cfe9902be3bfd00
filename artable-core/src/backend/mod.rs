//! Backend - Table Backend Trait and Implementations
//!
//! TigerStyle: Abstract row storage with simulation-first testing.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │               TableBackend Trait               │
//! └───────────────────────────────────────────────┘
//!          ↑                          ↑
//!          │                          │
//! ┌────────┴────────┐       ┌─────────┴────────┐
//! │ InMemoryBackend │       │ FaultyBackend<B> │
//! │  (reference)    │       │  (wraps any B)   │
//! └─────────────────┘       └──────────────────┘
//! ```

mod error;
mod faulty;
mod in_memory;
mod table;

pub use error::{BackendError, BackendResult};
pub use faulty::FaultyBackend;
pub use in_memory::InMemoryBackend;
pub use table::TableBackend;
