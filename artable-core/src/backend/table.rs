//! Table Backend Trait
//!
//! TigerStyle: Abstract interface for row storage behind a query table.
//!
//! # Contract
//!
//! - Every suspending operation checks its cancellation token before it
//!   starts and races the token at every suspension point.
//! - A cancelled operation leaves backend state unchanged and reports
//!   `BackendError::Cancelled`.
//! - Implementations are safe to call from many tasks at once.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::BackendResult;
use crate::datum::Datum;

/// Storage contract consumed by a query-table adapter.
///
/// The backend may store, synthesize, or hold rows in memory; callers cannot
/// tell which.
#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Name of the field every row uses for its primary key.
    fn primary_key_name(&self) -> &str;

    /// List the primary key of every row.
    ///
    /// Order is implementation-defined but stable for one snapshot.
    async fn read_all_primary_keys(
        &self,
        interruptor: &CancellationToken,
    ) -> BackendResult<Vec<Datum>>;

    /// Read one row.
    ///
    /// Returns None if no row has this key.
    async fn read_row(
        &self,
        primary_key: &Datum,
        interruptor: &CancellationToken,
    ) -> BackendResult<Option<Datum>>;

    /// Insert, overwrite (`Some`) or delete (`None`) one row.
    ///
    /// Deleting a missing row succeeds.
    async fn write_row(
        &self,
        primary_key: &Datum,
        new_value: Option<Datum>,
        interruptor: &CancellationToken,
    ) -> BackendResult<()>;
}
