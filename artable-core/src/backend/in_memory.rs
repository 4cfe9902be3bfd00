//! `InMemoryBackend` - Reference Backend for Testing
//!
//! `TigerStyle`: Accepts every read and write and keeps rows in a map. Used as
//! a test double for query-table adapters.
//!
//! # Home task
//!
//! The row map lives inside one spawned task. Every operation hands a request
//! to that task over a bounded channel and waits for the reply, so all
//! operations are totally ordered and no caller ever sees a half-applied
//! write. The map is dropped when the last handle is dropped.
//!
//! # Perturbation
//!
//! Before the hand-off each operation awaits a `SchedulePerturbation`. The
//! default is a seeded `RandomDelay`, which reshuffles concurrent callers to
//! flush out ordering bugs in the layer above.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::error::{BackendError, BackendResult};
use super::table::TableBackend;
use crate::constants::{BACKEND_REQUEST_QUEUE_COUNT_MAX, PRIMARY_KEY_FIELD};
use crate::datum::Datum;
use crate::dst::{NoDelay, RandomDelay, SchedulePerturbation, SimConfig};

// =============================================================================
// Home task
// =============================================================================

/// A request executed on the home task.
///
/// Each carries the caller's token; the home task drops requests whose token
/// fired while they were queued.
#[derive(Debug)]
enum Request {
    Snapshot {
        interruptor: CancellationToken,
        reply: oneshot::Sender<BackendResult<Vec<Datum>>>,
    },
    Read {
        key: String,
        interruptor: CancellationToken,
        reply: oneshot::Sender<BackendResult<Option<Datum>>>,
    },
    Write {
        key: String,
        new_value: Option<Datum>,
        interruptor: CancellationToken,
        reply: oneshot::Sender<BackendResult<()>>,
    },
}

/// Row map owned by the home task, keyed by canonical primary-key string.
#[derive(Debug, Default)]
struct HomeTable {
    rows: BTreeMap<String, Datum>,
}

impl HomeTable {
    /// Execute one request. Never suspends.
    ///
    /// A reply that cannot be delivered means the caller went away; the
    /// request still counts as executed.
    fn apply(&mut self, request: Request) {
        match request {
            Request::Snapshot { interruptor, reply } => {
                let outcome = Self::unless_cancelled(&interruptor, || {
                    self.rows.values().cloned().collect()
                });
                let _ = reply.send(outcome);
            }
            Request::Read {
                key,
                interruptor,
                reply,
            } => {
                let outcome =
                    Self::unless_cancelled(&interruptor, || self.rows.get(&key).cloned());
                let _ = reply.send(outcome);
            }
            Request::Write {
                key,
                new_value,
                interruptor,
                reply,
            } => {
                let outcome = Self::unless_cancelled(&interruptor, || match new_value {
                    Some(row) => {
                        self.rows.insert(key, row);
                    }
                    None => {
                        self.rows.remove(&key);
                    }
                });
                let _ = reply.send(outcome);
            }
        }
    }

    fn unless_cancelled<T>(
        interruptor: &CancellationToken,
        op: impl FnOnce() -> T,
    ) -> BackendResult<T> {
        if interruptor.is_cancelled() {
            tracing::trace!("dropping request cancelled while queued");
            Err(BackendError::Cancelled)
        } else {
            Ok(op())
        }
    }
}

async fn run_home(mut requests: mpsc::Receiver<Request>) {
    let mut table = HomeTable::default();
    while let Some(request) = requests.recv().await {
        table.apply(request);
    }
    tracing::debug!(rows_count = table.rows.len(), "all handles dropped, discarding table");
}

// =============================================================================
// InMemoryBackend
// =============================================================================

/// In-memory table backend for testing.
///
/// `TigerStyle`:
/// - Deterministic delays via `SimConfig` seed
/// - Single home task owns the map
/// - Cheap to clone; clones share the same table
#[derive(Clone)]
pub struct InMemoryBackend {
    requests: mpsc::Sender<Request>,
    perturbation: Arc<dyn SchedulePerturbation>,
}

impl InMemoryBackend {
    /// Create an empty backend with seeded random delays.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        tracing::debug!(seed = config.seed(), "creating in-memory backend");
        Self::with_perturbation(Arc::new(RandomDelay::from_config(config)))
    }

    /// Create an empty backend that never delays.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn without_perturbation() -> Self {
        Self::with_perturbation(Arc::new(NoDelay))
    }

    /// Create an empty backend with a custom perturbation hook.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn with_perturbation(perturbation: Arc<dyn SchedulePerturbation>) -> Self {
        let (requests, inbox) = mpsc::channel(BACKEND_REQUEST_QUEUE_COUNT_MAX);
        tokio::spawn(run_home(inbox).instrument(tracing::debug_span!("in_memory_home")));
        Self::from_parts(requests, perturbation)
    }

    fn from_parts(
        requests: mpsc::Sender<Request>,
        perturbation: Arc<dyn SchedulePerturbation>,
    ) -> Self {
        Self {
            requests,
            perturbation,
        }
    }

    /// Hand a request to the home task.
    ///
    /// Waiting for queue space is a cancellable suspension point. Once the
    /// request is queued, cancellation is decided by the home task.
    async fn hand_off(&self, request: Request, interruptor: &CancellationToken) -> BackendResult<()> {
        tokio::select! {
            biased;
            () = interruptor.cancelled() => Err(BackendError::Cancelled),
            sent = self.requests.send(request) => {
                sent.map_err(|_| BackendError::failed("in-memory backend home task has stopped"))
            }
        }
    }

    /// Wait for the home task's verdict.
    ///
    /// Not raced against the token: the home task applies a request without
    /// suspending, and the caller must learn whether it took effect.
    async fn await_reply<T>(reply: oneshot::Receiver<BackendResult<T>>) -> BackendResult<T> {
        reply
            .await
            .map_err(|_| BackendError::failed("in-memory backend home task dropped the request"))?
    }
}

impl fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("perturbation", &self.perturbation)
            .field("home_closed", &self.requests.is_closed())
            .finish()
    }
}

#[async_trait]
impl TableBackend for InMemoryBackend {
    fn primary_key_name(&self) -> &str {
        PRIMARY_KEY_FIELD
    }

    #[tracing::instrument(skip(self, interruptor))]
    async fn read_all_primary_keys(
        &self,
        interruptor: &CancellationToken,
    ) -> BackendResult<Vec<Datum>> {
        self.perturbation.perturb(interruptor).await?;

        let (reply, outcome) = oneshot::channel();
        self.hand_off(
            Request::Snapshot {
                interruptor: interruptor.clone(),
                reply,
            },
            interruptor,
        )
        .await?;
        let rows = Self::await_reply(outcome).await?;

        // A row without its key means an earlier writer broke the table
        let keys = rows
            .iter()
            .map(|row| {
                row.get_field(PRIMARY_KEY_FIELD).unwrap_or_else(|| {
                    panic!("stored row is missing its `{PRIMARY_KEY_FIELD}` field: {row}")
                })
            })
            .collect();
        Ok(keys)
    }

    #[tracing::instrument(skip(self, primary_key, interruptor), fields(key = %primary_key))]
    async fn read_row(
        &self,
        primary_key: &Datum,
        interruptor: &CancellationToken,
    ) -> BackendResult<Option<Datum>> {
        self.perturbation.perturb(interruptor).await?;

        let (reply, outcome) = oneshot::channel();
        self.hand_off(
            Request::Read {
                key: primary_key.print_primary(),
                interruptor: interruptor.clone(),
                reply,
            },
            interruptor,
        )
        .await?;
        Self::await_reply(outcome).await
    }

    #[tracing::instrument(
        skip(self, primary_key, new_value, interruptor),
        fields(key = %primary_key, delete = new_value.is_none())
    )]
    async fn write_row(
        &self,
        primary_key: &Datum,
        new_value: Option<Datum>,
        interruptor: &CancellationToken,
    ) -> BackendResult<()> {
        self.perturbation.perturb(interruptor).await?;

        let (reply, outcome) = oneshot::channel();
        self.hand_off(
            Request::Write {
                key: primary_key.print_primary(),
                new_value,
                interruptor: interruptor.clone(),
                reply,
            },
            interruptor,
        )
        .await?;
        Self::await_reply(outcome).await
    }
}
