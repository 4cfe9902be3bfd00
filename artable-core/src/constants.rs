//! TigerStyle Constants
//!
//! All limits use big-endian naming: CATEGORY_SPECIFICS_UNIT_LIMIT
//! Example: DST_DELAY_MS_MAX (not MAX_DELAY_MS)
//!
//! Every constant includes units in the name:
//! - _MS for milliseconds
//! - _COUNT_MAX for quantity limits

// =============================================================================
// Table Backend
// =============================================================================

/// Name of the field that holds a row's own primary key.
pub const PRIMARY_KEY_FIELD: &str = "id";

/// Maximum number of requests queued for a backend's home task
pub const BACKEND_REQUEST_QUEUE_COUNT_MAX: usize = 1024;

// =============================================================================
// DST (Deterministic Simulation Testing) Limits
// =============================================================================

/// Maximum probability for fault injection (1.0 = 100%)
pub const DST_FAULT_PROBABILITY_MAX: f64 = 1.0;

/// Default probability that an operation is delayed before it runs
pub const DST_DELAY_PROBABILITY_DEFAULT: f64 = 0.5;

/// Default exclusive upper bound of a scheduling delay in milliseconds
pub const DST_DELAY_MS_DEFAULT: u64 = 100;

/// Maximum exclusive upper bound of a scheduling delay in milliseconds
pub const DST_DELAY_MS_MAX: u64 = 10_000; // 10 seconds
