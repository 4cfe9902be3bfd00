//! Shared helpers for integration tests.

#![allow(dead_code)]

use artable_core::Datum;
use serde_json::json;

/// Install a test-writer subscriber once; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seeds every seeded test runs under.
pub const TEST_SEEDS: [u64; 4] = [0, 42, 12_345, u64::MAX];

pub fn key(id: i64) -> Datum {
    Datum::from(id)
}

pub fn row(id: i64, x: &str) -> Datum {
    Datum::new(json!({"id": id, "x": x}))
}

/// Canonical strings of a key list, sorted for set comparison.
pub fn sorted_keys(keys: &[Datum]) -> Vec<String> {
    let mut printed: Vec<String> = keys.iter().map(Datum::print_primary).collect();
    printed.sort();
    printed
}
