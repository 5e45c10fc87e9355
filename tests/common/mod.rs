//! Shared test utilities: tracing setup and tree-shape helpers.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//!
//! #[test]
//! fn my_test() {
//!     common::init_tracing();
//!     // ... test code
//! }
//! ```
//!
//! Set `RUST_LOG` to choose what is printed, for example
//! `RUST_LOG=rbtree_frames=trace cargo test --features tracing` to see every
//! fixup case and rotation.

#![allow(dead_code)]

use std::sync::Once;

use rbtree_frames::{Color, NodeRef};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Ensures tracing is only initialized once across all tests.
static INIT: Once = Once::new();

/// Installs a console subscriber filtered by `RUST_LOG` (default `WARN`).
///
/// Safe to call multiple times - only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .compact()
            .try_init();
    });
}

/// Returns `(value, color)` of a node, or `None` for the sentinel.
pub fn shape<T: Copy>(node: NodeRef<'_, T>) -> Option<(T, Color)> {
    node.value().map(|value| (*value, node.color()))
}

/// Deterministic pseudo-random values (64-bit LCG), for repeatable tests.
pub fn lcg_values(n: usize, seed: u64) -> Vec<i64> {
    let mut values = Vec::with_capacity(n);
    let mut x = seed;
    for _ in 0..n {
        x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        values.push((x >> 33) as i64);
    }
    values
}

/// Red-black height bound for `n` values: `2 * log2(n + 1)`.
pub fn height_bound(n: usize) -> f64 {
    2.0 * ((n + 1) as f64).log2()
}
