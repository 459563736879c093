//! Tracing setup for the lift binary and the core tests.
//!
//! Planner decisions (exercise picks, progression branches, phase moves) are
//! logged at debug; skipped session lines and ignored ratings at warn.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Warnings only, so the printed plan stays readable
///
/// RUST_LOG still wins, e.g. `RUST_LOG=lift_core::selection=debug` to see
/// why each exercise was picked without the progression noise.
pub fn init() {
    init_with_level("warn")
}

/// Compact stderr logging at `default_level` unless RUST_LOG is set
///
/// `lift -v` passes "debug" here. Calling it twice is harmless.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("lift_core=debug"))
        .try_init();
}
