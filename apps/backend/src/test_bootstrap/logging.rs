#![cfg(test)]

//! Unit-test logging initialization.
//!
//! Integration test binaries use `backend-test-support`; this module
//! covers `#[cfg(test)]` modules inside the crate with the same
//! behavior: idempotent init, `TEST_LOG`/`RUST_LOG` filter, quiet by
//! default.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
