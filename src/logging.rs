//! Thin logging bootstrap: initializes `env_logger` once at process entry
//! and lets every subsystem log through the `log` facade from then on.
//!
//! The library crate itself never calls this; only binaries, benches and
//! tests that want readable output should. Embedding hosts are expected to
//! have already installed a `log` implementation of their own.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger, once per process.
///
/// Safe to call from multiple tests/benches concurrently; subsequent calls
/// are no-ops.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Info)
            .is_test(cfg!(test))
            .try_init();
    });
}
