//! Test logging setup
//!
//! Opt-in via `RUST_LOG`, e.g. `RUST_LOG=atrium_identity=debug cargo test`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a fmt subscriber for the current test binary, once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
