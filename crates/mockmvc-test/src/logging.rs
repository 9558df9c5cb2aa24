//! Tracing subscriber initialisation for test suites.
//!
//! The core and adapter crates only *emit* spans and events; installing a
//! subscriber is left to the test suite, through [`init_logging`] or
//! [`init_test_logging`].
//!
//! `RUST_LOG` overrides the level passed in if set.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events the default filter enables.
const CRATES: [&str; 3] = ["mockmvc_core", "mockmvc_adapters", "mockmvc_test"];

/// Initialise the global tracing subscriber at `level`.
///
/// Output goes through the test writer so `cargo test` captures it per test.
/// Returns an error if a subscriber is already installed in this process.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(filter_directives(level)))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_test_writer();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// Install debug-level logging once per process; later calls do nothing.
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // Another subscriber may already be installed; that one wins.
        let _ = init_logging("debug");
    });
}

/// Filter string giving each mockmvc crate the same level.
fn filter_directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_crate() {
        assert_eq!(
            filter_directives("info"),
            "mockmvc_core=info,mockmvc_adapters=info,mockmvc_test=info"
        );
    }

    #[test]
    fn test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
    }
}
