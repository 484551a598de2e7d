//! Process-wide tracing setup.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Initialize the global subscriber. Safe to call more than once; later
/// calls are no-ops.
///
/// Logs go to stderr so extraction output piped on stdout stays clean.
/// Under a test harness the subscriber captures output per test instead.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let default_level = if is_test {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        let filter = EnvFilter::from_default_env().add_directive(default_level.into());

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .compact();

        if is_test {
            builder.with_test_writer().finish().set_default();
        } else if let Err(e) = builder.with_writer(std::io::stderr).try_init() {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
