//! Shared helpers for forkseed's integration tests: a scriptable
//! [`fake_executor::FakeExecutor`], job/config builders and test logging.

pub mod builders;
pub mod fake_executor;

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness.
///
/// Honours `FORKSEED_LOG` like the binary does (e.g.
/// `FORKSEED_LOG=forkseed=debug cargo test -- --nocapture`) and falls back to
/// `info`. Output of passing tests stays captured.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_env("FORKSEED_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
