pub mod builders;

use std::sync::Once;

use chrono::NaiveDate;
use taskshift::logging::LOG_ENV;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Route `tracing` output into the test harness's captured writer.
///
/// Reads the same `TASKSHIFT_LOG` variable as the binary, e.g.
/// `TASKSHIFT_LOG=taskshift=debug cargo test -- --nocapture`.
/// Defaults to `warn` so cycle and dangling-reference warnings show up
/// next to failing assertions.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .init();
    });
}

/// Parse a `YYYY-MM-DD` literal, panicking on bad input.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|e| panic!("bad test date {s:?}: {e}"))
}
