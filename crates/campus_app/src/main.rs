mod platform;

use platform::logging::{self, LogDestination};

fn main() {
    logging::initialize(LogDestination::Both);
    // Failures are caught and logged here; the process still exits 0.
    if let Err(err) = platform::run_app() {
        campus_logging::campus_error!("fatal: {err:#}");
    }
}
