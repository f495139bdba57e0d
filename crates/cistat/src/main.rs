//! cistat CLI Application
//!
//! Runs one CI task command and reports its commit status.

// Panic and startup failures are reported before tracing exists
#![allow(clippy::print_stderr)]

use cistat::cli::{self, exit_code_for, render_error};
use cistat::tracing::{self, TracingConfig};

/// Exit code when the runtime or logging cannot be set up
const EXIT_STARTUP: i32 = 4;

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
    };
    if let Err(e) = tracing::init_tracing(tracing_config) {
        eprintln!("Fatal error: {e}");
        std::process::exit(EXIT_STARTUP);
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            std::process::exit(EXIT_STARTUP);
        }
    };

    let exit_code = match rt.block_on(cistat::execute(&cli)) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            render_error(&err);
            exit_code_for(&err)
        }
    };
    drop(rt);
    std::process::exit(exit_code);
}
