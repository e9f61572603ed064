//! fxsignal command-line interface
//!
//! Reads a daily OHLC CSV, runs the indicator analysis and prints a report,
//! the signal, or the processed data. Diagnostics go to stderr through
//! `tracing`; set `RUST_LOG` (default `warn`) to see more.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use fxsignal_cli::args::Args;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse_args();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match fxsignal_cli::run(&args, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}
