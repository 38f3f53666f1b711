//! Entry point for the `hop` command.
#![forbid(unsafe_code)]

use hop_cli::CliError;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

fn main() {
    init_logging();
    match hop_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    }
}

/// Install a stderr formatter that also receives `log` records.
///
/// `RUST_LOG` overrides the default `info` filter.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(err) = installed {
        report(&*err);
    }
}

#[expect(
    clippy::print_stderr,
    reason = "fatal errors are reported to the operator before exiting"
)]
fn report(err: &dyn std::error::Error) {
    eprintln!("hop: {err}");
}
