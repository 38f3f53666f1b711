//! Error types emitted by the hop CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use hop_data::ClientBuildError;
use hop_scheduler::ScheduleError;
use thiserror::Error;

/// Errors emitted by the hop CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A service client could not be constructed.
    #[error("failed to build {service} client: {source}")]
    BuildClient {
        /// Service the client talks to.
        service: &'static str,
        /// Construction failure.
        #[source]
        source: ClientBuildError,
    },
    /// The scheduling run failed.
    #[error("scheduling run failed: {0}")]
    Schedule(#[source] ScheduleError),
    /// Writing the run outcome failed.
    #[error("failed to write run outcome: {0}")]
    WriteOutcome(#[source] std::io::Error),
}
