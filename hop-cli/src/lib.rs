//! Command-line interface for triggering delivery scheduling runs.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod schedule;

pub use error::CliError;

use schedule::ScheduleArgs;

pub(crate) const ARG_DATE: &str = "date";
pub(crate) const ARG_CREDENTIAL: &str = "credential";
pub(crate) const ARG_GEOCODING_KEY: &str = "geocoding-key";
pub(crate) const ARG_ROUTING_KEY: &str = "routing-key";
pub(crate) const ARG_GEOCODING_URL: &str = "geocoding-url";
pub(crate) const ARG_ROUTING_URL: &str = "routing-url";
pub(crate) const ARG_STORE_URL: &str = "store-url";
pub(crate) const ARG_RIDER_SCHEMA: &str = "rider-schema";
pub(crate) const ARG_SHIPMENT_SCHEMA: &str = "shipment-schema";
pub(crate) const ARG_MAX_RIDERS: &str = "max-riders";
pub(crate) const ARG_MAX_LOCATIONS: &str = "max-locations";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";

pub(crate) const ENV_DATE: &str = "HOP_CMDS_SCHEDULE_DATE";
pub(crate) const ENV_CREDENTIAL: &str = "HOP_CMDS_SCHEDULE_CREDENTIAL";
pub(crate) const ENV_GEOCODING_KEY: &str = "HOP_CMDS_SCHEDULE_GEOCODING_KEY";
pub(crate) const ENV_ROUTING_KEY: &str = "HOP_CMDS_SCHEDULE_ROUTING_KEY";
pub(crate) const ENV_STORE_URL: &str = "HOP_CMDS_SCHEDULE_STORE_URL";
pub(crate) const ENV_RIDER_SCHEMA: &str = "HOP_CMDS_SCHEDULE_RIDER_SCHEMA";
pub(crate) const ENV_SHIPMENT_SCHEMA: &str = "HOP_CMDS_SCHEDULE_SHIPMENT_SCHEMA";

/// Run the hop CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, a
/// service client cannot be built, or the scheduling run fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Schedule(args) => schedule::run_schedule(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "hop",
    about = "Schedule cargo-bike deliveries for a target day",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Assign pending shipments to free riders for one day.
    Schedule(ScheduleArgs),
}

#[cfg(test)]
mod tests;
