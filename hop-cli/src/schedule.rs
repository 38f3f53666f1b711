//! Schedule command implementation for the hop CLI.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use clap::Parser;
use hop_data::geocoding::DEFAULT_GEOCODING_URL;
use hop_data::routing::DEFAULT_ROUTING_URL;
use hop_data::{
    CachingResolver, DEFAULT_TIMEOUT_SECS, GeocoderConfig, GoogleGeocoder, GraphHopperSolver,
    GraphQlRecordStore, RecordStoreConfig, RoutingConfig,
};
use hop_scheduler::{ScheduleOutcome, ScheduleRunner, Scheduler, SchedulerConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CREDENTIAL, ARG_DATE, ARG_GEOCODING_KEY, ARG_GEOCODING_URL, ARG_MAX_LOCATIONS,
    ARG_MAX_RIDERS, ARG_RIDER_SCHEMA, ARG_ROUTING_KEY, ARG_ROUTING_URL, ARG_SEED,
    ARG_SHIPMENT_SCHEMA, ARG_STORE_URL, ARG_TIMEOUT_SECS, CliError, ENV_CREDENTIAL, ENV_DATE,
    ENV_GEOCODING_KEY, ENV_RIDER_SCHEMA, ENV_ROUTING_KEY, ENV_SHIPMENT_SCHEMA, ENV_STORE_URL,
};

/// CLI arguments for the `schedule` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run one scheduling pass for the given day: pick free riders, \
                 admit the most urgent pending shipments, plan routes with the \
                 routing service and write the assignments back to the record \
                 store. Keys and endpoints can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Schedule pending shipments for a day"
)]
#[ortho_config(prefix = "HOP")]
pub(crate) struct ScheduleArgs {
    /// Day to schedule, as YYYY-MM-DD.
    #[arg(long = ARG_DATE, value_name = "date")]
    #[serde(default)]
    pub(crate) date: Option<String>,
    /// Bearer token forwarded to the record store.
    #[arg(long = ARG_CREDENTIAL, value_name = "token")]
    #[serde(default)]
    pub(crate) credential: Option<String>,
    /// API key of the geocoding service.
    #[arg(long = ARG_GEOCODING_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) geocoding_key: Option<String>,
    /// API key of the routing service.
    #[arg(long = ARG_ROUTING_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) routing_key: Option<String>,
    /// Override the geocoding service base URL.
    #[arg(long = ARG_GEOCODING_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoding_url: Option<String>,
    /// Override the routing service base URL.
    #[arg(long = ARG_ROUTING_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) routing_url: Option<String>,
    /// GraphQL endpoint of the record store.
    #[arg(long = ARG_STORE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) store_url: Option<String>,
    /// Schema id of rider records.
    #[arg(long = ARG_RIDER_SCHEMA, value_name = "id")]
    #[serde(default)]
    pub(crate) rider_schema: Option<String>,
    /// Schema id of shipment records.
    #[arg(long = ARG_SHIPMENT_SCHEMA, value_name = "id")]
    #[serde(default)]
    pub(crate) shipment_schema: Option<String>,
    /// Override how many riders a run may use.
    #[arg(long = ARG_MAX_RIDERS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_riders: Option<usize>,
    /// Override how many distinct addresses a run may plan.
    #[arg(long = ARG_MAX_LOCATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_locations: Option<usize>,
    /// Seed for the rider shuffle, for reproducible runs.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Request timeout for every service, in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ScheduleArgs {
    pub(crate) fn into_config(self) -> Result<ScheduleConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScheduleConfig::try_from(merged)
    }
}

/// Resolved `schedule` command configuration.
#[derive(Clone, PartialEq)]
pub(crate) struct ScheduleConfig {
    /// Day to schedule, validated by the run itself.
    pub(crate) date: String,
    /// Bearer token for the record store.
    pub(crate) credential: String,
    pub(crate) geocoding: GeocoderConfig,
    pub(crate) routing: RoutingConfig,
    pub(crate) store: RecordStoreConfig,
    pub(crate) scheduler: SchedulerConfig,
}

impl fmt::Debug for ScheduleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleConfig")
            .field("date", &self.date)
            .field("credential", &"<redacted>")
            .field("geocoding", &self.geocoding)
            .field("routing", &self.routing)
            .field("store", &self.store)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

fn require(
    value: Option<String>,
    field: &'static str,
    env: &'static str,
) -> Result<String, CliError> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or(CliError::MissingArgument { field, env })
}

impl TryFrom<ScheduleArgs> for ScheduleConfig {
    type Error = CliError;

    fn try_from(args: ScheduleArgs) -> Result<Self, Self::Error> {
        let date = require(args.date, ARG_DATE, ENV_DATE)?;
        let credential = require(args.credential, ARG_CREDENTIAL, ENV_CREDENTIAL)?;
        let geocoding_key = require(args.geocoding_key, ARG_GEOCODING_KEY, ENV_GEOCODING_KEY)?;
        let routing_key = require(args.routing_key, ARG_ROUTING_KEY, ENV_ROUTING_KEY)?;
        let store_url = require(args.store_url, ARG_STORE_URL, ENV_STORE_URL)?;
        let rider_schema = require(args.rider_schema, ARG_RIDER_SCHEMA, ENV_RIDER_SCHEMA)?;
        let shipment_schema =
            require(args.shipment_schema, ARG_SHIPMENT_SCHEMA, ENV_SHIPMENT_SCHEMA)?;

        let timeout = Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let geocoding = GeocoderConfig::new(
            args.geocoding_url
                .unwrap_or_else(|| DEFAULT_GEOCODING_URL.to_owned()),
            geocoding_key,
        )
        .with_timeout(timeout);
        let routing = RoutingConfig::new(
            args.routing_url
                .unwrap_or_else(|| DEFAULT_ROUTING_URL.to_owned()),
            routing_key,
        )
        .with_timeout(timeout);
        let store =
            RecordStoreConfig::new(store_url, rider_schema, shipment_schema).with_timeout(timeout);

        let mut scheduler = SchedulerConfig::default();
        if let Some(max_riders) = args.max_riders {
            scheduler = scheduler.with_max_riders(max_riders);
        }
        if let Some(max_locations) = args.max_locations {
            scheduler = scheduler.with_max_locations(max_locations);
        }
        if let Some(seed) = args.seed {
            scheduler = scheduler.with_seed(seed);
        }

        Ok(Self {
            date,
            credential,
            geocoding,
            routing,
            store,
            scheduler,
        })
    }
}

/// Builds the runner used by one `schedule` invocation.
pub(crate) trait RunnerBuilder {
    fn build(&self, config: &ScheduleConfig) -> Result<Box<dyn ScheduleRunner>, CliError>;
}

/// Wires the HTTP adapters into a [`Scheduler`].
pub(crate) struct HttpRunnerBuilder;

impl RunnerBuilder for HttpRunnerBuilder {
    fn build(&self, config: &ScheduleConfig) -> Result<Box<dyn ScheduleRunner>, CliError> {
        let geocoder = GoogleGeocoder::with_config(config.geocoding.clone()).map_err(|source| {
            CliError::BuildClient {
                service: "geocoding",
                source,
            }
        })?;
        let solver = GraphHopperSolver::with_config(config.routing.clone()).map_err(|source| {
            CliError::BuildClient {
                service: "routing",
                source,
            }
        })?;
        let store = GraphQlRecordStore::with_config(config.store.clone()).map_err(|source| {
            CliError::BuildClient {
                service: "record store",
                source,
            }
        })?;
        Ok(Box::new(Scheduler::with_config(
            CachingResolver::new(geocoder),
            solver,
            store,
            config.scheduler.clone(),
        )))
    }
}

pub(crate) fn run_schedule(args: ScheduleArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_schedule_with(args, &HttpRunnerBuilder, &mut stdout)
}

pub(crate) fn run_schedule_with(
    args: ScheduleArgs,
    builder: &dyn RunnerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let runner = builder.build(&config)?;
    let outcome = runner
        .run_schedule(&config.date, &config.credential)
        .map_err(CliError::Schedule)?;
    write_outcome(writer, &outcome)
}

fn write_outcome(writer: &mut dyn Write, outcome: &ScheduleOutcome) -> Result<(), CliError> {
    writeln!(writer, "{outcome}").map_err(CliError::WriteOutcome)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScheduleConfig, CliError> {
    let merged = ScheduleArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScheduleConfig::try_from(merged)
}
