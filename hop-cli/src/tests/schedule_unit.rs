//! Focused unit tests covering schedule CLI configuration and output.

use super::helpers::{STORE_URL, TARGET_DAY};
use super::*;
use crate::schedule::{
    RunnerBuilder, ScheduleConfig, config_from_layers_for_test, run_schedule_with,
};
use hop_scheduler::{ScheduleError, ScheduleOutcome, ScheduleRunner};
use ortho_config::MergeComposer;
use rstest::{fixture, rstest};
use serde_json::json;
use std::time::Duration;

#[fixture]
fn complete_args() -> ScheduleArgs {
    ScheduleArgs {
        date: Some(TARGET_DAY.to_owned()),
        credential: Some("token".to_owned()),
        geocoding_key: Some("geo-key".to_owned()),
        routing_key: Some("vrp-key".to_owned()),
        store_url: Some(STORE_URL.to_owned()),
        rider_schema: Some("schema-r".to_owned()),
        shipment_schema: Some("schema-s".to_owned()),
        ..ScheduleArgs::default()
    }
}

#[rstest]
#[case::date(ARG_DATE, ENV_DATE)]
#[case::credential(ARG_CREDENTIAL, ENV_CREDENTIAL)]
#[case::geocoding_key(ARG_GEOCODING_KEY, ENV_GEOCODING_KEY)]
#[case::routing_key(ARG_ROUTING_KEY, ENV_ROUTING_KEY)]
#[case::store_url(ARG_STORE_URL, ENV_STORE_URL)]
#[case::rider_schema(ARG_RIDER_SCHEMA, ENV_RIDER_SCHEMA)]
#[case::shipment_schema(ARG_SHIPMENT_SCHEMA, ENV_SHIPMENT_SCHEMA)]
fn converting_without_required_option_errors(
    complete_args: ScheduleArgs,
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
) {
    let mut args = complete_args;
    let slot = match expected_field {
        ARG_DATE => &mut args.date,
        ARG_CREDENTIAL => &mut args.credential,
        ARG_GEOCODING_KEY => &mut args.geocoding_key,
        ARG_ROUTING_KEY => &mut args.routing_key,
        ARG_STORE_URL => &mut args.store_url,
        ARG_RIDER_SCHEMA => &mut args.rider_schema,
        _ => &mut args.shipment_schema,
    };
    *slot = None;

    let err = ScheduleConfig::try_from(args).expect_err("missing option should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn blank_credential_counts_as_missing(complete_args: ScheduleArgs) {
    let args = ScheduleArgs {
        credential: Some("   ".to_owned()),
        ..complete_args
    };
    let err = ScheduleConfig::try_from(args).expect_err("blank credential should error");
    assert!(matches!(
        err,
        CliError::MissingArgument {
            field: ARG_CREDENTIAL,
            ..
        }
    ));
}

#[rstest]
fn config_applies_service_defaults(complete_args: ScheduleArgs) {
    let config = ScheduleConfig::try_from(complete_args).expect("config should build");

    assert_eq!(config.date, TARGET_DAY);
    assert_eq!(
        config.geocoding.http.base_url,
        hop_data::geocoding::DEFAULT_GEOCODING_URL
    );
    assert_eq!(
        config.routing.http.base_url,
        hop_data::routing::DEFAULT_ROUTING_URL
    );
    assert_eq!(config.store.http.base_url, STORE_URL);
    assert_eq!(config.store.rider_schema_id, "schema-r");
    assert_eq!(config.store.shipment_schema_id, "schema-s");
    assert_eq!(
        config.geocoding.http.timeout,
        Duration::from_secs(hop_data::DEFAULT_TIMEOUT_SECS)
    );
    assert_eq!(config.scheduler, hop_scheduler::SchedulerConfig::default());
}

#[rstest]
fn config_applies_overrides(complete_args: ScheduleArgs) {
    let args = ScheduleArgs {
        routing_url: Some("http://vrp.local:8989".to_owned()),
        max_riders: Some(4),
        max_locations: Some(12),
        seed: Some(99),
        timeout_secs: Some(5),
        ..complete_args
    };
    let config = ScheduleConfig::try_from(args).expect("config should build");

    assert_eq!(config.routing.http.base_url, "http://vrp.local:8989");
    assert_eq!(config.scheduler.max_riders, 4);
    assert_eq!(config.scheduler.max_locations, 12);
    assert_eq!(config.scheduler.seed, Some(99));
    assert_eq!(config.store.http.timeout, Duration::from_secs(5));
    assert_eq!(config.routing.http.timeout, Duration::from_secs(5));
}

#[rstest]
fn debug_output_hides_secrets(complete_args: ScheduleArgs) {
    let config = ScheduleConfig::try_from(complete_args).expect("config should build");
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("token"));
    assert!(!rendered.contains("geo-key"));
    assert!(!rendered.contains("vrp-key"));
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "max_riders": "many" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "date": "2022-01-01",
            "credential": "file-token",
            "geocoding_key": "file-geo",
            "routing_key": "file-vrp",
            "store_url": "https://file.example.com/graphql",
            "rider_schema": "file-r",
            "shipment_schema": "file-s",
            "max_riders": 3,
        }),
        None,
    );
    composer.push_environment(json!({
        "date": "2022-02-02",
        "routing_key": "env-vrp",
    }));
    composer.push_cli(json!({
        "date": TARGET_DAY,
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.date, TARGET_DAY);
    assert_eq!(config.routing.api_key, "env-vrp");
    assert_eq!(config.geocoding.api_key, "file-geo");
    assert_eq!(config.store.http.base_url, "https://file.example.com/graphql");
    assert_eq!(config.scheduler.max_riders, 3);
}

struct FixedRunner(ScheduleOutcome);

impl ScheduleRunner for FixedRunner {
    fn run_schedule(
        &self,
        _date: &str,
        _credential: &str,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        Ok(self.0.clone())
    }
}

struct FixedRunnerBuilder(ScheduleOutcome);

impl RunnerBuilder for FixedRunnerBuilder {
    fn build(&self, _config: &ScheduleConfig) -> Result<Box<dyn ScheduleRunner>, CliError> {
        Ok(Box::new(FixedRunner(self.0.clone())))
    }
}

#[rstest]
#[case::scheduled(
    ScheduleOutcome::Scheduled(vec!["s-1".to_owned(), "s-2".to_owned()]),
    "The following shipments have been scheduled:\ns-1\ns-2\n"
)]
#[case::no_rider(ScheduleOutcome::NoRiderAvailable, "No rider available for the target day\n")]
#[case::nothing_pending(ScheduleOutcome::NoShipmentToSchedule, "No shipment to be scheduled\n")]
fn outcome_is_written_for_the_operator(
    complete_args: ScheduleArgs,
    #[case] outcome: ScheduleOutcome,
    #[case] expected: &str,
) {
    let mut output = Vec::new();
    run_schedule_with(complete_args, &FixedRunnerBuilder(outcome), &mut output)
        .expect("run should succeed");
    assert_eq!(String::from_utf8(output).expect("utf-8 output"), expected);
}
