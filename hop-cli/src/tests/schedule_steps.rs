//! Behaviour-driven step definitions driving the schedule CLI scenarios.

use super::helpers::{TARGET_DAY, assigned, command_line, pending, rider};
use super::*;
use crate::schedule::{RunnerBuilder, ScheduleConfig, run_schedule_with};
use hop_core::test_support::{MemoryRecordStore, ScriptedSolver, StaticResolver, StoreEvent};
use hop_core::{DeliveryStatus, Rider, Shipment};
use hop_scheduler::{ScheduleError, ScheduleRunner, Scheduler};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::sync::Arc;

#[derive(Debug, Default)]
struct ScheduleWorld {
    riders: RefCell<Vec<Rider>>,
    shipments: RefCell<Vec<Shipment>>,
    credential: RefCell<Option<String>>,
    store: RefCell<Option<Arc<MemoryRecordStore>>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl ScheduleWorld {
    fn build_command_line(&self, date: &str) -> Vec<String> {
        let mut argv = command_line(date);
        if let Some(token) = self.credential.borrow().as_ref() {
            argv.extend(["--credential".to_owned(), token.clone()]);
        }
        argv
    }

    fn store(&self) -> Arc<MemoryRecordStore> {
        let Some(store) = self.store.borrow().clone() else {
            panic!("record store must be initialised");
        };
        store
    }

    fn stdout(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }
}

#[fixture]
fn world() -> ScheduleWorld {
    ScheduleWorld::default()
}

/// Builds a scheduler over in-memory collaborators sharing one store.
struct MemoryRunnerBuilder {
    store: Arc<MemoryRecordStore>,
}

impl RunnerBuilder for MemoryRunnerBuilder {
    fn build(&self, config: &ScheduleConfig) -> Result<Box<dyn ScheduleRunner>, CliError> {
        Ok(Box::new(Scheduler::with_config(
            StaticResolver::permissive(),
            ScriptedSolver::assign_all(),
            Arc::clone(&self.store),
            config.scheduler.clone(),
        )))
    }
}

#[given("a free rider and two pending shipments")]
fn free_rider_and_pending(#[from(world)] world: &ScheduleWorld) {
    *world.riders.borrow_mut() = vec![rider("r-1")];
    *world.shipments.borrow_mut() = vec![
        pending("s-1", Some("2022-05-11")),
        pending("s-2", None),
    ];
}

#[given("a rider who is busy on the target day")]
fn busy_rider(#[from(world)] world: &ScheduleWorld) {
    *world.riders.borrow_mut() = vec![rider("r-1")];
    *world.shipments.borrow_mut() = vec![assigned("s-0", "r-1"), pending("s-1", None)];
}

#[given("a credential is supplied")]
fn credential_supplied(#[from(world)] world: &ScheduleWorld) {
    *world.credential.borrow_mut() = Some("token".to_owned());
}

#[when("I run the schedule command for {date}")]
fn run_schedule_command(#[from(world)] world: &ScheduleWorld, date: String) {
    let store = Arc::new(MemoryRecordStore::new(
        world.riders.borrow().clone(),
        world.shipments.borrow().clone(),
    ));
    world.store.replace(Some(Arc::clone(&store)));

    let invocation = world.build_command_line(date.trim_matches('"'));
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Schedule(args) => {
            let builder = MemoryRunnerBuilder { store };
            let mut buffer = world.stdout.borrow_mut();
            run_schedule_with(args, &builder, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and lists the scheduled shipments")]
fn command_lists_scheduled(#[from(world)] world: &ScheduleWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    assert_eq!(
        world.stdout(),
        "The following shipments have been scheduled:\ns-1\ns-2\n"
    );
    let saved = world.store().shipment("s-1").expect("shipment kept");
    assert_eq!(saved.delivery_status, DeliveryStatus::Scheduled);
    assert_eq!(saved.shipment_day.as_deref(), Some(TARGET_DAY));
}

#[then("the command prints that no rider is available")]
fn command_reports_no_rider(#[from(world)] world: &ScheduleWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    assert_eq!(world.stdout(), "No rider available for the target day\n");
}

#[then("the command fails because the date is invalid")]
fn command_fails_invalid_date(#[from(world)] world: &ScheduleWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::Schedule(ScheduleError::InvalidDate(_)) => {}
        other => panic!("expected InvalidDate, found {other:?}"),
    }
}

#[then("the record store is never contacted")]
fn store_untouched(#[from(world)] world: &ScheduleWorld) {
    let events: Vec<StoreEvent> = world.store().events();
    assert!(events.is_empty(), "unexpected store traffic: {events:?}");
}

#[then("the command fails because the credential is missing")]
fn command_fails_missing_credential(#[from(world)] world: &ScheduleWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_CREDENTIAL),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_schedule_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/schedule_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: ScheduleWorld) {
            let _ = world;
        }
    };
}

register_schedule_scenario!(
    schedule_happy_path,
    "scheduling pending shipments prints their ids"
);
register_schedule_scenario!(schedule_no_rider, "reporting that no rider is free");
register_schedule_scenario!(schedule_invalid_date, "rejecting a malformed date");
register_schedule_scenario!(
    schedule_missing_credential,
    "rejecting a missing credential"
);
