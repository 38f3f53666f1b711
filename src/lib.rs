//! Facade crate for the hop delivery scheduler.
//!
//! This crate re-exports the domain types and the scheduling orchestrator,
//! and exposes the HTTP service adapters behind the `http` feature.

#![forbid(unsafe_code)]

pub use hop_core::{
    AddressResolver, ClockTime, Credential, DeliveryStatus, Location, Problem, RecordStore,
    ResolveError, Rider, RouteSolver, ScheduleDate, Shipment, Solution, SolveError, StoreError,
    TransportError,
};
pub use hop_scheduler::{
    RunSerializer, ScheduleError, ScheduleOutcome, ScheduleRunner, Scheduler, SchedulerConfig,
};

#[cfg(feature = "test-support")]
pub use hop_core::test_support;

#[cfg(feature = "http")]
pub use hop_data::{
    CachingResolver, ClientBuildError, GeocoderConfig, GoogleGeocoder, GraphHopperSolver,
    GraphQlRecordStore, RecordStoreConfig, RoutingConfig,
};
