//! HTTP adapters for the collaborators of a scheduling run.
//!
//! Responsibilities:
//! - Resolve addresses through a geocoding web service, with a bounded cache.
//! - Submit routing problems to a VRP web service.
//! - Read and upsert rider and shipment records over GraphQL.
//!
//! Boundaries:
//! - Do not encode scheduling rules (live in `hop-scheduler`).
//! - Expose the synchronous traits of `hop-core`; async I/O stays internal.
//!
//! Invariants:
//! - API keys and bearer tokens never appear in errors or `Debug` output.
//! - No global mutable state.

pub mod geocoding;
mod http;
pub mod records;
pub mod routing;

pub use geocoding::{CachingResolver, GeocoderConfig, GoogleGeocoder};
pub use http::{ClientBuildError, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpClientConfig};
pub use records::{GraphQlRecordStore, RecordStoreConfig};
pub use routing::{GraphHopperSolver, RoutingConfig};
