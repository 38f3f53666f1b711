//! Core domain types for the hop delivery scheduler.
//!
//! The crate models riders and shipments as held by the remote record store,
//! the clock and calendar values the scheduler works with, and the narrow
//! interfaces through which the scheduler reaches its collaborators:
//! [`AddressResolver`], [`RouteSolver`] and [`RecordStore`]. Constructors
//! return `Result` to surface invalid input early.
//!
//! The [`problem`] and [`solution`] modules mirror the JSON contract spoken
//! with the external vehicle-routing service.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod credential;
mod geocode;
pub mod problem;
mod rider;
mod shipment;
pub mod solution;
mod solver;
mod store;
mod time;
mod transport;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use credential::{Credential, CredentialError};
pub use geocode::{AddressResolver, ResolveError};
pub use problem::Problem;
pub use rider::{Rider, RiderId};
pub use shipment::{DeliveryStatus, RecordMeta, Shipment, ShipmentId};
pub use solution::Solution;
pub use solver::{RouteSolver, SolveError};
pub use store::{RecordStore, StoreError};
pub use time::{ClockTime, ClockTimeError, ScheduleDate, ScheduleDateError};
pub use transport::TransportError;

/// Geographic position of a resolved address.
///
/// Uses WGS84 with `x = longitude` and `y = latitude`.
pub type Location = geo::Coord<f64>;
