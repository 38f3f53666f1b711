//! Delivery scheduling runs for hop.
//!
//! A run picks up to a handful of riders who are free on the target day,
//! admits the most urgent pending shipments within a location budget, hands
//! the resulting pickup and delivery problem to a [`RouteSolver`] and writes
//! the assignments it gets back to the [`RecordStore`].
//!
//! [`Scheduler`] ties the collaborators together. Runs are serialised
//! through a [`RunSerializer`] so that two runs never read and write the
//! same records concurrently.
//!
//! [`RouteSolver`]: hop_core::RouteSolver
//! [`RecordStore`]: hop_core::RecordStore

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod problem;
mod reconcile;
mod scheduler;
pub mod selection;
mod serializer;

pub use config::SchedulerConfig;
pub use error::{ProblemError, ScheduleError, ScheduleOutcome};
pub use problem::build_problem;
pub use reconcile::reconcile;
pub use scheduler::{ScheduleRunner, Scheduler};
pub use serializer::RunSerializer;
