//! Errors and outcomes of a scheduling run.

use std::fmt;

use hop_core::{
    ClockTimeError, CredentialError, ResolveError, RiderId, ScheduleDateError, ShipmentId,
    SolveError, StoreError,
};
use thiserror::Error;

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Shipments newly scheduled and persisted, possibly none.
    Scheduled(Vec<ShipmentId>),
    /// Every rider is already busy on the target day.
    NoRiderAvailable,
    /// No pending shipment fits the run.
    NoShipmentToSchedule,
}

impl ScheduleOutcome {
    /// Identifiers of the shipments scheduled by the run.
    #[must_use]
    pub fn scheduled(&self) -> &[ShipmentId] {
        match self {
            Self::Scheduled(ids) => ids,
            Self::NoRiderAvailable | Self::NoShipmentToSchedule => &[],
        }
    }
}

impl fmt::Display for ScheduleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled(ids) => {
                f.write_str("The following shipments have been scheduled:")?;
                for id in ids {
                    write!(f, "\n{id}")?;
                }
                Ok(())
            }
            Self::NoRiderAvailable => f.write_str("No rider available for the target day"),
            Self::NoShipmentToSchedule => f.write_str("No shipment to be scheduled"),
        }
    }
}

/// Failure turning a rider or shipment into routing input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// An address could not be geocoded.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// A time field is not a valid `HH:MM` time.
    #[error(transparent)]
    Time(#[from] ClockTimeError),
}

/// Errors aborting a scheduling run.
///
/// Nothing is written to the record store when a run fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The target date is malformed.
    #[error(transparent)]
    InvalidDate(#[from] ScheduleDateError),
    /// No credential was supplied.
    #[error(transparent)]
    MissingCredential(#[from] CredentialError),
    /// Reading the riders failed.
    #[error("failed to list riders: {0}")]
    ListRiders(#[source] StoreError),
    /// Reading the shipments failed.
    #[error("failed to list shipments: {0}")]
    ListShipments(#[source] StoreError),
    /// A selected rider could not become a vehicle.
    #[error("error in rider {rider_id}: {source}")]
    Rider {
        /// Offending rider.
        rider_id: RiderId,
        /// Underlying failure.
        #[source]
        source: ProblemError,
    },
    /// An admitted shipment could not become a routing job.
    #[error("error in shipment {shipment_id}: {source}")]
    Shipment {
        /// Offending shipment.
        shipment_id: ShipmentId,
        /// Underlying failure.
        #[source]
        source: ProblemError,
    },
    /// The routing service failed.
    #[error("route solving failed: {0}")]
    Solve(#[source] SolveError),
    /// The solution refers to jobs or vehicles that were never submitted.
    #[error("unexpected routing solution: {reason}")]
    UnexpectedSolution {
        /// What did not match.
        reason: String,
    },
    /// Writing the scheduled shipments failed.
    #[error("failed to update shipments: {0}")]
    UpdateShipments(#[source] StoreError),
}

impl ScheduleError {
    /// Whether the run was refused before touching any collaborator.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidDate(_) | Self::MissingCredential(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn scheduled_outcome_lists_ids_one_per_line() {
        let outcome = ScheduleOutcome::Scheduled(vec!["s-1".into(), "s-2".into()]);
        assert_eq!(
            outcome.to_string(),
            "The following shipments have been scheduled:\ns-1\ns-2"
        );
    }

    #[rstest]
    #[case(ScheduleOutcome::NoRiderAvailable, "No rider available for the target day")]
    #[case(ScheduleOutcome::NoShipmentToSchedule, "No shipment to be scheduled")]
    fn empty_outcomes_render_operator_messages(
        #[case] outcome: ScheduleOutcome,
        #[case] expected: &str,
    ) {
        assert_eq!(outcome.to_string(), expected);
        assert!(outcome.scheduled().is_empty());
    }

    #[rstest]
    fn rider_errors_name_the_rider() {
        let err = ScheduleError::Rider {
            rider_id: "r-7".into(),
            source: ProblemError::Time(ClockTimeError::Malformed {
                value: "8h".into(),
            }),
        };
        assert!(err.to_string().starts_with("error in rider r-7:"));
        assert!(!err.is_validation());
    }
}
