//! Vehicle routing solver abstraction.

use std::sync::Arc;

use thiserror::Error;

use crate::{Problem, Solution, TransportError};

/// Errors returned by [`RouteSolver::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The problem has no vehicle or no shipment to plan.
    #[error("routing problem must contain at least one vehicle and one shipment")]
    EmptyProblem,
    /// The routing service refused the problem.
    #[error("routing service returned HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code of the refusal.
        status: u16,
        /// Response body as returned by the service.
        body: String,
    },
    /// The problem could not be encoded for submission.
    #[error("failed to encode routing problem: {message}")]
    Encode {
        /// Error description.
        message: String,
    },
    /// The routing service could not be reached or its answer decoded.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Solve a vehicle routing [`Problem`].
///
/// # Examples
///
/// ```rust
/// use hop_core::{Problem, RouteSolver, Solution, SolveError};
///
/// struct Idle;
///
/// impl RouteSolver for Idle {
///     fn solve(&self, problem: &Problem) -> Result<Solution, SolveError> {
///         if problem.vehicles.is_empty() {
///             return Err(SolveError::EmptyProblem);
///         }
///         Ok(Solution::default())
///     }
/// }
///
/// let err = Idle.solve(&Problem::default()).expect_err("no vehicles");
/// assert_eq!(err, SolveError::EmptyProblem);
/// ```
pub trait RouteSolver: Send + Sync {
    /// Plan routes for `problem`.
    fn solve(&self, problem: &Problem) -> Result<Solution, SolveError>;
}

impl<T: RouteSolver + ?Sized> RouteSolver for Arc<T> {
    fn solve(&self, problem: &Problem) -> Result<Solution, SolveError> {
        (**self).solve(problem)
    }
}

impl<T: RouteSolver + ?Sized> RouteSolver for &T {
    fn solve(&self, problem: &Problem) -> Result<Solution, SolveError> {
        (**self).solve(problem)
    }
}
