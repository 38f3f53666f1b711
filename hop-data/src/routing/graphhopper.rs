//! VRP service response envelope.

use hop_core::Solution;
use serde::Deserialize;

/// Body of a successful optimisation response.
///
/// The service wraps the plan in a `solution` member alongside job
/// bookkeeping fields that are ignored here.
#[derive(Debug, Deserialize)]
pub(crate) struct SolutionEnvelope {
    #[serde(default)]
    pub(crate) status: Option<String>,
    pub(crate) solution: Option<Solution>,
}
