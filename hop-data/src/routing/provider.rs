//! HTTP-based [`RouteSolver`] for a GraphHopper-style VRP service.
//!
//! The problem is posted as JSON to `{base_url}/vrp` and the service answers
//! synchronously with the planned routes.
//!
//! # Example
//!
//! ```no_run
//! use hop_core::{Problem, RouteSolver};
//! use hop_data::routing::GraphHopperSolver;
//!
//! let solver = GraphHopperSolver::new("api-key")?;
//! let problem = Problem::default();
//! let solution = solver.solve(&problem);
//! # let _ = solution;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::time::Duration;

use hop_core::{Problem, RouteSolver, Solution, SolveError, TransportError};
use log::debug;
use url::Url;

use super::graphhopper::SolutionEnvelope;
use crate::http::{ClientBuildError, HttpClientConfig, HttpRuntime, decode_error};

/// Base URL of the public routing service.
pub const DEFAULT_ROUTING_URL: &str = "https://graphhopper.com/api/1";

const VRP_PATH: &str = "vrp";

/// Configuration for [`GraphHopperSolver`].
#[derive(Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Connection settings.
    pub http: HttpClientConfig,
    /// API key sent as the `key` query parameter.
    pub api_key: String,
}

impl fmt::Debug for RoutingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingConfig")
            .field("http", &self.http)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl RoutingConfig {
    /// Configuration for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: HttpClientConfig::new(base_url),
            api_key: api_key.into(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}

/// Route solver backed by the VRP web service.
pub struct GraphHopperSolver {
    http: HttpRuntime,
    endpoint: Url,
    api_key: String,
}

impl fmt::Debug for GraphHopperSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphHopperSolver")
            .field("http", &self.http)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl GraphHopperSolver {
    /// Create a solver for the public service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(RoutingConfig::new(DEFAULT_ROUTING_URL, api_key))
    }

    /// Create a solver with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: RoutingConfig) -> Result<Self, ClientBuildError> {
        let endpoint = config.http.endpoint(VRP_PATH)?;
        let http = HttpRuntime::new(&config.http)?;
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key,
        })
    }

    async fn submit(&self, body: String) -> Result<Solution, SolveError> {
        let response = self
            .http
            .client()
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| self.http.transport_error(err, &self.endpoint))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| self.http.transport_error(err, &self.endpoint))?;
        if !status.is_success() {
            return Err(SolveError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }
        interpret_answer(&self.endpoint, &text)
    }
}

/// Decode a successful answer into a [`Solution`].
fn interpret_answer(endpoint: &Url, body: &str) -> Result<Solution, SolveError> {
    let envelope: SolutionEnvelope =
        serde_json::from_str(body).map_err(|err| decode_error(endpoint, &err))?;
    envelope.solution.ok_or_else(|| {
        TransportError::Decode {
            url: endpoint.to_string(),
            message: format!(
                "response carried no solution (status {})",
                envelope.status.as_deref().unwrap_or("unknown")
            ),
        }
        .into()
    })
}

impl RouteSolver for GraphHopperSolver {
    fn solve(&self, problem: &Problem) -> Result<Solution, SolveError> {
        if problem.is_empty() {
            return Err(SolveError::EmptyProblem);
        }
        let body = serde_json::to_string(problem).map_err(|err| SolveError::Encode {
            message: err.to_string(),
        })?;
        debug!(
            "submitting routing problem with {} vehicles and {} shipments",
            problem.vehicles.len(),
            problem.shipments.len()
        );
        self.http.block_on(self.submit(body))
    }
}
