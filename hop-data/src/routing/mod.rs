//! Vehicle routing over HTTP.

mod graphhopper;
mod provider;

pub use provider::{DEFAULT_ROUTING_URL, GraphHopperSolver, RoutingConfig};
