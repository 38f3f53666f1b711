//! Geocoding API response payloads.

use geo::Coord;
use hop_core::{Location, ResolveError};
use serde::Deserialize;

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Top-level geocoding response.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    #[serde(default)]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) error_message: Option<String>,
    #[serde(default)]
    pub(crate) results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResult {
    pub(crate) geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub(crate) location: LatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatLng {
    pub(crate) lat: f64,
    pub(crate) lng: f64,
}

impl GeocodeResponse {
    /// Interpret the response for `address`, taking the first match.
    pub(crate) fn into_location(self, address: &str) -> Result<Location, ResolveError> {
        let message = self.error_message.filter(|text| !text.trim().is_empty());
        let status_ok = self.status == STATUS_OK || self.status == STATUS_ZERO_RESULTS;
        if message.is_some() || !status_ok {
            return Err(ResolveError::Service {
                address: address.to_owned(),
                status: self.status,
                message: message.unwrap_or_default(),
            });
        }
        self.results
            .into_iter()
            .next()
            .map(|result| Coord {
                x: result.geometry.location.lng,
                y: result.geometry.location.lat,
            })
            .ok_or_else(|| ResolveError::NoResults {
                address: address.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn decode(body: &str) -> GeocodeResponse {
        serde_json::from_str(body).expect("fixture should decode")
    }

    #[rstest]
    fn first_result_wins() {
        let response = decode(
            r#"{"status":"OK","results":[
                {"geometry":{"location":{"lat":44.4949,"lng":11.3426}}},
                {"geometry":{"location":{"lat":0.0,"lng":0.0}}}
            ]}"#,
        );
        let location = response
            .into_location("Piazza Maggiore")
            .expect("should resolve");
        assert_eq!(location, Coord { x: 11.3426, y: 44.4949 });
    }

    #[rstest]
    fn zero_results_is_reported_as_no_results() {
        let response = decode(r#"{"status":"ZERO_RESULTS","results":[]}"#);
        let err = response.into_location("Atlantis").expect_err("no match");
        assert_eq!(
            err,
            ResolveError::NoResults {
                address: "Atlantis".to_owned()
            }
        );
    }

    #[rstest]
    #[case(r#"{"status":"REQUEST_DENIED","error_message":"The provided API key is invalid."}"#, "REQUEST_DENIED", "The provided API key is invalid.")]
    #[case(r#"{"status":"OVER_QUERY_LIMIT","results":[]}"#, "OVER_QUERY_LIMIT", "")]
    #[case(r#"{"status":"OK","error_message":"degraded","results":[]}"#, "OK", "degraded")]
    fn service_failures_carry_status_and_message(
        #[case] body: &str,
        #[case] status: &str,
        #[case] message: &str,
    ) {
        let err = decode(body)
            .into_location("Via Indipendenza 8")
            .expect_err("service failure");
        assert_eq!(
            err,
            ResolveError::Service {
                address: "Via Indipendenza 8".to_owned(),
                status: status.to_owned(),
                message: message.to_owned(),
            }
        );
    }
}
