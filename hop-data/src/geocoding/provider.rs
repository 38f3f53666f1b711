//! HTTP-based [`AddressResolver`] for a Google-style geocoding API.
//!
//! # Example
//!
//! ```no_run
//! use hop_core::AddressResolver;
//! use hop_data::geocoding::GoogleGeocoder;
//!
//! let geocoder = GoogleGeocoder::new("api-key")?;
//! let location = geocoder.resolve("Piazza Maggiore, Bologna")?;
//! # let _ = location;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::time::Duration;

use hop_core::{AddressResolver, Location, ResolveError};
use url::Url;

use super::google::GeocodeResponse;
use crate::http::{ClientBuildError, HttpClientConfig, HttpRuntime, decode_error};

/// Base URL of the public geocoding service.
pub const DEFAULT_GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api";

const GEOCODE_PATH: &str = "geocode/json";

/// Configuration for [`GoogleGeocoder`].
#[derive(Clone, PartialEq, Eq)]
pub struct GeocoderConfig {
    /// Connection settings.
    pub http: HttpClientConfig,
    /// API key sent as the `key` query parameter.
    pub api_key: String,
}

impl fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("http", &self.http)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeocoderConfig {
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

/// Geocoder backed by the geocoding web service.
///
/// Every call performs one request; wrap it in
/// [`CachingResolver`](super::CachingResolver) to reuse answers.
pub struct GoogleGeocoder {
    http: HttpRuntime,
    endpoint: Url,
    api_key: String,
}

impl fmt::Debug for GoogleGeocoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleGeocoder")
            .field("http", &self.http)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl GoogleGeocoder {
    /// Create a geocoder for the public service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(GeocoderConfig::new(DEFAULT_GEOCODING_URL, api_key))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: GeocoderConfig) -> Result<Self, ClientBuildError> {
        let endpoint = config.http.endpoint(GEOCODE_PATH)?;
        let http = HttpRuntime::new(&config.http)?;
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key,
        })
    }

    async fn fetch(&self, address: &str) -> Result<GeocodeResponse, ResolveError> {
        let response = self
            .http
            .client()
            .get(self.endpoint.clone())
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| self.http.transport_error(err, &self.endpoint))?
            .error_for_status()
            .map_err(|err| self.http.transport_error(err, &self.endpoint))?;
        let body = response
            .text()
            .await
            .map_err(|err| self.http.transport_error(err, &self.endpoint))?;
        serde_json::from_str(&body).map_err(|err| decode_error(&self.endpoint, &err).into())
    }
}

impl AddressResolver for GoogleGeocoder {
    fn resolve(&self, address: &str) -> Result<Location, ResolveError> {
        if address.trim().is_empty() {
            return Err(ResolveError::EmptyAddress);
        }
        let response = self.http.block_on(self.fetch(address))?;
        response.into_location(address)
    }
}
