//! Address geocoding over HTTP, with an optional in-memory cache.

mod cache;
mod google;
mod provider;

pub use cache::{CachingResolver, DEFAULT_CACHE_CAPACITY};
pub use provider::{DEFAULT_GEOCODING_URL, GeocoderConfig, GoogleGeocoder};
