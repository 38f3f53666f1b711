//! Bounded in-memory cache in front of an [`AddressResolver`].

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use hop_core::{AddressResolver, Location, ResolveError};
use log::debug;

/// Default number of addresses kept before the cache is reset.
pub const DEFAULT_CACHE_CAPACITY: usize = 5_000;

/// Memoise successful lookups by exact address text.
///
/// Failures are never cached. When a new address arrives while the cache is
/// full, every entry is dropped and only the new one is kept. The lock is
/// released while the inner resolver runs, so concurrent misses for the same
/// address may each reach the service.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use hop_core::AddressResolver;
/// use hop_core::test_support::StaticResolver;
/// use hop_data::geocoding::CachingResolver;
///
/// let inner = StaticResolver::with_addresses([("Via Rizzoli 1", Coord { x: 11.34, y: 44.49 })]);
/// let cache = CachingResolver::new(inner);
/// cache.resolve("Via Rizzoli 1")?;
/// cache.resolve("Via Rizzoli 1")?;
/// assert_eq!(cache.inner().calls(), 1);
/// # Ok::<(), hop_core::ResolveError>(())
/// ```
#[derive(Debug)]
pub struct CachingResolver<R> {
    inner: R,
    capacity: usize,
    entries: Mutex<HashMap<String, Location>>,
}

impl<R> CachingResolver<R> {
    /// Wrap `inner` with the default capacity.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    /// Wrap `inner`, holding at most `capacity` addresses (at least one).
    #[must_use]
    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped resolver.
    #[must_use]
    pub const fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of cached addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the cache holds no address.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Location>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, address: &str) -> Option<Location> {
        self.entries().get(address).copied()
    }

    fn remember(&self, address: &str, location: Location) {
        let mut entries = self.entries();
        if entries.len() >= self.capacity && !entries.contains_key(address) {
            debug!("geocode cache full at {} entries, resetting", entries.len());
            entries.clear();
        }
        entries.insert(address.to_owned(), location);
    }
}

impl<R: AddressResolver> AddressResolver for CachingResolver<R> {
    fn resolve(&self, address: &str) -> Result<Location, ResolveError> {
        if let Some(location) = self.lookup(address) {
            debug!("geocode cache hit for {address:?}");
            return Ok(location);
        }
        let location = self.inner.resolve(address)?;
        self.remember(address, location);
        Ok(location)
    }
}
