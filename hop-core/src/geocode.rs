//! Resolve free-text addresses to coordinates.
//!
//! The [`AddressResolver`] trait abstracts the geocoding service. Callers
//! supply the exact address text held in a record and receive a
//! [`Location`](crate::Location).

use std::sync::Arc;

use thiserror::Error;

use crate::{Location, TransportError};

/// Errors from [`AddressResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The address text was empty.
    #[error("address must not be empty")]
    EmptyAddress,
    /// The service found no match for the address.
    #[error("no geocode results for address {address:?}")]
    NoResults {
        /// Address that could not be resolved.
        address: String,
    },
    /// The service reported a non-success status.
    #[error("error geocoding address {address:?}: {status}: {message}")]
    Service {
        /// Address being resolved.
        address: String,
        /// Status reported by the service.
        status: String,
        /// Message reported by the service, if any.
        message: String,
    },
    /// The service could not be reached or its answer decoded.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Map an address to a geographic position.
///
/// Implementations must be safe to share between threads: the resolver may
/// be used by a scheduling run and by unrelated callers at the same time.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use hop_core::{AddressResolver, Location, ResolveError};
///
/// struct Origin;
///
/// impl AddressResolver for Origin {
///     fn resolve(&self, address: &str) -> Result<Location, ResolveError> {
///         if address.is_empty() {
///             return Err(ResolveError::EmptyAddress);
///         }
///         Ok(Coord { x: 0.0, y: 0.0 })
///     }
/// }
///
/// let location = Origin.resolve("Piazza Maggiore, Bologna")?;
/// assert_eq!(location, Coord { x: 0.0, y: 0.0 });
/// # Ok::<(), ResolveError>(())
/// ```
pub trait AddressResolver: Send + Sync {
    /// Resolve `address` to a location.
    fn resolve(&self, address: &str) -> Result<Location, ResolveError>;
}

impl<T: AddressResolver + ?Sized> AddressResolver for Arc<T> {
    fn resolve(&self, address: &str) -> Result<Location, ResolveError> {
        (**self).resolve(address)
    }
}

impl<T: AddressResolver + ?Sized> AddressResolver for &T {
    fn resolve(&self, address: &str) -> Result<Location, ResolveError> {
        (**self).resolve(address)
    }
}
