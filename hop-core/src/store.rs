//! Remote record store holding riders and shipments.

use std::sync::Arc;

use thiserror::Error;

use crate::{Credential, Rider, Shipment, TransportError};

/// Errors returned by [`RecordStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store answered with query errors.
    #[error("record store query failed: {message}")]
    Query {
        /// First error message reported by the store.
        message: String,
    },
    /// The store answered without any data.
    #[error("record store response carried no data")]
    MissingData,
    /// The store could not be reached or its answer decoded.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Read and write rider and shipment records.
///
/// Every call is authenticated with the caller's [`Credential`]. Updates are
/// upserts keyed by record id: only the supplied records change, and each
/// keeps its envelope fields.
pub trait RecordStore: Send + Sync {
    /// Fetch the rider records.
    fn list_riders(&self, credential: &Credential) -> Result<Vec<Rider>, StoreError>;

    /// Fetch the shipment records, newest first.
    fn list_shipments(&self, credential: &Credential) -> Result<Vec<Shipment>, StoreError>;

    /// Write `shipments` back in a single upsert.
    fn update_shipments(
        &self,
        credential: &Credential,
        shipments: &[Shipment],
    ) -> Result<(), StoreError>;
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn list_riders(&self, credential: &Credential) -> Result<Vec<Rider>, StoreError> {
        (**self).list_riders(credential)
    }

    fn list_shipments(&self, credential: &Credential) -> Result<Vec<Shipment>, StoreError> {
        (**self).list_shipments(credential)
    }

    fn update_shipments(
        &self,
        credential: &Credential,
        shipments: &[Shipment],
    ) -> Result<(), StoreError> {
        (**self).update_shipments(credential, shipments)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn list_riders(&self, credential: &Credential) -> Result<Vec<Rider>, StoreError> {
        (**self).list_riders(credential)
    }

    fn list_shipments(&self, credential: &Credential) -> Result<Vec<Shipment>, StoreError> {
        (**self).list_shipments(credential)
    }

    fn update_shipments(
        &self,
        credential: &Credential,
        shipments: &[Shipment],
    ) -> Result<(), StoreError> {
        (**self).update_shipments(credential, shipments)
    }
}
