//! Rider and shipment records held behind a GraphQL API.

mod graphql;
mod provider;

pub use provider::{
    DEFAULT_RIDER_LIMIT, DEFAULT_SHIPMENT_LIMIT, GraphQlRecordStore, RecordStoreConfig,
};
