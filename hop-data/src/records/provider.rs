//! [`RecordStore`] backed by a GraphQL endpoint.

use std::time::Duration;

use hop_core::{Credential, DeliveryStatus, RecordStore, Rider, Shipment, StoreError};
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::graphql::{
    FormDataList, FormRecord, GraphQlRequest, GraphQlResponse, ListVariables, RIDERS_QUERY,
    RiderData, SHIPMENTS_QUERY, ShipmentData, UPSERT_SHIPMENTS, UpsertResult, UpsertVariables,
};
use crate::http::{ClientBuildError, HttpClientConfig, HttpRuntime, decode_error};

/// Maximum number of rider records read per run.
pub const DEFAULT_RIDER_LIMIT: u32 = 50;

/// Maximum number of shipment records read per run.
pub const DEFAULT_SHIPMENT_LIMIT: u32 = 500;

/// Configuration for [`GraphQlRecordStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStoreConfig {
    /// Connection settings; `base_url` is the GraphQL endpoint itself.
    pub http: HttpClientConfig,
    /// Schema id of rider records.
    pub rider_schema_id: String,
    /// Schema id of shipment records.
    pub shipment_schema_id: String,
    /// Maximum number of riders read.
    pub rider_limit: u32,
    /// Maximum number of shipments read.
    pub shipment_limit: u32,
}

impl RecordStoreConfig {
    /// Configuration for the endpoint at `endpoint`.
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        rider_schema_id: impl Into<String>,
        shipment_schema_id: impl Into<String>,
    ) -> Self {
        Self {
            http: HttpClientConfig::new(endpoint),
            rider_schema_id: rider_schema_id.into(),
            shipment_schema_id: shipment_schema_id.into(),
            rider_limit: DEFAULT_RIDER_LIMIT,
            shipment_limit: DEFAULT_SHIPMENT_LIMIT,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Set how many rider and shipment records are read.
    #[must_use]
    pub fn with_limits(mut self, riders: u32, shipments: u32) -> Self {
        self.rider_limit = riders;
        self.shipment_limit = shipments;
        self
    }
}

/// Record store speaking GraphQL over HTTP.
///
/// Every request carries the caller's credential as a bearer token.
#[derive(Debug)]
pub struct GraphQlRecordStore {
    http: HttpRuntime,
    endpoint: Url,
    config: RecordStoreConfig,
}

impl GraphQlRecordStore {
    /// Create a store client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: RecordStoreConfig) -> Result<Self, ClientBuildError> {
        let endpoint = config.http.endpoint("")?;
        let http = HttpRuntime::new(&config.http)?;
        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    async fn execute<V, T>(
        &self,
        credential: &Credential,
        query: &str,
        variables: V,
    ) -> Result<GraphQlResponse<T>, StoreError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let request = GraphQlRequest { query, variables };
        let response = self
            .http
            .client()
            .post(self.endpoint.clone())
            .header(
                reqwest::header::AUTHORIZATION,
                credential.authorization_header(),
            )
            .json(&request)
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

    fn list<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        query: &str,
        schema: &str,
        limit: u32,
    ) -> Result<Vec<FormRecord<T>>, StoreError> {
        let variables = ListVariables { schema, limit };
        let response: GraphQlResponse<FormDataList<T>> =
            self.http.block_on(self.execute(credential, query, variables))?;
        into_data(response).map(|list| list.form_data)
    }
}

/// Unwrap a GraphQL answer, failing on the first reported error.
fn into_data<T>(response: GraphQlResponse<T>) -> Result<T, StoreError> {
    if let Some(first) = response.errors.into_iter().next() {
        return Err(StoreError::Query {
            message: first.message,
        });
    }
    response.data.ok_or(StoreError::MissingData)
}

impl RecordStore for GraphQlRecordStore {
    fn list_riders(&self, credential: &Credential) -> Result<Vec<Rider>, StoreError> {
        let records: Vec<FormRecord<RiderData>> = self.list(
            credential,
            RIDERS_QUERY,
            &self.config.rider_schema_id,
            self.config.rider_limit,
        )?;
        debug!("record store returned {} riders", records.len());
        Ok(records.into_iter().map(Rider::from).collect())
    }

    fn list_shipments(&self, credential: &Credential) -> Result<Vec<Shipment>, StoreError> {
        let records: Vec<FormRecord<ShipmentData>> = self.list(
            credential,
            SHIPMENTS_QUERY,
            &self.config.shipment_schema_id,
            self.config.shipment_limit,
        )?;
        debug!("record store returned {} shipments", records.len());
        let shipments: Vec<Shipment> = records.into_iter().map(Shipment::from).collect();
        for shipment in &shipments {
            if let DeliveryStatus::Other(status) = &shipment.delivery_status {
                warn!(
                    "shipment {} has unknown delivery status {status:?}; it will not be scheduled",
                    shipment.id
                );
            }
        }
        Ok(shipments)
    }

    fn update_shipments(
        &self,
        credential: &Credential,
        shipments: &[Shipment],
    ) -> Result<(), StoreError> {
        if shipments.is_empty() {
            return Ok(());
        }
        let variables = UpsertVariables {
            shipments: shipments.iter().map(FormRecord::from).collect(),
        };
        let response: GraphQlResponse<UpsertResult> = self.http.block_on(self.execute(
            credential,
            UPSERT_SHIPMENTS,
            variables,
        ))?;
        let result = into_data(response)?;
        debug!(
            "record store upserted {} rows",
            result.insert_form_data.affected_rows
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn store() -> GraphQlRecordStore {
        GraphQlRecordStore::with_config(RecordStoreConfig::new(
            "https://store.example.com/v1/graphql",
            "schema-r",
            "schema-s",
        ))
        .expect("store should build")
    }

    fn response(value: serde_json::Value) -> GraphQlResponse<UpsertResult> {
        serde_json::from_value(value).expect("fixture should decode")
    }

    #[rstest]
    fn endpoint_is_used_verbatim(store: GraphQlRecordStore) {
        assert_eq!(
            store.endpoint.as_str(),
            "https://store.example.com/v1/graphql"
        );
        assert_eq!(store.config.rider_limit, DEFAULT_RIDER_LIMIT);
        assert_eq!(store.config.shipment_limit, DEFAULT_SHIPMENT_LIMIT);
    }

    #[rstest]
    fn first_error_message_fails_the_call() {
        let err = into_data(response(json!({
            "data": null,
            "errors": [{"message": "permission denied"}, {"message": "second"}]
        })))
        .expect_err("errors present");
        assert_eq!(
            err,
            StoreError::Query {
                message: "permission denied".to_owned()
            }
        );
    }

    #[rstest]
    fn missing_data_is_reported() {
        let err = into_data(response(json!({}))).expect_err("no data");
        assert_eq!(err, StoreError::MissingData);
    }

    #[rstest]
    fn data_is_returned_without_errors() {
        let result = into_data(response(json!({
            "data": {"insert_form_data": {"affected_rows": 2}}
        })))
        .expect("data present");
        assert_eq!(result.insert_form_data.affected_rows, 2);
    }

    #[rstest]
    fn empty_update_sends_nothing(store: GraphQlRecordStore) {
        let credential = Credential::new("token").expect("valid credential");
        assert_eq!(store.update_shipments(&credential, &[]), Ok(()));
    }

    #[rstest]
    fn limits_are_configurable() {
        let config = RecordStoreConfig::new("https://store.example.com", "r", "s")
            .with_limits(5, 10)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.rider_limit, 5);
        assert_eq!(config.shipment_limit, 10);
        assert_eq!(config.http.timeout, Duration::from_secs(5));
    }
}
