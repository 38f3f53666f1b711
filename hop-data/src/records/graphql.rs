//! GraphQL payloads exchanged with the record store.
//!
//! Records live in a generic `form_data` table: each row has an envelope
//! (`id`, `user_data_ref_id`, `schema_id`) and a JSON `data` column whose
//! shape depends on the schema.

use hop_core::{DeliveryStatus, RecordMeta, Rider, Shipment};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub(crate) const RIDERS_QUERY: &str = "query Riders($schema: uuid!, $limit: Int!) {
  form_data(
    where: {_and: [{schema_id: {_eq: $schema}}, {is_deleted: {_eq: false}}]},
    limit: $limit
  ) { id user_data_ref_id schema_id data }
}";

pub(crate) const SHIPMENTS_QUERY: &str = "query Shipments($schema: uuid!, $limit: Int!) {
  form_data(
    where: {_and: [{schema_id: {_eq: $schema}}, {is_deleted: {_eq: false}}]},
    order_by: [{created_at: desc}],
    limit: $limit
  ) { id user_data_ref_id schema_id data }
}";

pub(crate) const UPSERT_SHIPMENTS: &str = "mutation UpsertShipments($shipments: [form_data_insert_input!]!) {
  insert_form_data(
    objects: $shipments,
    on_conflict: {constraint: form_data_pkey, update_columns: [data]}
  ) { affected_rows }
}";

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a, V> {
    pub(crate) query: &'a str,
    pub(crate) variables: V,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListVariables<'a> {
    pub(crate) schema: &'a str,
    pub(crate) limit: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpsertVariables {
    pub(crate) shipments: Vec<FormRecord<ShipmentData>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub(crate) data: Option<T>,
    #[serde(default)]
    pub(crate) errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub(crate) message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FormDataList<T> {
    pub(crate) form_data: Vec<FormRecord<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpsertResult {
    pub(crate) insert_form_data: AffectedRows,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AffectedRows {
    pub(crate) affected_rows: u64,
}

/// One `form_data` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FormRecord<T> {
    pub(crate) id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) user_data_ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) schema_id: Option<String>,
    pub(crate) data: T,
}

/// `data` column of a rider row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct RiderData {
    pub(crate) name: String,
    pub(crate) vehicle_type_id: String,
    pub(crate) start_address: String,
    pub(crate) earliest_start: String,
    pub(crate) latest_end: String,
}

/// `data` column of a shipment row.
///
/// Blank optional strings read as absent and absent values are not written.
/// Keys outside the modelled fields are collected in `extra` and written back
/// as read, since an upsert replaces the whole column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ShipmentData {
    #[serde(default)]
    pub(crate) size: u32,
    #[serde(default)]
    pub(crate) pickup_address: String,
    #[serde(default)]
    pub(crate) delivery_address: String,
    #[serde(default)]
    pub(crate) notes: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) deadline: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) latest_delivery_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) rider_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) rider_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) shipment_day: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) pickup_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) delivery_time: Option<String>,
    #[serde(default)]
    pub(crate) delivery_status: DeliveryStatus,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

impl From<FormRecord<RiderData>> for Rider {
    fn from(record: FormRecord<RiderData>) -> Self {
        let FormRecord { id, data, .. } = record;
        Self {
            id,
            name: data.name,
            vehicle_type_id: data.vehicle_type_id,
            start_address: data.start_address,
            earliest_start: data.earliest_start,
            latest_end: data.latest_end,
        }
    }
}

impl From<FormRecord<ShipmentData>> for Shipment {
    fn from(record: FormRecord<ShipmentData>) -> Self {
        let FormRecord {
            id,
            user_data_ref_id,
            schema_id,
            data,
        } = record;
        Self {
            id,
            meta: RecordMeta {
                owner: user_data_ref_id,
                schema: schema_id,
                extra: data.extra,
            },
            size: data.size,
            pickup_address: data.pickup_address,
            delivery_address: data.delivery_address,
            notes: data.notes,
            deadline: data.deadline,
            latest_delivery_time: data.latest_delivery_time,
            rider_id: data.rider_id,
            rider_name: data.rider_name,
            shipment_day: data.shipment_day,
            pickup_time: data.pickup_time,
            delivery_time: data.delivery_time,
            delivery_status: data.delivery_status,
        }
    }
}

impl From<&Shipment> for FormRecord<ShipmentData> {
    fn from(shipment: &Shipment) -> Self {
        Self {
            id: shipment.id.clone(),
            user_data_ref_id: shipment.meta.owner.clone(),
            schema_id: shipment.meta.schema.clone(),
            data: ShipmentData {
                size: shipment.size,
                pickup_address: shipment.pickup_address.clone(),
                delivery_address: shipment.delivery_address.clone(),
                notes: shipment.notes.clone(),
                deadline: shipment.deadline.clone(),
                latest_delivery_time: shipment.latest_delivery_time.clone(),
                rider_id: shipment.rider_id.clone(),
                rider_name: shipment.rider_name.clone(),
                shipment_day: shipment.shipment_day.clone(),
                pickup_time: shipment.pickup_time.clone(),
                delivery_time: shipment.delivery_time.clone(),
                delivery_status: shipment.delivery_status.clone(),
                extra: shipment.meta.extra.clone(),
            },
        }
    }
}
