//! Routes returned by the routing service.

use serde::{Deserialize, Serialize};

use crate::problem::Address;

/// Planned routes plus the shipments the solver could not place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// One route per vehicle used.
    #[serde(default)]
    pub routes: Vec<SolutionRoute>,
    /// Jobs left out of every route.
    #[serde(default)]
    pub unassigned: Unassigned,
}

/// Ordered activities of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionRoute {
    /// Vehicle, and therefore rider, identifier.
    pub vehicle_id: String,
    /// Activities in visiting order.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// A single stop on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// What happens at the stop.
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Shipment the stop belongs to; absent for start and end.
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Where the stop is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Arrival in seconds since midnight.
    #[serde(rename = "arr_time", default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<i64>,
    /// Departure in seconds since midnight.
    #[serde(rename = "end_time", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl Activity {
    /// Time the activity takes place.
    ///
    /// The arrival time when it is set and non-zero, otherwise the end time.
    #[must_use]
    pub const fn time(&self) -> i64 {
        match (self.arrival, self.end) {
            (Some(arrival), _) if arrival != 0 => arrival,
            (_, Some(end)) => end,
            _ => 0,
        }
    }
}

/// Kind of a route activity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityKind {
    /// Route start at the rider's address.
    Start,
    /// Route end.
    End,
    /// Parcel collected.
    Pickup,
    /// Parcel handed over.
    Delivery,
    /// Any other activity type reported by the service.
    Other(String),
}

impl From<String> for ActivityKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "start" => Self::Start,
            "end" => Self::End,
            "pickupShipment" => Self::Pickup,
            "deliverShipment" => Self::Delivery,
            _ => Self::Other(value),
        }
    }
}

impl From<ActivityKind> for String {
    fn from(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::Start => "start".to_owned(),
            ActivityKind::End => "end".to_owned(),
            ActivityKind::Pickup => "pickupShipment".to_owned(),
            ActivityKind::Delivery => "deliverShipment".to_owned(),
            ActivityKind::Other(value) => value,
        }
    }
}

/// Jobs the solver left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unassigned {
    /// Identifiers of unplaced shipments.
    #[serde(default)]
    pub shipments: Vec<String>,
}
