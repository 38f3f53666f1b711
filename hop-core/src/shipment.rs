//! Shipments awaiting, or already given, a delivery slot.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::RiderId;
use crate::time::parse_deadline;

/// Opaque identifier of a shipment record.
pub type ShipmentId = String;

/// Delivery state of a shipment.
///
/// On the wire the states are `""`, `"to_be_scheduled"`, `"scheduled"`,
/// `"delivered"` and `"canceled"`; a missing or `null` value is
/// [`DeliveryStatus::Unset`]. Any other text decodes to
/// [`DeliveryStatus::Other`] and is written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum DeliveryStatus {
    /// No status recorded yet.
    #[default]
    Unset,
    /// Waiting for a scheduling run.
    ToBeScheduled,
    /// Assigned to a rider and a day.
    Scheduled,
    /// Delivered to the recipient.
    Delivered,
    /// Withdrawn by the sender.
    Canceled,
    /// A state this crate does not know, kept verbatim.
    Other(String),
}

impl DeliveryStatus {
    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Unset => "",
            Self::ToBeScheduled => "to_be_scheduled",
            Self::Scheduled => "scheduled",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
            Self::Other(text) => text.as_str(),
        }
    }

    /// Whether a scheduling run may pick the shipment up.
    ///
    /// Unknown states are never schedulable.
    #[must_use]
    pub const fn is_schedulable(&self) -> bool {
        matches!(self, Self::Unset | Self::ToBeScheduled)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for DeliveryStatus {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" => Self::Unset,
            "to_be_scheduled" => Self::ToBeScheduled,
            "scheduled" => Self::Scheduled,
            "delivered" => Self::Delivered,
            "canceled" => Self::Canceled,
            _ => Self::Other(value.to_owned()),
        }
    }
}

impl From<Option<String>> for DeliveryStatus {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Unset, |text| Self::from(text.as_str()))
    }
}

impl From<DeliveryStatus> for String {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Other(text) => text,
            known => known.as_str().to_owned(),
        }
    }
}

/// Record envelope fields that travel with a shipment but carry no
/// scheduling meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMeta {
    /// Owner reference of the record.
    pub owner: Option<String>,
    /// Schema the record belongs to.
    pub schema: Option<String>,
    /// Record data keys the scheduler does not model.
    ///
    /// Updates replace the whole record, so these are written back as read.
    pub extra: Map<String, Value>,
}

/// A shipment as held by the record store.
///
/// The scheduling fields (`rider_id` through `delivery_status`) are the only
/// ones a scheduling run writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shipment {
    /// Record identifier.
    pub id: ShipmentId,
    /// Envelope data preserved across updates.
    pub meta: RecordMeta,
    /// Parcel size in capacity units.
    pub size: u32,
    /// Address the parcel is collected from.
    pub pickup_address: String,
    /// Address the parcel is delivered to.
    pub delivery_address: String,
    /// Free-text notes (recipient, contacts).
    pub notes: String,
    /// Delivery deadline as stored, `YYYY-MM-DD`.
    pub deadline: Option<String>,
    /// Latest delivery time on the day, `HH:MM`.
    pub latest_delivery_time: Option<String>,
    /// Identifier of the assigned rider.
    pub rider_id: Option<RiderId>,
    /// Display name of the assigned rider.
    pub rider_name: Option<String>,
    /// Day the shipment is scheduled for, `YYYY-MM-DD`.
    pub shipment_day: Option<String>,
    /// Planned pickup time, `HH:MM`.
    pub pickup_time: Option<String>,
    /// Planned delivery time, `HH:MM`.
    pub delivery_time: Option<String>,
    /// Current delivery state.
    pub delivery_status: DeliveryStatus,
}

impl Shipment {
    /// The deadline as a calendar date.
    ///
    /// Returns `None` when no deadline is set or the stored text is not a
    /// `YYYY-MM-DD` date.
    #[must_use]
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        self.deadline.as_deref().and_then(parse_deadline)
    }
}
