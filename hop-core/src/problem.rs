//! Vehicle routing problem as submitted to the routing service.
//!
//! Field names follow the service's JSON contract. Times are seconds since
//! local midnight of the scheduled day.

use serde::{Deserialize, Serialize};

use crate::Location;

/// Identifier of the only vehicle type offered to the solver.
pub const CARGO_BIKE_TYPE_ID: &str = "cargo-bike";

/// A complete routing problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Vehicles available, one per selected rider.
    pub vehicles: Vec<Vehicle>,
    /// Vehicle types referenced by `vehicles`.
    pub vehicle_types: Vec<VehicleType>,
    /// Pickup and delivery jobs to plan.
    pub shipments: Vec<ShipmentJob>,
}

impl Problem {
    /// Whether there is nothing to plan.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vehicles.is_empty() || self.shipments.is_empty()
    }
}

/// A rider's vehicle for the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Rider identifier; routes in the solution refer back to it.
    #[serde(rename = "vehicle_id")]
    pub id: String,
    /// Vehicle type identifier.
    pub type_id: String,
    /// Where the rider starts.
    pub start_address: Address,
    /// Shift start in seconds.
    pub earliest_start: u32,
    /// Shift end in seconds.
    pub latest_end: u32,
}

/// A geocoded address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Address text as held in the record.
    pub location_id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Address {
    /// Pair an address text with its resolved location.
    #[must_use]
    pub fn new(text: impl Into<String>, location: Location) -> Self {
        Self {
            location_id: text.into(),
            lat: location.y,
            lon: location.x,
        }
    }
}

/// Capacity and speed profile of a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleType {
    /// Type identifier.
    pub type_id: String,
    /// Carrying capacity in size units.
    pub capacity: [u32; 1],
    /// Routing profile name.
    pub profile: String,
    /// Multiplier applied to the profile's travel speed.
    pub speed_factor: f64,
}

impl VehicleType {
    /// The cargo bike used for every rider.
    #[must_use]
    pub fn cargo_bike() -> Self {
        Self {
            type_id: CARGO_BIKE_TYPE_ID.to_owned(),
            capacity: [1_000],
            profile: "bike".to_owned(),
            speed_factor: 0.7,
        }
    }
}

impl Default for VehicleType {
    fn default() -> Self {
        Self::cargo_bike()
    }
}

/// A pickup and delivery pair for one shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentJob {
    /// Shipment identifier.
    pub id: String,
    /// Parcel size in capacity units.
    pub size: [u32; 1],
    /// Where the parcel is collected.
    pub pickup: Leg,
    /// Where the parcel is dropped off.
    pub delivery: Leg,
    /// Solver priority, 1 being the most urgent.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: u8,
}

const fn is_zero(value: &u8) -> bool {
    *value == 0
}

/// One stop of a shipment job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Stop address.
    pub address: Address,
    /// Service time at the stop in seconds.
    pub preparation_time: u32,
    /// Allowed arrival windows; empty means unconstrained.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_windows: Vec<TimeWindow>,
}

/// Arrival window in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Earliest arrival.
    pub earliest: u32,
    /// Latest arrival.
    pub latest: u32,
}
