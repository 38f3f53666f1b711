//! Records and command lines shared by the CLI tests.

use hop_core::{DeliveryStatus, Rider, Shipment};

pub(super) const TARGET_DAY: &str = "2022-05-10";
pub(super) const STORE_URL: &str = "https://store.example.com/v1/graphql";

pub(super) fn rider(id: &str) -> Rider {
    Rider {
        id: id.to_owned(),
        name: format!("Rider {id}"),
        vehicle_type_id: "cargo-bike".to_owned(),
        start_address: "Via Zamboni 33, Bologna".to_owned(),
        earliest_start: "08:00".to_owned(),
        latest_end: "18:00".to_owned(),
    }
}

pub(super) fn pending(id: &str, deadline: Option<&str>) -> Shipment {
    Shipment {
        id: id.to_owned(),
        size: 1,
        pickup_address: format!("Via Irnerio {id}, Bologna"),
        delivery_address: format!("Via Saragozza {id}, Bologna"),
        deadline: deadline.map(str::to_owned),
        delivery_status: DeliveryStatus::ToBeScheduled,
        ..Shipment::default()
    }
}

/// A shipment already assigned to `rider_id` on the target day.
pub(super) fn assigned(id: &str, rider_id: &str) -> Shipment {
    Shipment {
        rider_id: Some(rider_id.to_owned()),
        shipment_day: Some(TARGET_DAY.to_owned()),
        delivery_status: DeliveryStatus::Scheduled,
        ..pending(id, None)
    }
}

/// Full `hop schedule` invocation for `date`, minus the credential.
pub(super) fn command_line(date: &str) -> Vec<String> {
    [
        "hop",
        "schedule",
        "--date",
        date,
        "--geocoding-key",
        "geo-key",
        "--routing-key",
        "vrp-key",
        "--store-url",
        STORE_URL,
        "--rider-schema",
        "schema-r",
        "--shipment-schema",
        "schema-s",
        "--seed",
        "7",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}
