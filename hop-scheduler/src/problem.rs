//! Translate selected records into a routing problem.

use hop_core::problem::{Address, Leg, ShipmentJob, TimeWindow, Vehicle};
use hop_core::{AddressResolver, ClockTime, Problem, Rider, Shipment};
use log::debug;

use crate::{ProblemError, ScheduleError, SchedulerConfig};

/// Build the routing problem for the selected riders and admitted shipments.
///
/// `priorities` pairs up with `shipments` by position. Every address is
/// resolved through `resolver`; the first failure aborts construction and
/// names the rider or shipment it came from.
pub fn build_problem<A>(
    resolver: &A,
    config: &SchedulerConfig,
    riders: &[&Rider],
    shipments: &[&Shipment],
    priorities: &[u8],
) -> Result<Problem, ScheduleError>
where
    A: AddressResolver + ?Sized,
{
    let vehicles = riders
        .iter()
        .map(|rider| {
            vehicle_for(resolver, config, rider).map_err(|source| ScheduleError::Rider {
                rider_id: rider.id.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let jobs = shipments
        .iter()
        .enumerate()
        .map(|(position, shipment)| {
            let priority = priorities
                .get(position)
                .copied()
                .unwrap_or(config.max_priority);
            job_for(resolver, config, shipment, priority).map_err(|source| {
                ScheduleError::Shipment {
                    shipment_id: shipment.id.clone(),
                    source,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Problem {
        vehicles,
        vehicle_types: vec![config.vehicle_type.clone()],
        shipments: jobs,
    })
}

fn vehicle_for<A>(
    resolver: &A,
    config: &SchedulerConfig,
    rider: &Rider,
) -> Result<Vehicle, ProblemError>
where
    A: AddressResolver + ?Sized,
{
    let location = resolver.resolve(&rider.start_address)?;
    let (start, end) = rider.shift()?;
    let type_id = &config.vehicle_type.type_id;
    if !rider.vehicle_type_id.is_empty() && rider.vehicle_type_id != *type_id {
        debug!(
            "rider {} declares vehicle type {:?}; planning with {type_id:?}",
            rider.id, rider.vehicle_type_id
        );
    }
    Ok(Vehicle {
        id: rider.id.clone(),
        type_id: type_id.clone(),
        start_address: Address::new(rider.start_address.as_str(), location),
        earliest_start: start.seconds(),
        latest_end: end.seconds(),
    })
}

fn job_for<A>(
    resolver: &A,
    config: &SchedulerConfig,
    shipment: &Shipment,
    priority: u8,
) -> Result<ShipmentJob, ProblemError>
where
    A: AddressResolver + ?Sized,
{
    let pickup = resolver.resolve(&shipment.pickup_address)?;
    let delivery = resolver.resolve(&shipment.delivery_address)?;
    let delivery_windows = match shipment
        .latest_delivery_time
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
    {
        Some(text) => vec![TimeWindow {
            earliest: 0,
            latest: ClockTime::parse(text)?.seconds(),
        }],
        None => Vec::new(),
    };
    Ok(ShipmentJob {
        id: shipment.id.clone(),
        size: [shipment.size],
        pickup: Leg {
            address: Address::new(shipment.pickup_address.as_str(), pickup),
            preparation_time: config.pickup_preparation_secs(),
            time_windows: Vec::new(),
        },
        delivery: Leg {
            address: Address::new(shipment.delivery_address.as_str(), delivery),
            preparation_time: config.delivery_preparation_secs(),
            time_windows: delivery_windows,
        },
        priority,
    })
}
