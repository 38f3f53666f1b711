//! Apply a routing solution to the admitted shipments.

use std::collections::{HashMap, HashSet};

use hop_core::solution::{Activity, ActivityKind, SolutionRoute};
use hop_core::{ClockTime, DeliveryStatus, Rider, ScheduleDate, Shipment, Solution};
use log::{debug, warn};

use crate::ScheduleError;

/// Write the solver's assignments onto copies of the admitted shipments.
///
/// A pickup marks the shipment scheduled for `date` with the route's rider
/// and the pickup time. A delivery records the delivery time of a shipment
/// picked up earlier in the same solution; a delivery without one is ignored.
/// Shipments the solver left unassigned stay as they were.
///
/// Returns the shipments that became scheduled, in admission order. A route
/// for a rider that was not offered, or an activity for a shipment that was
/// not submitted, is reported as [`ScheduleError::UnexpectedSolution`].
pub fn reconcile(
    date: ScheduleDate,
    riders: &[&Rider],
    admitted: &[&Shipment],
    solution: &Solution,
) -> Result<Vec<Shipment>, ScheduleError> {
    let mut ledger = Ledger::new(date, admitted);
    let roster: HashMap<&str, &Rider> = riders
        .iter()
        .map(|rider| (rider.id.as_str(), *rider))
        .collect();
    for route in &solution.routes {
        let rider = roster
            .get(route.vehicle_id.as_str())
            .ok_or_else(|| unexpected(format!("route for unknown rider {}", route.vehicle_id)))?;
        ledger.apply_route(rider, route)?;
    }
    if !solution.unassigned.shipments.is_empty() {
        warn!(
            "routing left {} shipments unassigned: {}",
            solution.unassigned.shipments.len(),
            solution.unassigned.shipments.join(", ")
        );
    }
    Ok(ledger.into_scheduled())
}

fn unexpected(reason: String) -> ScheduleError {
    ScheduleError::UnexpectedSolution { reason }
}

struct Ledger {
    date: ScheduleDate,
    shipments: Vec<Shipment>,
    positions: HashMap<String, usize>,
    picked_up: HashSet<usize>,
}

impl Ledger {
    fn new(date: ScheduleDate, admitted: &[&Shipment]) -> Self {
        let shipments: Vec<Shipment> = admitted.iter().map(|shipment| (*shipment).clone()).collect();
        let positions = shipments
            .iter()
            .enumerate()
            .map(|(position, shipment)| (shipment.id.clone(), position))
            .collect();
        Self {
            date,
            shipments,
            positions,
            picked_up: HashSet::new(),
        }
    }

    fn apply_route(&mut self, rider: &Rider, route: &SolutionRoute) -> Result<(), ScheduleError> {
        for activity in &route.activities {
            match activity.kind {
                ActivityKind::Pickup => self.pick_up(rider, activity)?,
                ActivityKind::Delivery => self.deliver(activity)?,
                ActivityKind::Start | ActivityKind::End => {}
                ActivityKind::Other(ref kind) => {
                    debug!("ignoring {kind:?} activity on route of rider {}", rider.id);
                }
            }
        }
        Ok(())
    }

    fn pick_up(&mut self, rider: &Rider, activity: &Activity) -> Result<(), ScheduleError> {
        let (position, time) = self.locate(activity)?;
        let day = self.date.to_string();
        let shipment = self.shipment_mut(position)?;
        shipment.delivery_status = DeliveryStatus::Scheduled;
        shipment.rider_id = Some(rider.id.clone());
        shipment.rider_name = Some(rider.name.clone());
        shipment.shipment_day = Some(day);
        shipment.pickup_time = Some(time.to_string());
        self.picked_up.insert(position);
        Ok(())
    }

    fn deliver(&mut self, activity: &Activity) -> Result<(), ScheduleError> {
        let (position, time) = self.locate(activity)?;
        if !self.picked_up.contains(&position) {
            warn!(
                "ignoring delivery of shipment {} that was not picked up",
                activity.job_id.as_deref().unwrap_or_default()
            );
            return Ok(());
        }
        self.shipment_mut(position)?.delivery_time = Some(time.to_string());
        Ok(())
    }

    fn locate(&self, activity: &Activity) -> Result<(usize, ClockTime), ScheduleError> {
        let Some(job_id) = activity.job_id.as_deref() else {
            return Err(unexpected(format!(
                "{} activity without a shipment id",
                String::from(activity.kind.clone())
            )));
        };
        let position = *self
            .positions
            .get(job_id)
            .ok_or_else(|| unexpected(format!("activity for unknown shipment {job_id}")))?;
        let time = ClockTime::from_seconds(activity.time())
            .map_err(|err| unexpected(format!("activity for shipment {job_id}: {err}")))?;
        Ok((position, time))
    }

    fn shipment_mut(&mut self, position: usize) -> Result<&mut Shipment, ScheduleError> {
        self.shipments
            .get_mut(position)
            .ok_or_else(|| unexpected(format!("no admitted shipment at position {position}")))
    }

    fn into_scheduled(self) -> Vec<Shipment> {
        self.shipments
            .into_iter()
            .filter(|shipment| shipment.delivery_status == DeliveryStatus::Scheduled)
            .collect()
    }
}
