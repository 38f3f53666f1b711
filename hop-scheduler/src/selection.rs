//! Rider and shipment selection heuristics.
//!
//! Selection works on borrowed records and never touches a collaborator, so
//! the whole module is deterministic given the random number generator.

use std::collections::HashSet;

use hop_core::{Rider, ScheduleDate, Shipment};
use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;

/// Identifiers of riders already holding a shipment on `date`.
#[must_use]
pub fn busy_riders(shipments: &[Shipment], date: ScheduleDate) -> HashSet<&str> {
    shipments
        .iter()
        .filter(|shipment| {
            shipment
                .shipment_day
                .as_deref()
                .is_some_and(|day| date.matches(day))
        })
        .filter_map(|shipment| shipment.rider_id.as_deref())
        .filter(|rider_id| !rider_id.is_empty())
        .collect()
}

/// Pick up to `max_riders` riders that are free on `date`.
///
/// The roster is shuffled with `rng` first, so every free rider has the same
/// chance of being picked when more are free than the cap allows.
///
/// # Examples
///
/// ```
/// use hop_core::{Rider, ScheduleDate};
/// use hop_scheduler::selection::select_riders;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// # fn main() -> Result<(), hop_core::ScheduleDateError> {
/// let rider = Rider {
///     id: "r-1".into(),
///     name: "Ada".into(),
///     vehicle_type_id: "cargo-bike".into(),
///     start_address: "Via Zamboni 33".into(),
///     earliest_start: "08:00".into(),
///     latest_end: "17:00".into(),
/// };
/// let riders = [rider];
/// let date = ScheduleDate::parse("2022-05-10")?;
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let picked = select_riders(&riders, date, &[], 2, &mut rng);
/// assert_eq!(picked.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn select_riders<'a, R>(
    riders: &'a [Rider],
    date: ScheduleDate,
    shipments: &[Shipment],
    max_riders: usize,
    rng: &mut R,
) -> Vec<&'a Rider>
where
    R: Rng + ?Sized,
{
    let busy = busy_riders(shipments, date);
    let mut roster: Vec<&Rider> = riders.iter().collect();
    roster.shuffle(rng);
    let selected: Vec<&Rider> = roster
        .into_iter()
        .filter(|rider| !busy.contains(rider.id.as_str()))
        .take(max_riders)
        .collect();
    debug!(
        "selected {} of {} riders for {date} ({} busy)",
        selected.len(),
        riders.len(),
        busy.len()
    );
    selected
}

/// Admit pending shipments, most urgent deadline first, within a budget of
/// distinct addresses.
///
/// Rider start addresses count towards `max_locations`. Admission stops once
/// the address set reaches `max_locations - 1`, which keeps the final count
/// at or below `max_locations` since a shipment adds at most two addresses.
/// Shipments without a usable deadline come after every dated one; ties keep
/// the store's order.
#[must_use]
pub fn select_shipments<'a>(
    shipments: &'a [Shipment],
    riders: &[&'a Rider],
    max_locations: usize,
) -> Vec<&'a Shipment> {
    let mut ordered: Vec<&Shipment> = shipments.iter().collect();
    ordered.sort_by_key(|shipment| {
        let deadline = shipment.deadline_date();
        (deadline.is_none(), deadline)
    });

    let mut locations: HashSet<&str> = riders
        .iter()
        .map(|rider| rider.start_address.as_str())
        .collect();
    let threshold = max_locations.saturating_sub(1);
    let mut admitted = Vec::new();
    for shipment in ordered {
        if locations.len() >= threshold {
            break;
        }
        if !shipment.delivery_status.is_schedulable() {
            continue;
        }
        if shipment.deadline_date().is_none()
            && shipment
                .deadline
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
        {
            warn!(
                "shipment {} has unparseable deadline {:?}; scheduling it last",
                shipment.id, shipment.deadline
            );
        }
        locations.insert(shipment.pickup_address.as_str());
        locations.insert(shipment.delivery_address.as_str());
        admitted.push(shipment);
    }
    debug!(
        "admitted {} shipments covering {} locations",
        admitted.len(),
        locations.len()
    );
    admitted
}

/// Priority bucket of each admitted shipment, in order.
///
/// The first shipment gets priority 1. The bucket grows by one whenever the
/// deadline changes from the previous shipment, up to `max_priority`.
#[must_use]
pub fn assign_priorities(admitted: &[&Shipment], max_priority: u8) -> Vec<u8> {
    let mut priorities = Vec::with_capacity(admitted.len());
    let mut current = 1_u8.min(max_priority);
    let mut previous = None;
    for (position, shipment) in admitted.iter().enumerate() {
        let deadline = shipment.deadline_date();
        if position > 0 && deadline != previous {
            current = current.saturating_add(1).min(max_priority);
        }
        priorities.push(current);
        previous = deadline;
    }
    priorities
}

#[cfg(test)]
mod tests {
    use super::*;
    use hop_core::DeliveryStatus;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    fn rider(id: &str, start: &str) -> Rider {
        Rider {
            id: id.to_owned(),
            name: format!("Rider {id}"),
            vehicle_type_id: "cargo-bike".to_owned(),
            start_address: start.to_owned(),
            earliest_start: "08:00".to_owned(),
            latest_end: "17:00".to_owned(),
        }
    }

    fn shipment(id: &str, deadline: Option<&str>, status: DeliveryStatus) -> Shipment {
        Shipment {
            id: id.to_owned(),
            size: 1,
            pickup_address: format!("pickup {id}"),
            delivery_address: format!("delivery {id}"),
            deadline: deadline.map(str::to_owned),
            delivery_status: status,
            ..Shipment::default()
        }
    }

    fn booked(id: &str, rider_id: &str, day: &str) -> Shipment {
        Shipment {
            rider_id: Some(rider_id.to_owned()),
            shipment_day: Some(day.to_owned()),
            ..shipment(id, None, DeliveryStatus::Scheduled)
        }
    }

    #[fixture]
    fn date() -> ScheduleDate {
        ScheduleDate::parse("2022-05-10").expect("valid date")
    }

    #[rstest]
    fn busy_riders_only_counts_the_target_day(date: ScheduleDate) {
        let shipments = [
            booked("s-1", "r-1", "2022-05-10"),
            booked("s-2", "r-2", "2022-05-11"),
        ];
        let busy = busy_riders(&shipments, date);
        assert_eq!(busy, HashSet::from(["r-1"]));
    }

    #[rstest]
    fn free_rider_is_the_only_pick(date: ScheduleDate) {
        let riders = [rider("r-1", "a"), rider("r-2", "b"), rider("r-3", "c")];
        let shipments = [
            booked("s-1", "r-1", "2022-05-10"),
            booked("s-2", "r-3", "2022-05-10"),
        ];
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let picked = select_riders(&riders, date, &shipments, 2, &mut rng);
            let ids: Vec<&str> = picked.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, ["r-2"]);
        }
    }

    #[rstest]
    fn rider_cap_is_respected(date: ScheduleDate) {
        let riders: Vec<Rider> = (0..6).map(|i| rider(&format!("r-{i}"), "x")).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let picked = select_riders(&riders, date, &[], 2, &mut rng);
        assert_eq!(picked.len(), 2);
        assert_ne!(picked.first().map(|r| &r.id), picked.get(1).map(|r| &r.id));
    }

    #[rstest]
    fn everyone_busy_yields_nobody(date: ScheduleDate) {
        let riders = [rider("r-1", "a")];
        let shipments = [booked("s-1", "r-1", "2022-05-10")];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(select_riders(&riders, date, &shipments, 2, &mut rng).is_empty());
    }

    #[rstest]
    fn unknown_status_is_never_admitted() {
        let shipments = [
            shipment("odd", Some("2022-05-11"), DeliveryStatus::Other("in_transit".to_owned())),
            shipment("pending", Some("2022-05-12"), DeliveryStatus::ToBeScheduled),
        ];
        let start = rider("r-1", "depot");
        let admitted = select_shipments(&shipments, &[&start], 30);
        let ids: Vec<&str> = admitted.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["pending"]);
    }

    #[rstest]
    fn shipments_are_ordered_by_deadline_with_missing_last() {
        let shipments = [
            shipment("none", None, DeliveryStatus::ToBeScheduled),
            shipment("late", Some("2022-06-01"), DeliveryStatus::ToBeScheduled),
            shipment("bad", Some("soon"), DeliveryStatus::Unset),
            shipment("early", Some("2022-05-12"), DeliveryStatus::ToBeScheduled),
        ];
        let start = rider("r-1", "depot");
        let admitted = select_shipments(&shipments, &[&start], 30);
        let ids: Vec<&str> = admitted.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["early", "late", "none", "bad"]);
    }

    #[rstest]
    #[case(DeliveryStatus::Scheduled)]
    #[case(DeliveryStatus::Delivered)]
    #[case(DeliveryStatus::Canceled)]
    fn settled_shipments_are_never_admitted(#[case] status: DeliveryStatus) {
        let shipments = [
            shipment("settled", Some("2022-05-01"), status),
            shipment("pending", Some("2022-05-02"), DeliveryStatus::ToBeScheduled),
        ];
        let start = rider("r-1", "depot");
        let admitted = select_shipments(&shipments, &[&start], 30);
        let ids: Vec<&str> = admitted.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["pending"]);
    }

    #[rstest]
    fn location_budget_counts_rider_starts() {
        let shipments: Vec<Shipment> = (0..40)
            .map(|i| shipment(&format!("s-{i:02}"), None, DeliveryStatus::ToBeScheduled))
            .collect();
        let first = rider("r-1", "depot a");
        let second = rider("r-2", "depot b");
        let admitted = select_shipments(&shipments, &[&first, &second], 30);
        // Two starts plus two addresses per shipment: stop at 30 locations.
        assert_eq!(admitted.len(), 14);
    }

    #[rstest]
    fn shared_addresses_stretch_the_budget() {
        let shipments: Vec<Shipment> = (0..40)
            .map(|i| Shipment {
                pickup_address: "warehouse".to_owned(),
                ..shipment(&format!("s-{i:02}"), None, DeliveryStatus::Unset)
            })
            .collect();
        let start = rider("r-1", "warehouse");
        let admitted = select_shipments(&shipments, &[&start], 30);
        // The shared pickup counts once: 1 + 28 deliveries reach the threshold.
        assert_eq!(admitted.len(), 28);
    }

    #[rstest]
    fn priorities_follow_deadline_groups() {
        let shipments = [
            shipment("a", Some("2022-05-10"), DeliveryStatus::ToBeScheduled),
            shipment("b", Some("2022-05-10"), DeliveryStatus::ToBeScheduled),
            shipment("c", Some("2022-05-11"), DeliveryStatus::ToBeScheduled),
            shipment("d", None, DeliveryStatus::ToBeScheduled),
            shipment("e", None, DeliveryStatus::ToBeScheduled),
        ];
        let refs: Vec<&Shipment> = shipments.iter().collect();
        assert_eq!(assign_priorities(&refs, 10), [1, 1, 2, 3, 3]);
    }

    #[rstest]
    fn priorities_saturate_at_the_maximum() {
        let shipments: Vec<Shipment> = (1..=5)
            .map(|day| {
                let deadline = format!("2022-05-0{day}");
                shipment(
                    &format!("s-{day}"),
                    Some(deadline.as_str()),
                    DeliveryStatus::ToBeScheduled,
                )
            })
            .collect();
        let refs: Vec<&Shipment> = shipments.iter().collect();
        assert_eq!(assign_priorities(&refs, 3), [1, 2, 3, 3, 3]);
    }
}
