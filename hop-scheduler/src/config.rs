//! Tunables of a scheduling run.

use std::time::Duration;

use hop_core::problem::VehicleType;

/// Configuration for [`Scheduler`](crate::Scheduler).
///
/// The defaults match the limits of the hosted routing plan: two riders and
/// thirty distinct locations per run.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Maximum number of riders offered to the solver.
    pub max_riders: usize,
    /// Maximum number of distinct addresses submitted, rider starts included.
    pub max_locations: usize,
    /// Highest priority bucket handed out.
    pub max_priority: u8,
    /// Service time at a pickup.
    pub pickup_preparation: Duration,
    /// Service time at a delivery.
    pub delivery_preparation: Duration,
    /// Vehicle type used for every rider.
    pub vehicle_type: VehicleType,
    /// Seed for the rider shuffle; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_riders: 2,
            max_locations: 30,
            max_priority: 10,
            pickup_preparation: Duration::from_secs(15 * 60),
            delivery_preparation: Duration::from_secs(5 * 60),
            vehicle_type: VehicleType::cargo_bike(),
            seed: None,
        }
    }
}

impl SchedulerConfig {
    /// Override the rider cap.
    #[must_use]
    pub const fn with_max_riders(mut self, max_riders: usize) -> Self {
        self.max_riders = max_riders;
        self
    }

    /// Override the location budget.
    #[must_use]
    pub const fn with_max_locations(mut self, max_locations: usize) -> Self {
        self.max_locations = max_locations;
        self
    }

    /// Override the highest priority bucket.
    #[must_use]
    pub const fn with_max_priority(mut self, max_priority: u8) -> Self {
        self.max_priority = max_priority;
        self
    }

    /// Override the vehicle type.
    #[must_use]
    pub fn with_vehicle_type(mut self, vehicle_type: VehicleType) -> Self {
        self.vehicle_type = vehicle_type;
        self
    }

    /// Fix the rider shuffle seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn pickup_preparation_secs(&self) -> u32 {
        saturating_secs(self.pickup_preparation)
    }

    pub(crate) fn delivery_preparation_secs(&self) -> u32 {
        saturating_secs(self.delivery_preparation)
    }
}

fn saturating_secs(duration: Duration) -> u32 {
    u32::try_from(duration.as_secs()).unwrap_or(u32::MAX)
}
