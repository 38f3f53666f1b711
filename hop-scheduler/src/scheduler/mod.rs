//! The scheduling run orchestrator.

use std::sync::{Arc, Mutex, PoisonError};

use hop_core::{AddressResolver, Credential, RecordStore, RouteSolver, ScheduleDate};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::selection::{assign_priorities, select_riders, select_shipments};
use crate::{
    RunSerializer, ScheduleError, ScheduleOutcome, SchedulerConfig, build_problem, reconcile,
};

/// Object-safe handle on a scheduler, for callers that do not care which
/// collaborators it was built with.
pub trait ScheduleRunner: Send + Sync {
    /// Schedule pending shipments for `date`; see [`Scheduler::run_schedule`].
    fn run_schedule(&self, date: &str, credential: &str)
    -> Result<ScheduleOutcome, ScheduleError>;
}

/// Plans a day of deliveries.
///
/// The scheduler is generic over its three collaborators: an address
/// resolver, a route solver and a record store. Runs through the same
/// scheduler, or through schedulers sharing a [`RunSerializer`], never
/// overlap.
pub struct Scheduler<A, S, D>
where
    A: AddressResolver,
    S: RouteSolver,
    D: RecordStore,
{
    resolver: A,
    solver: S,
    store: D,
    serializer: Arc<RunSerializer>,
    config: SchedulerConfig,
    rng: Mutex<ChaCha8Rng>,
}

impl<A, S, D> Scheduler<A, S, D>
where
    A: AddressResolver,
    S: RouteSolver,
    D: RecordStore,
{
    /// Construct a scheduler using default configuration.
    #[must_use]
    pub fn new(resolver: A, solver: S, store: D) -> Self {
        Self::with_config(resolver, solver, store, SchedulerConfig::default())
    }

    /// Construct a scheduler with explicit configuration.
    #[must_use]
    pub fn with_config(resolver: A, solver: S, store: D, config: SchedulerConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        Self {
            resolver,
            solver,
            store,
            serializer: Arc::new(RunSerializer::new()),
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Share `serializer` with other schedulers writing the same records.
    #[must_use]
    pub fn with_serializer(mut self, serializer: Arc<RunSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedule pending shipments for `date`.
    ///
    /// `date` must be a `YYYY-MM-DD` calendar day and `credential` a
    /// non-empty bearer token; both are checked before any collaborator is
    /// called. The run then waits for the run slot, reads riders and
    /// shipments, and persists exactly the shipments that became scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] when validation fails or a collaborator
    /// fails. Nothing is written in that case.
    pub fn run_schedule(
        &self,
        date: &str,
        credential: &str,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        let target = ScheduleDate::parse(date)?;
        let bearer = Credential::new(credential)?;
        self.serializer.run(|| {
            info!("scheduling run for {target} started");
            let outcome = self.run_exclusive(target, &bearer);
            match &outcome {
                Ok(done) => info!("scheduling run for {target} finished: {}", summary(done)),
                Err(err) => info!("scheduling run for {target} failed: {err}"),
            }
            outcome
        })
    }

    fn run_exclusive(
        &self,
        date: ScheduleDate,
        credential: &Credential,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        let riders = self
            .store
            .list_riders(credential)
            .map_err(ScheduleError::ListRiders)?;
        let shipments = self
            .store
            .list_shipments(credential)
            .map_err(ScheduleError::ListShipments)?;

        let available = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            select_riders(&riders, date, &shipments, self.config.max_riders, &mut *rng)
        };
        if available.is_empty() {
            return Ok(ScheduleOutcome::NoRiderAvailable);
        }
        let admitted = select_shipments(&shipments, &available, self.config.max_locations);
        if admitted.is_empty() {
            return Ok(ScheduleOutcome::NoShipmentToSchedule);
        }
        let priorities = assign_priorities(&admitted, self.config.max_priority);

        let problem = build_problem(
            &self.resolver,
            &self.config,
            &available,
            &admitted,
            &priorities,
        )?;
        let solution = self.solver.solve(&problem).map_err(ScheduleError::Solve)?;
        let scheduled = reconcile(date, &available, &admitted, &solution)?;
        if scheduled.is_empty() {
            return Ok(ScheduleOutcome::Scheduled(Vec::new()));
        }
        self.store
            .update_shipments(credential, &scheduled)
            .map_err(ScheduleError::UpdateShipments)?;
        Ok(ScheduleOutcome::Scheduled(
            scheduled.into_iter().map(|shipment| shipment.id).collect(),
        ))
    }
}

fn summary(outcome: &ScheduleOutcome) -> String {
    match outcome {
        ScheduleOutcome::Scheduled(ids) => format!("{} shipments scheduled", ids.len()),
        ScheduleOutcome::NoRiderAvailable => "no rider available".to_owned(),
        ScheduleOutcome::NoShipmentToSchedule => "no shipment to be scheduled".to_owned(),
    }
}

impl<A, S, D> ScheduleRunner for Scheduler<A, S, D>
where
    A: AddressResolver,
    S: RouteSolver,
    D: RecordStore,
{
    fn run_schedule(
        &self,
        date: &str,
        credential: &str,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        Self::run_schedule(self, date, credential)
    }
}
