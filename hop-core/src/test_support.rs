//! In-memory collaborators used by unit and behaviour tests.
//!
//! None of these types perform I/O. They record how they were called so
//! tests can assert on the order and content of collaborator traffic.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use geo::Coord;

use crate::problem::{ShipmentJob, Vehicle};
use crate::solution::{Activity, ActivityKind, SolutionRoute, Unassigned};
use crate::{
    AddressResolver, Credential, Location, Problem, RecordStore, ResolveError, Rider, RouteSolver,
    Shipment, ShipmentId, Solution, SolveError, StoreError,
};

const FALLBACK_LOCATION: Location = Coord { x: 11.3426, y: 44.4949 };

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resolver backed by a fixed address table.
///
/// Unknown addresses fail with [`ResolveError::NoResults`] unless the
/// resolver is [`permissive`](Self::permissive).
#[derive(Debug, Default)]
pub struct StaticResolver {
    addresses: HashMap<String, Location>,
    failing: HashSet<String>,
    permissive: bool,
    calls: AtomicUsize,
}

impl StaticResolver {
    /// Build a resolver knowing the given addresses.
    #[must_use]
    pub fn with_addresses<'a, I>(addresses: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Location)>,
    {
        Self {
            addresses: addresses
                .into_iter()
                .map(|(text, location)| (text.to_owned(), location))
                .collect(),
            ..Self::default()
        }
    }

    /// A resolver placing every non-empty address in central Bologna.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            permissive: true,
            ..Self::default()
        }
    }

    /// Make `address` fail with a service error.
    #[must_use]
    pub fn failing_on(mut self, address: &str) -> Self {
        self.failing.insert(address.to_owned());
        self
    }

    /// Number of `resolve` calls served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AddressResolver for StaticResolver {
    fn resolve(&self, address: &str) -> Result<Location, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if address.trim().is_empty() {
            return Err(ResolveError::EmptyAddress);
        }
        if self.failing.contains(address) {
            return Err(ResolveError::Service {
                address: address.to_owned(),
                status: "REQUEST_DENIED".to_owned(),
                message: "scripted failure".to_owned(),
            });
        }
        match self.addresses.get(address) {
            Some(location) => Ok(*location),
            None if self.permissive => Ok(FALLBACK_LOCATION),
            None => Err(ResolveError::NoResults {
                address: address.to_owned(),
            }),
        }
    }
}

/// Behaviour of a [`ScriptedSolver`].
#[derive(Debug, Clone)]
pub enum SolverScript {
    /// Place every job on the first vehicle, in submission order.
    AssignAll {
        /// Job ids to report as unassigned instead.
        unassigned: HashSet<String>,
    },
    /// Answer every problem with this solution.
    Fixed(Solution),
    /// Fail every problem with this error.
    Fail(SolveError),
}

/// Route solver that answers from a script and records submitted problems.
#[derive(Debug)]
pub struct ScriptedSolver {
    script: SolverScript,
    delay: Option<Duration>,
    problems: Mutex<Vec<Problem>>,
}

impl ScriptedSolver {
    /// Solver placing every job on the first vehicle.
    #[must_use]
    pub fn assign_all() -> Self {
        Self::scripted(SolverScript::AssignAll {
            unassigned: HashSet::new(),
        })
    }

    /// Solver returning `solution` for every problem.
    #[must_use]
    pub fn fixed(solution: Solution) -> Self {
        Self::scripted(SolverScript::Fixed(solution))
    }

    /// Solver failing every problem with `error`.
    #[must_use]
    pub fn failing(error: SolveError) -> Self {
        Self::scripted(SolverScript::Fail(error))
    }

    fn scripted(script: SolverScript) -> Self {
        Self {
            script,
            delay: None,
            problems: Mutex::new(Vec::new()),
        }
    }

    /// Leave the given job ids unassigned. Only affects
    /// [`SolverScript::AssignAll`].
    #[must_use]
    pub fn leaving_unassigned<'a, I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        if let SolverScript::AssignAll { unassigned } = &mut self.script {
            unassigned.extend(ids.into_iter().map(str::to_owned));
        }
        self
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Problems submitted so far.
    #[must_use]
    pub fn problems(&self) -> Vec<Problem> {
        lock(&self.problems).clone()
    }
}

impl RouteSolver for ScriptedSolver {
    fn solve(&self, problem: &Problem) -> Result<Solution, SolveError> {
        lock(&self.problems).push(problem.clone());
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        match &self.script {
            SolverScript::AssignAll { unassigned } => Ok(assign_all(problem, unassigned)),
            SolverScript::Fixed(solution) => Ok(solution.clone()),
            SolverScript::Fail(error) => Err(error.clone()),
        }
    }
}

const STEP_SECS: i64 = 600;

fn assign_all(problem: &Problem, unassigned: &HashSet<String>) -> Solution {
    let Some(vehicle) = problem.vehicles.first() else {
        return Solution {
            routes: Vec::new(),
            unassigned: Unassigned {
                shipments: problem.shipments.iter().map(|job| job.id.clone()).collect(),
            },
        };
    };
    let (placed, skipped): (Vec<&ShipmentJob>, Vec<&ShipmentJob>) = problem
        .shipments
        .iter()
        .partition(|job| !unassigned.contains(&job.id));
    Solution {
        routes: vec![route_for(vehicle, &placed)],
        unassigned: Unassigned {
            shipments: skipped.into_iter().map(|job| job.id.clone()).collect(),
        },
    }
}

fn route_for(vehicle: &Vehicle, jobs: &[&ShipmentJob]) -> SolutionRoute {
    let start = i64::from(vehicle.earliest_start);
    let mut activities = vec![activity(ActivityKind::Start, None, None, Some(start))];
    let mut clock = start;
    for job in jobs {
        for kind in [ActivityKind::Pickup, ActivityKind::Delivery] {
            clock += STEP_SECS;
            activities.push(activity(
                kind,
                Some(job.id.clone()),
                Some(clock),
                Some(clock + STEP_SECS),
            ));
        }
    }
    activities.push(activity(ActivityKind::End, None, Some(clock + STEP_SECS), None));
    SolutionRoute {
        vehicle_id: vehicle.id.clone(),
        activities,
    }
}

const fn activity(
    kind: ActivityKind,
    job_id: Option<String>,
    arrival: Option<i64>,
    end: Option<i64>,
) -> Activity {
    Activity {
        kind,
        job_id,
        address: None,
        arrival,
        end,
    }
}

/// Calls observed by a [`MemoryRecordStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// `list_riders` was called.
    ListRiders,
    /// `list_shipments` was called.
    ListShipments,
    /// `update_shipments` was called with these ids.
    UpdateShipments(Vec<ShipmentId>),
}

#[derive(Debug, Default)]
struct StoreState {
    riders: Vec<Rider>,
    shipments: Vec<Shipment>,
    events: Vec<StoreEvent>,
}

/// Record store holding riders and shipments in memory.
///
/// Shipments are listed in insertion order; updates replace records with a
/// matching id and append unknown ones.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    state: Mutex<StoreState>,
    fail_updates: bool,
}

impl MemoryRecordStore {
    /// Store seeded with `riders` and `shipments`.
    #[must_use]
    pub fn new(riders: Vec<Rider>, shipments: Vec<Shipment>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                riders,
                shipments,
                events: Vec::new(),
            }),
            fail_updates: false,
        }
    }

    /// Make every `update_shipments` call fail.
    #[must_use]
    pub const fn with_update_failure(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    /// Calls observed so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<StoreEvent> {
        lock(&self.state).events.clone()
    }

    /// Current shipment records.
    #[must_use]
    pub fn shipments(&self) -> Vec<Shipment> {
        lock(&self.state).shipments.clone()
    }

    /// Current record for shipment `id`.
    #[must_use]
    pub fn shipment(&self, id: &str) -> Option<Shipment> {
        lock(&self.state)
            .shipments
            .iter()
            .find(|shipment| shipment.id == id)
            .cloned()
    }
}

impl RecordStore for MemoryRecordStore {
    fn list_riders(&self, _credential: &Credential) -> Result<Vec<Rider>, StoreError> {
        let mut state = lock(&self.state);
        state.events.push(StoreEvent::ListRiders);
        Ok(state.riders.clone())
    }

    fn list_shipments(&self, _credential: &Credential) -> Result<Vec<Shipment>, StoreError> {
        let mut state = lock(&self.state);
        state.events.push(StoreEvent::ListShipments);
        Ok(state.shipments.clone())
    }

    fn update_shipments(
        &self,
        _credential: &Credential,
        shipments: &[Shipment],
    ) -> Result<(), StoreError> {
        let mut state = lock(&self.state);
        state.events.push(StoreEvent::UpdateShipments(
            shipments.iter().map(|shipment| shipment.id.clone()).collect(),
        ));
        if self.fail_updates {
            return Err(StoreError::Query {
                message: "update rejected".to_owned(),
            });
        }
        for update in shipments {
            match state.shipments.iter_mut().find(|stored| stored.id == update.id) {
                Some(stored) => *stored = update.clone(),
                None => state.shipments.push(update.clone()),
            }
        }
        Ok(())
    }
}
