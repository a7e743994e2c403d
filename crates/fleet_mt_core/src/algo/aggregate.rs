use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::{
    algo::{escalate::escalate_fleet, extract::extract_routes, partition::partition_trips},
    extract::RouteSolution,
    options::PlannerOptions,
    solver::{AssignmentSolver, SearchConfig},
    table::TravelTimeTable,
    DurationMatrix, Error, ModelLimits, NodeIndexMap, PickupDeliveryPair, Result,
    RoutingInstance, TripRequest,
};

const ERR_INVALID_POINT: &str = "Input contains invalid lat/lng values";
const ERR_INVALID_CAPACITY: &str = "vehicle-capacity must be > 0";
const ERR_INVALID_TIME_LIMIT: &str = "solve-time-limit must be > 0";

/// Terminal result for one spatial cluster. Failures are isolated here so
/// sibling clusters keep their answers.
#[derive(Clone, Debug, PartialEq)]
pub enum ClusterOutcome {
    Solved {
        vehicles: usize,
        routes: BTreeMap<usize, RouteSolution>,
    },
    Failed {
        reason: String,
    },
}

/// Union of per-cluster outcomes plus the fleet size summed over solved
/// clusters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlobalSolution {
    clusters: BTreeMap<usize, ClusterOutcome>,
    total_vehicles: usize,
}

impl GlobalSolution {
    pub fn clusters(&self) -> &BTreeMap<usize, ClusterOutcome> {
        &self.clusters
    }

    pub fn total_vehicles(&self) -> usize {
        self.total_vehicles
    }

    pub fn solved_count(&self) -> usize {
        self.clusters
            .values()
            .filter(|o| matches!(o, ClusterOutcome::Solved { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.clusters.len() - self.solved_count()
    }
}

/// Runs the full pipeline: partition trips by pickup cell, then per cluster
/// cost, solve with fleet escalation and extract routes. Clusters share no
/// state and are solved in parallel; a cluster that cannot be costed or
/// never becomes feasible is reported as failed without aborting the rest.
pub fn plan_fleet<T, S>(
    trips: &[TripRequest],
    options: &PlannerOptions,
    table: &T,
    backend: &S,
) -> Result<GlobalSolution>
where
    T: TravelTimeTable + Sync,
    S: AssignmentSolver + Sync,
{
    if options.vehicle_capacity == 0 {
        return Err(Error::invalid_input(ERR_INVALID_CAPACITY));
    }
    if options.solve_time_limit == 0 {
        return Err(Error::invalid_input(ERR_INVALID_TIME_LIMIT));
    }
    if trips.iter().any(|t| !t.is_valid()) {
        return Err(Error::invalid_input(ERR_INVALID_POINT));
    }

    let clusters = partition_trips(trips, options.max_cluster_size)?;
    log::info!(
        "aggregate: partitioned trips={} clusters={} cap={}",
        trips.len(),
        clusters.len(),
        options.max_cluster_size
    );

    let outcomes: Vec<(usize, ClusterOutcome)> = clusters
        .par_iter()
        .enumerate()
        .map(|(cluster_id, idxs)| {
            let subset: Vec<TripRequest> = idxs.iter().map(|&i| trips[i]).collect();
            let now = Instant::now();

            let outcome = match solve_cluster(&subset, options, table, backend) {
                Ok((vehicles, routes)) => {
                    log::info!(
                        "cluster: done id={cluster_id} trips={} vehicles={vehicles} secs={:.2}",
                        subset.len(),
                        now.elapsed().as_secs_f32()
                    );
                    ClusterOutcome::Solved { vehicles, routes }
                }
                Err(err) => {
                    log::warn!(
                        "cluster: failed id={cluster_id} trips={} err={err}",
                        subset.len()
                    );
                    ClusterOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            (cluster_id, outcome)
        })
        .collect();

    let mut solution = GlobalSolution::default();
    for (cluster_id, outcome) in outcomes {
        if let ClusterOutcome::Solved { vehicles, .. } = &outcome {
            solution.total_vehicles += vehicles;
        }
        solution.clusters.insert(cluster_id, outcome);
    }

    log::info!(
        "aggregate: complete clusters={} solved={} failed={} vehicles={}",
        solution.clusters.len(),
        solution.solved_count(),
        solution.failed_count(),
        solution.total_vehicles
    );
    Ok(solution)
}

/// One cluster end to end: degenerate filter, node interning, matrix,
/// escalation, extraction.
fn solve_cluster<T, S>(
    cluster: &[TripRequest],
    options: &PlannerOptions,
    table: &T,
    backend: &S,
) -> Result<(usize, BTreeMap<usize, RouteSolution>)>
where
    T: TravelTimeTable + Sync,
    S: AssignmentSolver + Sync,
{
    let active: Vec<&TripRequest> = cluster.iter().filter(|t| !t.is_degenerate()).collect();
    if active.is_empty() {
        return Ok((0, BTreeMap::new()));
    }

    let mut map = NodeIndexMap::new();
    let mut pairs = Vec::with_capacity(active.len());
    for trip in &active {
        let pickup = map.intern(trip.pickup);
        let delivery = map.intern(trip.dropoff);
        pairs.push(PickupDeliveryPair::new(pickup, delivery));
    }

    let mut demands = vec![0u32; map.len() + 1];
    for (trip, pair) in active.iter().zip(&pairs) {
        demands[pair.pickup] = demands[pair.pickup].max(trip.demand);
    }

    let matrix = DurationMatrix::build_with_depot(table, map.locations())?;
    let limits = ModelLimits {
        pickup_deadline: options.pickup_deadline,
        max_route_duration: options.max_route_duration,
        vehicle_capacity: options.vehicle_capacity,
    };
    let search = SearchConfig {
        time_limit: Duration::from_secs(options.solve_time_limit),
        span_cost_coefficient: options.span_cost_coefficient,
        ..SearchConfig::default()
    };

    let solved = escalate_fleet(
        &matrix,
        &pairs,
        &demands,
        limits,
        &search,
        backend,
        options.max_escalations,
    )?;

    let instance = RoutingInstance::build(&matrix, &pairs, &demands, solved.vehicles, limits)?;
    Ok((solved.vehicles, extract_routes(&instance, &solved.assignment)))
}
