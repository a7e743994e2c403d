use std::time::Instant;

use crate::{
    matrix::DEPOT, DurationMatrix, PickupDeliveryPair, RoutingInstance,
};

use super::{AssignmentSolver, SearchConfig, VehicleAssignment};

/// Local cheapest insertion, the first-solution construction strategy.
///
/// Routes are sequences of (pickup, delivery) blocks: precedence demands the
/// delivery immediately after its pickup, so a pair can never split another
/// pair. Each step inserts the cheapest feasible block over all vehicles and
/// positions, scoring by duration increase plus the span-cost-weighted growth
/// of the fleet makespan. Construction only, no improvement phase.
pub struct CheapestInsertion;

impl AssignmentSolver for CheapestInsertion {
    fn solve(
        &self,
        instance: &RoutingInstance<'_>,
        search: &SearchConfig,
    ) -> Option<VehicleAssignment> {
        let started = Instant::now();
        let matrix = instance.matrix();
        let pairs = instance.pairs();
        let num_vehicles = instance.num_vehicles();

        // Longest direct leg first; index breaks ties deterministically.
        let mut order: Vec<usize> = (0..pairs.len()).collect();
        order.sort_by(|&a, &b| {
            let da = matrix.at(pairs[a].pickup, pairs[a].delivery);
            let db = matrix.at(pairs[b].pickup, pairs[b].delivery);
            db.cmp(&da).then(a.cmp(&b))
        });

        let mut routes: Vec<Vec<PickupDeliveryPair>> = vec![Vec::new(); num_vehicles];
        let mut totals: Vec<u64> = vec![0; num_vehicles];

        for &pi in &order {
            if started.elapsed() >= search.time_limit {
                log::debug!("insertion: time budget exhausted pairs_placed={}", placed(&routes));
                return None;
            }

            let pair = pairs[pi];
            let makespan = totals.iter().copied().max().unwrap_or(0);
            let mut best: Option<Candidate> = None;

            for vehicle in 0..num_vehicles {
                for slot in 0..=routes[vehicle].len() {
                    let Some(total) =
                        simulate_insertion(matrix, instance, &routes[vehicle], pair, slot)
                    else {
                        continue;
                    };

                    let delta = total - totals[vehicle];
                    let span_growth = total.saturating_sub(makespan);
                    let score = delta
                        .saturating_add(search.span_cost_coefficient.saturating_mul(span_growth));

                    let better = match best {
                        Some(ref b) => score < b.score,
                        None => true,
                    };
                    if better {
                        best = Some(Candidate {
                            score,
                            vehicle,
                            slot,
                            total,
                        });
                    }
                }
            }

            let found = best?;
            routes[found.vehicle].insert(found.slot, pair);
            totals[found.vehicle] = found.total;
        }

        let paths = (0..num_vehicles)
            .map(|v| {
                let mut path = Vec::with_capacity(routes[v].len() * 2 + 2);
                path.push(instance.start_of(v));
                for block in &routes[v] {
                    path.push(block.pickup);
                    path.push(block.delivery);
                }
                path.push(instance.end_of(v));
                path
            })
            .collect();

        Some(VehicleAssignment::new(paths))
    }
}

struct Candidate {
    score: u64,
    vehicle: usize,
    slot: usize,
    total: u64,
}

fn placed(routes: &[Vec<PickupDeliveryPair>]) -> usize {
    routes.iter().map(Vec::len).sum()
}

/// Walks the route with `pair` inserted at `slot` and returns its total
/// duration, or `None` if any pickup misses its deadline, any demand
/// exceeds capacity, or the route overruns its duration cap.
fn simulate_insertion(
    matrix: &DurationMatrix,
    instance: &RoutingInstance<'_>,
    blocks: &[PickupDeliveryPair],
    pair: PickupDeliveryPair,
    slot: usize,
) -> Option<u64> {
    let limits = instance.limits();
    let demands = instance.demands();

    let mut elapsed: u64 = 0;
    let mut prev = DEPOT;

    for i in 0..=blocks.len() {
        let block = if i < slot {
            blocks[i]
        } else if i == slot {
            pair
        } else {
            blocks[i - 1]
        };

        if demands[block.pickup] > limits.vehicle_capacity {
            return None;
        }

        elapsed += u64::from(matrix.at(prev, block.pickup));
        if elapsed > limits.pickup_deadline {
            return None;
        }
        elapsed += u64::from(matrix.at(block.pickup, block.delivery));
        prev = block.delivery;
    }

    elapsed += u64::from(matrix.at(prev, DEPOT));
    if elapsed > limits.max_route_duration {
        return None;
    }
    Some(elapsed)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::CheapestInsertion;
    use crate::matrix::test_support::matrix_from_rows;
    use crate::{
        AssignmentSolver, ModelLimits, PickupDeliveryPair, RoutingInstance, SearchConfig,
    };

    fn limits(deadline: u64, max_route: u64) -> ModelLimits {
        ModelLimits {
            pickup_deadline: deadline,
            max_route_duration: max_route,
            vehicle_capacity: 1,
        }
    }

    #[test]
    fn single_pair_rides_one_vehicle() {
        let matrix = matrix_from_rows(&[
            &[0, 0, 0],
            &[0, 0, 7],
            &[0, 7, 0],
        ]);
        let pairs = [PickupDeliveryPair::new(1, 2)];
        let demands = [0, 1, 0];
        let instance =
            RoutingInstance::build(&matrix, &pairs, &demands, 1, limits(100, 1000))
                .expect("build instance");

        let assignment = CheapestInsertion
            .solve(&instance, &SearchConfig::default())
            .expect("solvable");

        assert_eq!(assignment.path(0), &[0, 1, 2, 0]);
    }

    #[test]
    fn delivery_is_always_immediately_after_pickup() {
        // Two trips, one vehicle, generous limits: blocks must stay intact.
        let matrix = matrix_from_rows(&[
            &[0, 0, 0, 0, 0],
            &[0, 0, 3, 9, 9],
            &[0, 3, 0, 2, 9],
            &[0, 9, 2, 0, 4],
            &[0, 9, 9, 4, 0],
        ]);
        let pairs = [PickupDeliveryPair::new(1, 2), PickupDeliveryPair::new(3, 4)];
        let demands = [0, 1, 0, 1, 0];
        let instance =
            RoutingInstance::build(&matrix, &pairs, &demands, 1, limits(100, 1000))
                .expect("build instance");

        let assignment = CheapestInsertion
            .solve(&instance, &SearchConfig::default())
            .expect("solvable");

        let path = assignment.path(0);
        for pair in &pairs {
            let p = path.iter().position(|&n| n == pair.pickup).expect("pickup served");
            assert_eq!(path[p + 1], pair.delivery);
        }
    }

    #[test]
    fn pickup_deadline_forces_a_second_vehicle() {
        // Serving both trips with one vehicle puts the second pickup past
        // the deadline; two vehicles reach both in time.
        let matrix = matrix_from_rows(&[
            &[0, 0, 0, 0, 0],
            &[0, 0, 10, 1, 1],
            &[0, 10, 0, 1, 1],
            &[0, 1, 1, 0, 10],
            &[0, 1, 1, 10, 0],
        ]);
        let pairs = [PickupDeliveryPair::new(1, 2), PickupDeliveryPair::new(3, 4)];
        let demands = [0, 1, 0, 1, 0];

        let one = RoutingInstance::build(&matrix, &pairs, &demands, 1, limits(5, 1000))
            .expect("build instance");
        assert!(CheapestInsertion.solve(&one, &SearchConfig::default()).is_none());

        let two = RoutingInstance::build(&matrix, &pairs, &demands, 2, limits(5, 1000))
            .expect("build instance");
        let assignment = CheapestInsertion
            .solve(&two, &SearchConfig::default())
            .expect("two vehicles suffice");

        let nonempty = (0..2).filter(|&v| assignment.path(v).len() > 2).count();
        assert_eq!(nonempty, 2);
    }

    #[test]
    fn direct_leg_over_the_route_cap_yields_no_solution() {
        // The pickup is reached in time, but the direct leg alone overruns
        // the route duration cap: infeasible at any insertion point.
        let matrix = matrix_from_rows(&[
            &[0, 0, 0],
            &[0, 0, 50],
            &[0, 50, 0],
        ]);
        let pairs = [PickupDeliveryPair::new(1, 2)];
        let demands = [0, 1, 0];
        let instance = RoutingInstance::build(&matrix, &pairs, &demands, 1, limits(100, 10))
            .expect("build instance");

        assert!(CheapestInsertion.solve(&instance, &SearchConfig::default()).is_none());
    }

    #[test]
    fn over_capacity_demand_yields_no_solution() {
        let matrix = matrix_from_rows(&[
            &[0, 0, 0],
            &[0, 0, 5],
            &[0, 5, 0],
        ]);
        let pairs = [PickupDeliveryPair::new(1, 2)];
        let demands = [0, 3, 0];
        let instance = RoutingInstance::build(&matrix, &pairs, &demands, 1, limits(100, 1000))
            .expect("build instance");

        assert!(CheapestInsertion.solve(&instance, &SearchConfig::default()).is_none());
    }

    #[test]
    fn zero_time_budget_returns_no_solution() {
        let matrix = matrix_from_rows(&[
            &[0, 0, 0],
            &[0, 0, 5],
            &[0, 5, 0],
        ]);
        let pairs = [PickupDeliveryPair::new(1, 2)];
        let demands = [0, 1, 0];
        let instance = RoutingInstance::build(&matrix, &pairs, &demands, 1, limits(100, 1000))
            .expect("build instance");

        let search = SearchConfig {
            time_limit: Duration::ZERO,
            ..SearchConfig::default()
        };
        assert!(CheapestInsertion.solve(&instance, &search).is_none());
    }

    #[test]
    fn idle_vehicles_get_depot_only_paths() {
        let matrix = matrix_from_rows(&[
            &[0, 0, 0],
            &[0, 0, 5],
            &[0, 5, 0],
        ]);
        let pairs = [PickupDeliveryPair::new(1, 2)];
        let demands = [0, 1, 0];
        let instance = RoutingInstance::build(&matrix, &pairs, &demands, 3, limits(100, 1000))
            .expect("build instance");

        let assignment = CheapestInsertion
            .solve(&instance, &SearchConfig::default())
            .expect("solvable");

        let idle = (0..3).filter(|&v| assignment.path(v) == [0, 0]).count();
        assert_eq!(idle, 2);
    }

    #[test]
    fn solve_is_deterministic() {
        let matrix = matrix_from_rows(&[
            &[0, 0, 0, 0, 0],
            &[0, 0, 3, 5, 2],
            &[0, 3, 0, 4, 6],
            &[0, 5, 4, 0, 3],
            &[0, 2, 6, 3, 0],
        ]);
        let pairs = [PickupDeliveryPair::new(1, 2), PickupDeliveryPair::new(3, 4)];
        let demands = [0, 1, 0, 1, 0];
        let instance = RoutingInstance::build(&matrix, &pairs, &demands, 2, limits(100, 1000))
            .expect("build instance");

        let first = CheapestInsertion
            .solve(&instance, &SearchConfig::default())
            .expect("solvable");
        let second = CheapestInsertion
            .solve(&instance, &SearchConfig::default())
            .expect("solvable");
        assert_eq!(first, second);
    }
}
