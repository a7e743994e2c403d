use crate::{
    solver::{AssignmentSolver, SearchConfig, VehicleAssignment},
    DurationMatrix, Error, ModelLimits, PickupDeliveryPair, Result, RoutingInstance,
};

/// A successful escalation attempt: the fleet size that worked and the
/// backend's assignment at that size.
#[derive(Debug)]
pub struct SolvedFleet {
    pub vehicles: usize,
    pub assignment: VehicleAssignment,
}

/// Optimistic starting fleet: each vehicle serves two trips.
fn initial_fleet(pair_count: usize) -> usize {
    ((pair_count + 1) / 2).max(1)
}

/// Retries the backend with an escalating fleet size until it returns an
/// assignment.
///
/// Every attempt rebuilds the instance from scratch; no state carries over
/// except the count. The loop is hard-bounded twice: the fleet never grows
/// past the pair count (with immediate delivery, one vehicle per trip is
/// the semantic maximum) and attempts never exceed `max_escalations`. An
/// always-infeasible input, such as a trip whose direct leg alone overruns
/// the per-vehicle duration cap, therefore ends in `Error::Exhausted`
/// instead of looping forever.
pub fn escalate_fleet<S: AssignmentSolver + ?Sized>(
    matrix: &DurationMatrix,
    pairs: &[PickupDeliveryPair],
    demands: &[u32],
    limits: ModelLimits,
    search: &SearchConfig,
    backend: &S,
    max_escalations: usize,
) -> Result<SolvedFleet> {
    let ceiling = pairs.len().max(1);
    let mut vehicles = initial_fleet(pairs.len());
    let mut attempts = 0;

    loop {
        attempts += 1;
        let instance = RoutingInstance::build(matrix, pairs, demands, vehicles, limits)?;

        if let Some(assignment) = backend.solve(&instance, search) {
            log::info!(
                "escalate: solved vehicles={vehicles} pairs={} attempts={attempts}",
                pairs.len()
            );
            return Ok(SolvedFleet {
                vehicles,
                assignment,
            });
        }

        log::info!("escalate: pass vehicles={vehicles} attempt={attempts}");
        if vehicles >= ceiling || attempts >= max_escalations {
            return Err(Error::Exhausted { vehicles, attempts });
        }
        vehicles += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{escalate_fleet, initial_fleet};
    use crate::matrix::test_support::matrix_from_rows;
    use crate::solver::{AssignmentSolver, SearchConfig, VehicleAssignment};
    use crate::{Error, ModelLimits, PickupDeliveryPair, RoutingInstance};

    /// Succeeds once the fleet reaches a threshold, recording every
    /// attempted size.
    struct ThresholdBackend {
        needed: usize,
        seen: std::sync::Mutex<Vec<usize>>,
    }

    impl ThresholdBackend {
        fn new(needed: usize) -> Self {
            Self {
                needed,
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    impl AssignmentSolver for ThresholdBackend {
        fn solve(
            &self,
            instance: &RoutingInstance<'_>,
            _search: &SearchConfig,
        ) -> Option<VehicleAssignment> {
            let vehicles = instance.num_vehicles();
            self.seen.lock().expect("lock").push(vehicles);
            if vehicles >= self.needed {
                Some(VehicleAssignment::new(vec![vec![0, 0]; vehicles]))
            } else {
                None
            }
        }
    }

    struct NeverSolves;

    impl AssignmentSolver for NeverSolves {
        fn solve(
            &self,
            _instance: &RoutingInstance<'_>,
            _search: &SearchConfig,
        ) -> Option<VehicleAssignment> {
            None
        }
    }

    fn four_pairs() -> ([PickupDeliveryPair; 4], Vec<u32>, crate::DurationMatrix) {
        let pairs = [
            PickupDeliveryPair::new(1, 2),
            PickupDeliveryPair::new(3, 4),
            PickupDeliveryPair::new(5, 6),
            PickupDeliveryPair::new(7, 8),
        ];
        let demands = vec![0, 1, 0, 1, 0, 1, 0, 1, 0];
        let rows: Vec<Vec<u32>> = (0..9)
            .map(|i| (0..9).map(|j| if i == 0 || j == 0 || i == j { 0 } else { 1 }).collect())
            .collect();
        let refs: Vec<&[u32]> = rows.iter().map(|r| r.as_slice()).collect();
        (pairs, demands, matrix_from_rows(&refs))
    }

    #[test]
    fn initial_fleet_rounds_half_the_pair_count_up() {
        assert_eq!(initial_fleet(0), 1);
        assert_eq!(initial_fleet(1), 1);
        assert_eq!(initial_fleet(4), 2);
        assert_eq!(initial_fleet(5), 3);
    }

    #[test]
    fn escalation_is_monotonic_and_stops_at_first_success() {
        let (pairs, demands, matrix) = four_pairs();
        let backend = ThresholdBackend::new(4);

        let solved = escalate_fleet(
            &matrix,
            &pairs,
            &demands,
            ModelLimits::default(),
            &SearchConfig::default(),
            &backend,
            16,
        )
        .expect("threshold reachable");

        assert_eq!(solved.vehicles, 4);
        let seen = backend.seen.lock().expect("lock").clone();
        assert_eq!(seen, vec![2, 3, 4]);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn exhaustion_reports_last_fleet_size_and_attempts() {
        let (pairs, demands, matrix) = four_pairs();

        let err = escalate_fleet(
            &matrix,
            &pairs,
            &demands,
            ModelLimits::default(),
            &SearchConfig::default(),
            &NeverSolves,
            16,
        )
        .expect_err("never solvable");

        // Fleet climbs 2, 3, 4 and stops at the pair-count ceiling.
        match err {
            Error::Exhausted { vehicles, attempts } => {
                assert_eq!(vehicles, 4);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected Exhausted, got {other}"),
        }
    }

    #[test]
    fn attempt_cap_bounds_the_loop_before_the_fleet_ceiling() {
        let (pairs, demands, matrix) = four_pairs();

        let err = escalate_fleet(
            &matrix,
            &pairs,
            &demands,
            ModelLimits::default(),
            &SearchConfig::default(),
            &NeverSolves,
            2,
        )
        .expect_err("attempt cap must trip");

        match err {
            Error::Exhausted { vehicles, attempts } => {
                assert_eq!(attempts, 2);
                assert_eq!(vehicles, 3);
            }
            other => panic!("expected Exhausted, got {other}"),
        }
    }

    #[test]
    fn single_pair_exhausts_on_the_first_infeasible_attempt() {
        let pairs = [PickupDeliveryPair::new(1, 2)];
        let demands = vec![0, 1, 0];
        let matrix = matrix_from_rows(&[
            &[0, 0, 0],
            &[0, 0, 9],
            &[0, 9, 0],
        ]);

        let err = escalate_fleet(
            &matrix,
            &pairs,
            &demands,
            ModelLimits::default(),
            &SearchConfig::default(),
            &NeverSolves,
            16,
        )
        .expect_err("one pair, one vehicle, never solvable");

        assert!(matches!(
            err,
            Error::Exhausted {
                vehicles: 1,
                attempts: 1
            }
        ));
    }
}
