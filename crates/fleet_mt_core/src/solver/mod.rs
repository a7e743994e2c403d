//! Solving capability boundary. The escalation loop only sees this
//! interface, so any constraint or local-search backend can substitute.

mod insertion;

use std::time::Duration;

use crate::{NodeIndex, RoutingInstance};

pub use insertion::CheapestInsertion;

const DEFAULT_TIME_LIMIT_SECS: u64 = 5;
const DEFAULT_SPAN_COST_COEFFICIENT: u64 = 100;

/// First-solution construction strategy identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FirstSolutionStrategy {
    LocalCheapestInsertion,
}

/// Per-attempt search configuration handed to the backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    pub first_solution: FirstSolutionStrategy,
    /// Wall-clock budget for one attempt. Enforced cooperatively by the
    /// backend; the caller never interrupts a running solve.
    pub time_limit: Duration,
    /// Penalty weight on growth of the spread between vehicles' finish
    /// times; encourages balanced routes.
    pub span_cost_coefficient: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            first_solution: FirstSolutionStrategy::LocalCheapestInsertion,
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
            span_cost_coefficient: DEFAULT_SPAN_COST_COEFFICIENT,
        }
    }
}

/// A backend's answer: one full depot-to-depot node path per vehicle.
/// Idle vehicles carry the two-element path `[start, end]`.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleAssignment {
    paths: Vec<Vec<NodeIndex>>,
}

impl VehicleAssignment {
    pub fn new(paths: Vec<Vec<NodeIndex>>) -> Self {
        Self { paths }
    }

    pub fn vehicle_count(&self) -> usize {
        self.paths.len()
    }

    pub fn path(&self, vehicle: usize) -> &[NodeIndex] {
        &self.paths[vehicle]
    }
}

/// Opaque solving capability. `None` is the no-solution signal the
/// escalation loop reacts to; it covers both proven infeasibility and
/// running out of the attempt's time budget.
pub trait AssignmentSolver {
    fn solve(
        &self,
        instance: &RoutingInstance<'_>,
        search: &SearchConfig,
    ) -> Option<VehicleAssignment>;
}
