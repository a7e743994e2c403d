//! Fleet planning for pickup-and-delivery trips on geographic coordinates.
//! Large trip sets are partitioned into H3 clusters solved independently:
//! each cluster gets a depot-padded duration matrix, a constrained
//! pickup-delivery model, and an escalating fleet size driven against a
//! pluggable assignment backend.

mod algo;
mod error;
mod index;
mod io;
pub mod logging;
mod matrix;
mod model;
mod node;
mod solver;
mod table;
mod trip;

pub(crate) use algo::extract;
pub(crate) use io::options;

pub use algo::aggregate::{plan_fleet, ClusterOutcome, GlobalSolution};
pub use algo::escalate::{escalate_fleet, SolvedFleet};
pub use algo::extract::{extract_routes, RouteSolution};
pub use error::{Error, Result};
pub use index::{NodeIndex, NodeIndexMap};
pub use io::input::read_trips;
pub use io::options::{LogFormat, LogLevel, PlannerOptions};
pub use matrix::{DurationMatrix, DEPOT};
pub use model::{ModelLimits, PickupDeliveryPair, RoutingInstance};
pub use node::GeoPoint;
pub use solver::{
    AssignmentSolver, CheapestInsertion, FirstSolutionStrategy, SearchConfig, VehicleAssignment,
};
pub use table::{GreatCircleTable, OsrmTable, TravelTimeTable};
pub use trip::TripRequest;
