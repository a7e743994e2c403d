use std::collections::BTreeMap;

use crate::{solver::VehicleAssignment, NodeIndex, RoutingInstance};

/// One vehicle's share of a solved cluster: visited nodes in order, without
/// the leading start marker or the implicit trailing depot return, plus the
/// total traveled duration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteSolution {
    pub stops: Vec<NodeIndex>,
    pub duration: u64,
}

/// Converts a backend assignment into per-vehicle routes by walking each
/// path from its start to the terminal marker, summing arc costs along the
/// walk. Deterministic given a solved instance.
pub fn extract_routes(
    instance: &RoutingInstance<'_>,
    assignment: &VehicleAssignment,
) -> BTreeMap<usize, RouteSolution> {
    let matrix = instance.matrix();
    let mut routes = BTreeMap::new();

    for vehicle in 0..assignment.vehicle_count() {
        let path = assignment.path(vehicle);
        let mut duration: u64 = 0;
        for leg in path.windows(2) {
            duration += u64::from(matrix.at(leg[0], leg[1]));
        }

        let stops = if path.len() > 2 {
            path[1..path.len() - 1].to_vec()
        } else {
            Vec::new()
        };
        routes.insert(vehicle, RouteSolution { stops, duration });
    }

    routes
}
