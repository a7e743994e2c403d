use crate::{matrix::DEPOT, DurationMatrix, Error, NodeIndex, Result};

const DEFAULT_PICKUP_DEADLINE: u64 = 15 * 60;
const DEFAULT_MAX_ROUTE_DURATION: u64 = 120 * 60;
const DEFAULT_VEHICLE_CAPACITY: u32 = 1;

const ERR_NO_VEHICLES: &str = "a routing instance needs at least one vehicle";
const ERR_DEPOT_IN_PAIR: &str = "the depot cannot appear in a pickup-delivery pair";
const ERR_NODE_OUT_OF_RANGE: &str = "pair references a node outside the matrix";
const ERR_DEMANDS_MISALIGNED: &str = "demand vector length must equal the matrix node count";

/// (pickup, delivery) node indices into a depot-inclusive duration matrix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PickupDeliveryPair {
    pub pickup: NodeIndex,
    pub delivery: NodeIndex,
}

impl PickupDeliveryPair {
    pub fn new(pickup: NodeIndex, delivery: NodeIndex) -> Self {
        Self { pickup, delivery }
    }
}

/// Resource limits of the duration dimension: zero slack, cumul forced to
/// zero at each vehicle's start. The unit is whatever the matrix provider
/// used; deadlines and matrix entries must share it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelLimits {
    /// Latest cumulative duration at which a pickup may be served,
    /// relative to the vehicle's own start-of-route zero point.
    pub pickup_deadline: u64,
    /// Per-vehicle maximum travel duration.
    pub max_route_duration: u64,
    /// Per-vehicle load limit checked against node demands.
    pub vehicle_capacity: u32,
}

impl Default for ModelLimits {
    fn default() -> Self {
        Self {
            pickup_deadline: DEFAULT_PICKUP_DEADLINE,
            max_route_duration: DEFAULT_MAX_ROUTE_DURATION,
            vehicle_capacity: DEFAULT_VEHICLE_CAPACITY,
        }
    }
}

/// One attempt's worth of routing problem: matrix, transportation requests,
/// fleet size, per-vehicle start/end nodes and node demands. Rebuilt fresh
/// for every escalation attempt.
#[derive(Debug)]
pub struct RoutingInstance<'a> {
    matrix: &'a DurationMatrix,
    pairs: &'a [PickupDeliveryPair],
    demands: &'a [u32],
    starts: Vec<NodeIndex>,
    ends: Vec<NodeIndex>,
    num_vehicles: usize,
    limits: ModelLimits,
}

impl<'a> RoutingInstance<'a> {
    pub fn build(
        matrix: &'a DurationMatrix,
        pairs: &'a [PickupDeliveryPair],
        demands: &'a [u32],
        num_vehicles: usize,
        limits: ModelLimits,
    ) -> Result<Self> {
        if num_vehicles == 0 {
            return Err(Error::invalid_data(ERR_NO_VEHICLES));
        }
        if demands.len() != matrix.size() {
            return Err(Error::invalid_data(format!(
                "{ERR_DEMANDS_MISALIGNED}: {} vs {}",
                demands.len(),
                matrix.size()
            )));
        }
        for pair in pairs {
            if pair.pickup == DEPOT || pair.delivery == DEPOT {
                return Err(Error::invalid_data(ERR_DEPOT_IN_PAIR));
            }
            if pair.pickup >= matrix.size() || pair.delivery >= matrix.size() {
                return Err(Error::invalid_data(format!(
                    "{ERR_NODE_OUT_OF_RANGE}: ({}, {})",
                    pair.pickup, pair.delivery
                )));
            }
            if pair.pickup == pair.delivery {
                return Err(Error::DuplicateCoordinate {
                    node: pair.pickup,
                    context: "non-degenerate pair has identical pickup and delivery".to_string(),
                });
            }
        }

        Ok(Self {
            matrix,
            pairs,
            demands,
            starts: vec![DEPOT; num_vehicles],
            ends: vec![DEPOT; num_vehicles],
            num_vehicles,
            limits,
        })
    }

    pub fn matrix(&self) -> &DurationMatrix {
        self.matrix
    }

    pub fn pairs(&self) -> &[PickupDeliveryPair] {
        self.pairs
    }

    pub fn demands(&self) -> &[u32] {
        self.demands
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    pub fn limits(&self) -> ModelLimits {
        self.limits
    }

    pub fn start_of(&self, vehicle: usize) -> NodeIndex {
        self.starts[vehicle]
    }

    pub fn end_of(&self, vehicle: usize) -> NodeIndex {
        self.ends[vehicle]
    }
}
