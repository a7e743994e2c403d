use crate::GeoPoint;

const DEFAULT_DEMAND: u32 = 1;

/// One pickup-and-delivery request. Demand 0 marks a same-location no-op
/// trip; those never reach the routing model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TripRequest {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub demand: u32,
}

impl TripRequest {
    pub fn new(pickup: GeoPoint, dropoff: GeoPoint) -> Self {
        let demand = if pickup == dropoff { 0 } else { DEFAULT_DEMAND };
        Self {
            pickup,
            dropoff,
            demand,
        }
    }

    pub fn with_demand(pickup: GeoPoint, dropoff: GeoPoint, demand: u32) -> Self {
        Self {
            pickup,
            dropoff,
            demand,
        }
    }

    /// Degenerate trips are filtered before model construction.
    pub fn is_degenerate(&self) -> bool {
        self.demand == 0 || self.pickup == self.dropoff
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.pickup.is_valid() && self.dropoff.is_valid()
    }
}
