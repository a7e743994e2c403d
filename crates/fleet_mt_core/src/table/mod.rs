//! Travel-time capability boundary. Matrix construction only sees this
//! interface; HTTP and offline providers both implement it.

mod great_circle;
mod osrm;

use crate::{GeoPoint, Result};

pub use great_circle::GreatCircleTable;
pub use osrm::OsrmTable;

/// Source of pairwise travel durations over an ordered location list.
///
/// Implementations return a square float matrix over exactly the given
/// locations, in one opaque duration unit, and fail with
/// `Error::DataUnavailable` when they cannot serve the whole list in one
/// request.
pub trait TravelTimeTable {
    fn durations(&self, locations: &[GeoPoint]) -> Result<Vec<Vec<f64>>>;
}
