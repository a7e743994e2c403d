use crate::{Error, GeoPoint, Result};

use super::TravelTimeTable;

const ERR_INVALID_SPEED: &str = "speed must be > 0";

/// Offline provider: durations derived from great-circle distance at a
/// fixed speed, in meters per duration unit.
#[derive(Clone, Copy, Debug)]
pub struct GreatCircleTable {
    speed: f64,
}

impl GreatCircleTable {
    pub fn new(speed: f64) -> Result<Self> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(Error::invalid_input(ERR_INVALID_SPEED));
        }
        Ok(Self { speed })
    }
}

impl TravelTimeTable for GreatCircleTable {
    fn durations(&self, locations: &[GeoPoint]) -> Result<Vec<Vec<f64>>> {
        let rows = locations
            .iter()
            .map(|from| {
                locations
                    .iter()
                    .map(|to| from.dist(to) / self.speed)
                    .collect()
            })
            .collect();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::GreatCircleTable;
    use crate::{table::TravelTimeTable, GeoPoint};

    #[test]
    fn rejects_non_positive_speed() {
        assert!(GreatCircleTable::new(0.0).is_err());
        assert!(GreatCircleTable::new(-1.0).is_err());
        assert!(GreatCircleTable::new(f64::NAN).is_err());
    }

    #[test]
    fn diagonal_is_zero_and_matrix_is_symmetric() {
        let table = GreatCircleTable::new(10.0).expect("valid speed");
        let locations = vec![
            GeoPoint::from_lat_lng(41.85, -87.65),
            GeoPoint::from_lat_lng(41.90, -87.62),
        ];

        let durations = table.durations(&locations).expect("durations");

        assert_eq!(durations.len(), 2);
        assert!(durations[0][0].abs() < 1e-9);
        assert!((durations[0][1] - durations[1][0]).abs() < 1e-6);
        assert!(durations[0][1] > 0.0);
    }

    #[test]
    fn doubling_the_speed_halves_the_duration() {
        let slow = GreatCircleTable::new(5.0).expect("valid speed");
        let fast = GreatCircleTable::new(10.0).expect("valid speed");
        let locations = vec![
            GeoPoint::from_lat_lng(41.85, -87.65),
            GeoPoint::from_lat_lng(41.90, -87.62),
        ];

        let d_slow = slow.durations(&locations).expect("durations")[0][1];
        let d_fast = fast.durations(&locations).expect("durations")[0][1];

        assert!((d_slow - 2.0 * d_fast).abs() < 1e-6);
    }
}
