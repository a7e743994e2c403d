use crate::{table::TravelTimeTable, Error, GeoPoint, Result};

/// Node index of the synthetic depot every vehicle starts and ends at.
pub const DEPOT: usize = 0;

const ERR_EMPTY_LOCATIONS: &str = "no locations to build a duration matrix for";
const ERR_NOT_SQUARE: &str = "travel time provider returned a non-square matrix";
const ERR_BAD_DURATION: &str = "travel time provider returned a negative or non-finite duration";

/// Square integer travel-duration matrix with a synthetic depot at index 0.
/// The depot row and column are all zero; asymmetry is allowed.
#[derive(Clone, Debug, PartialEq)]
pub struct DurationMatrix {
    size: usize,
    values: Vec<u32>,
}

impl DurationMatrix {
    /// Queries `table` for pairwise durations over `locations`, rounds them
    /// to the nearest integer and pads a zero-cost depot row and column.
    pub fn build_with_depot(table: &dyn TravelTimeTable, locations: &[GeoPoint]) -> Result<Self> {
        if locations.is_empty() {
            return Err(Error::invalid_input(ERR_EMPTY_LOCATIONS));
        }

        let raw = table.durations(locations)?;
        let n = locations.len();
        if raw.len() != n || raw.iter().any(|row| row.len() != n) {
            return Err(Error::invalid_data(format!(
                "{ERR_NOT_SQUARE}: expected {n}x{n}"
            )));
        }

        let size = n + 1;
        let mut values = vec![0u32; size * size];
        for (i, row) in raw.iter().enumerate() {
            for (j, &duration) in row.iter().enumerate() {
                if !duration.is_finite() || duration < 0.0 {
                    return Err(Error::invalid_data(format!(
                        "{ERR_BAD_DURATION}: [{i}][{j}]={duration}"
                    )));
                }
                values[(i + 1) * size + (j + 1)] = duration.round() as u32;
            }
        }

        log::debug!("matrix: built nodes={size} locations={n}");
        Ok(Self { size, values })
    }

    /// Node count including the depot.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn at(&self, from: usize, to: usize) -> u32 {
        self.values[from * self.size + to]
    }
}
