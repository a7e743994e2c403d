use serde::Deserialize;

use crate::{Error, GeoPoint, Result};

use super::TravelTimeTable;

const DEFAULT_MAX_TABLE_SIZE: usize = 100;
const STATUS_OK: &str = "Ok";

const ERR_EMPTY_LOCATIONS: &str = "no locations to query";
const ERR_TABLE_TOO_BIG: &str = "table too big";
const ERR_MISSING_DURATIONS: &str = "response carries no durations";
const ERR_BAD_SHAPE: &str = "response durations are not square over the request";

/// Blocking client for an OSRM-style `/table/v1/{profile}/` service.
///
/// Every failure mode is `DataUnavailable`: the cluster cannot be costed
/// and must be rejected or subdivided by the caller.
pub struct OsrmTable {
    base_url: String,
    profile: String,
    max_table_size: usize,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct TableResponse {
    code: String,
    durations: Option<Vec<Vec<f64>>>,
}

impl OsrmTable {
    pub fn new(base_url: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            profile: profile.into(),
            max_table_size: DEFAULT_MAX_TABLE_SIZE,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_max_table_size(mut self, max_table_size: usize) -> Self {
        self.max_table_size = max_table_size;
        self
    }

    fn table_url(&self, locations: &[GeoPoint]) -> String {
        let mut coords = String::new();
        for (i, location) in locations.iter().enumerate() {
            if i > 0 {
                coords.push(';');
            }
            let mut b1 = ryu::Buffer::new();
            let mut b2 = ryu::Buffer::new();
            coords.push_str(b1.format(location.lng()));
            coords.push(',');
            coords.push_str(b2.format(location.lat()));
        }
        format!(
            "{}/table/v1/{}/{coords}",
            self.base_url.trim_end_matches('/'),
            self.profile
        )
    }
}

fn validate_response(response: TableResponse, n: usize) -> Result<Vec<Vec<f64>>> {
    if response.code != STATUS_OK {
        return Err(Error::data_unavailable(format!(
            "service answered code={}",
            response.code
        )));
    }
    let durations = response
        .durations
        .ok_or_else(|| Error::data_unavailable(ERR_MISSING_DURATIONS))?;
    if durations.len() != n || durations.iter().any(|row| row.len() != n) {
        return Err(Error::data_unavailable(format!("{ERR_BAD_SHAPE}: n={n}")));
    }
    Ok(durations)
}

impl TravelTimeTable for OsrmTable {
    fn durations(&self, locations: &[GeoPoint]) -> Result<Vec<Vec<f64>>> {
        if locations.is_empty() {
            return Err(Error::invalid_input(ERR_EMPTY_LOCATIONS));
        }
        if locations.len() > self.max_table_size {
            return Err(Error::data_unavailable(format!(
                "{ERR_TABLE_TOO_BIG}: n={} limit={}",
                locations.len(),
                self.max_table_size
            )));
        }

        let url = self.table_url(locations);
        log::debug!("table: request n={} url={url}", locations.len());

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::data_unavailable(format!("table request failed: {e}")))?
            .json::<TableResponse>()
            .map_err(|e| Error::data_unavailable(format!("table response unreadable: {e}")))?;

        validate_response(response, locations.len())
    }
}
