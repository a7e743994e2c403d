use std::{fs, io::Read};

use crate::{options::PlannerOptions, Error, GeoPoint, Result, TripRequest};

const ERR_NO_TRIPS: &str = "No trips provided.";

/// Reads trips from the configured input path, or stdin when none is set.
pub fn read_trips(options: &PlannerOptions) -> Result<Vec<TripRequest>> {
    let raw = match options.input_path() {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_trips(&raw)
}

/// Parses whitespace-separated `lat,lng` tokens, two per trip: pickup
/// first, dropoff second.
pub(crate) fn parse_trips(input: &str) -> Result<Vec<TripRequest>> {
    let mut points = Vec::new();
    for (idx, tok) in input.split_whitespace().enumerate() {
        points.push(parse_point(idx, tok)?);
    }

    if points.is_empty() {
        return Err(Error::invalid_input(ERR_NO_TRIPS));
    }
    if points.len() % 2 != 0 {
        return Err(Error::invalid_input(format!(
            "Trip {} has a pickup but no dropoff (odd token count {})",
            points.len() / 2 + 1,
            points.len()
        )));
    }

    Ok(points
        .chunks_exact(2)
        .map(|pair| TripRequest::new(pair[0], pair[1]))
        .collect())
}

fn parse_point(idx: usize, tok: &str) -> Result<GeoPoint> {
    let mut it = tok.split(',');
    let lat_s = it
        .next()
        .ok_or_else(|| Error::invalid_input(format!("Token {}: missing latitude", idx + 1)))?;
    let lng_s = it
        .next()
        .ok_or_else(|| Error::invalid_input(format!("Token {}: missing longitude", idx + 1)))?;

    if it.next().is_some() {
        return Err(Error::invalid_input(format!(
            "Token {}: expected 'lat,lng' but got extra comma fields: {tok}",
            idx + 1
        )));
    }

    let lat: f64 = lat_s.parse().map_err(|_| {
        Error::invalid_input(format!("Token {}: invalid latitude: {}", idx + 1, lat_s))
    })?;
    let lng: f64 = lng_s.parse().map_err(|_| {
        Error::invalid_input(format!("Token {}: invalid longitude: {}", idx + 1, lng_s))
    })?;

    Ok(GeoPoint::from_lat_lng(lat, lng))
}
