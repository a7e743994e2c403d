use std::collections::BTreeMap;

use h3o::{CellIndex, LatLng, Resolution};

use crate::{Error, Result, TripRequest};

const INITIAL_RESOLUTION: Resolution = Resolution::Four;
const MAX_RESOLUTION: Resolution = Resolution::Fifteen;
const ERR_INVALID_LAT_LNG: &str = "invalid lat/lng for H3";
const ERR_INVALID_CAP: &str = "max_cluster_size must be > 0";

/// Per-trip partition state. Once assigned, a trip is never moved to a
/// finer resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Assignment {
    Unassigned,
    Assigned(usize),
}

/// Recursively partitions trips into clusters of at most `max_cluster_size`
/// by the H3 cell containing each pickup location.
///
/// Buckets small enough at the current resolution are finalized in stable
/// sorted-cell order; the oversized remainder is re-bucketed one resolution
/// finer. Past the finest resolution an oversized bucket (trips sharing one
/// exact pickup coordinate) is split by stable index order, so termination
/// is unconditional. Returns clusters of trip indices; their union is
/// exactly the input index set.
pub(crate) fn partition_trips(
    trips: &[TripRequest],
    max_cluster_size: usize,
) -> Result<Vec<Vec<usize>>> {
    if max_cluster_size == 0 {
        return Err(Error::invalid_input(ERR_INVALID_CAP));
    }

    let mut state = vec![Assignment::Unassigned; trips.len()];
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut unresolved: Vec<usize> = (0..trips.len()).collect();
    let mut resolution = INITIAL_RESOLUTION;

    while !unresolved.is_empty() {
        let buckets = bucket_by_pickup_cell(trips, resolution, &unresolved)?;

        let mut remaining: Vec<usize> = Vec::new();
        for (_cell, idxs) in buckets {
            if idxs.len() <= max_cluster_size {
                finalize(&mut clusters, &mut state, idxs);
            } else {
                remaining.extend(idxs);
            }
        }

        if remaining.is_empty() {
            break;
        }

        if resolution == MAX_RESOLUTION {
            // Over the cap even in the finest cells: stable split.
            remaining.sort_unstable();
            for chunk in remaining.chunks(max_cluster_size) {
                finalize(&mut clusters, &mut state, chunk.to_vec());
            }
            break;
        }

        resolution = Resolution::try_from(resolution as u8 + 1).unwrap_or(MAX_RESOLUTION);
        unresolved = remaining;
    }

    debug_assert!(clusters
        .iter()
        .enumerate()
        .all(|(id, c)| c.iter().all(|&i| assigned_to(&state, i) == Some(id))));
    log::debug!(
        "partition: done trips={} clusters={} final_res={}",
        trips.len(),
        clusters.len(),
        resolution as u8
    );
    Ok(clusters)
}

fn assigned_to(state: &[Assignment], i: usize) -> Option<usize> {
    match state[i] {
        Assignment::Assigned(id) => Some(id),
        Assignment::Unassigned => None,
    }
}

fn finalize(clusters: &mut Vec<Vec<usize>>, state: &mut [Assignment], idxs: Vec<usize>) {
    let id = clusters.len();
    for &i in &idxs {
        debug_assert_eq!(state[i], Assignment::Unassigned);
        state[i] = Assignment::Assigned(id);
    }
    clusters.push(idxs);
}

fn bucket_by_pickup_cell(
    trips: &[TripRequest],
    resolution: Resolution,
    subset: &[usize],
) -> Result<BTreeMap<CellIndex, Vec<usize>>> {
    let mut map: BTreeMap<CellIndex, Vec<usize>> = BTreeMap::new();

    for &i in subset {
        let pickup = trips[i].pickup;
        let ll = LatLng::new(pickup.lat(), pickup.lng())
            .map_err(|_| Error::invalid_input(ERR_INVALID_LAT_LNG))?;
        map.entry(ll.to_cell(resolution)).or_default().push(i);
    }

    Ok(map)
}
