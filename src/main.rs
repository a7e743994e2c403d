use std::{
    fs::File,
    io::{BufWriter, Write},
    time::Instant,
};

use log::info;

use fleet_mt_core::{
    logging, plan_fleet, read_trips, CheapestInsertion, ClusterOutcome, GlobalSolution,
    GreatCircleTable, OsrmTable, PlannerOptions, Result,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = PlannerOptions::from_args()?;
    logging::init_logger(&options)?;
    let trips = read_trips(&options)?;

    info!("input: trips={}", trips.len());

    let backend = CheapestInsertion;
    let solution = if options.offline {
        let table = GreatCircleTable::new(options.offline_speed)?;
        plan_fleet(&trips, &options, &table, &backend)?
    } else {
        let table = OsrmTable::new(options.osrm_url.clone(), options.osrm_profile.clone())
            .with_max_table_size(options.max_table_size);
        plan_fleet(&trips, &options, &table, &backend)?
    };

    match options.output_path() {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_routes(&mut out, &solution)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_routes(&mut out, &solution)?;
        }
    }

    info!(
        "output: clusters={} solved={} failed={} vehicles={} time={:.2}s",
        solution.clusters().len(),
        solution.solved_count(),
        solution.failed_count(),
        solution.total_vehicles(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}

/// One line per vehicle: cluster id, vehicle id, route duration and the
/// comma-joined stop nodes. Failed clusters emit a single marker line.
fn write_routes(out: &mut dyn Write, solution: &GlobalSolution) -> Result<()> {
    for (cluster_id, outcome) in solution.clusters() {
        match outcome {
            ClusterOutcome::Solved { routes, .. } => {
                for (vehicle, route) in routes {
                    let stops: Vec<String> =
                        route.stops.iter().map(|s| s.to_string()).collect();
                    writeln!(
                        out,
                        "{cluster_id} {vehicle} {} {}",
                        route.duration,
                        stops.join(",")
                    )?;
                }
            }
            ClusterOutcome::Failed { reason } => {
                writeln!(out, "{cluster_id} failed {reason}")?;
            }
        }
    }
    Ok(())
}
