use std::{env, iter::Peekable, path::Path};

use log::LevelFilter;

use crate::{Error, Result};

const DEFAULT_OSRM_URL: &str = "http://localhost:5000";
const DEFAULT_OSRM_PROFILE: &str = "driving";
const DEFAULT_MAX_TABLE_SIZE: usize = 100;
const DEFAULT_OFFLINE_SPEED: f64 = 10.0;
const DEFAULT_MAX_CLUSTER_SIZE: usize = 50;
const DEFAULT_PICKUP_DEADLINE: u64 = 15 * 60;
const DEFAULT_MAX_ROUTE_DURATION: u64 = 120 * 60;
const DEFAULT_VEHICLE_CAPACITY: u32 = 1;
const DEFAULT_SPAN_COST: u64 = 100;
const DEFAULT_SOLVE_TIME_LIMIT: u64 = 5;
const DEFAULT_MAX_ESCALATIONS: usize = 64;

/// Runtime options for fleet planning behavior.
#[derive(Clone, Debug)]
pub struct PlannerOptions {
    /// Base URL of the travel-time table service.
    pub osrm_url: String,
    /// Routing profile segment of the table service URL.
    pub osrm_profile: String,
    /// Largest location count the table service accepts in one request.
    pub max_table_size: usize,
    /// Derive durations from great-circle distance instead of the table
    /// service.
    pub offline: bool,
    /// Travel speed (meters per duration unit) for the offline provider.
    pub offline_speed: f64,
    /// Maximum trips per spatial cluster before refining the grid.
    pub max_cluster_size: usize,
    /// Latest cumulative duration at which a pickup may be served.
    pub pickup_deadline: u64,
    /// Per-vehicle maximum travel duration.
    pub max_route_duration: u64,
    /// Per-vehicle load limit.
    pub vehicle_capacity: u32,
    /// Penalty weight on the spread between vehicles' finish times.
    pub span_cost_coefficient: u64,
    /// Wall-clock seconds granted to the backend per escalation attempt.
    pub solve_time_limit: u64,
    /// Attempt ceiling of the escalation loop.
    pub max_escalations: usize,
    /// Structured logging level.
    pub log_level: LogLevel,
    /// Logging output format.
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    pub log_output: String,
    /// Optional input file path for trips. Empty means stdin.
    pub input: String,
    /// Optional output file path for routes. Empty means stdout.
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --log-level: {value}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --log-format: {value}"
            ))),
        }
    }
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            osrm_url: DEFAULT_OSRM_URL.to_string(),
            osrm_profile: DEFAULT_OSRM_PROFILE.to_string(),
            max_table_size: DEFAULT_MAX_TABLE_SIZE,
            offline: false,
            offline_speed: DEFAULT_OFFLINE_SPEED,
            max_cluster_size: DEFAULT_MAX_CLUSTER_SIZE,
            pickup_deadline: DEFAULT_PICKUP_DEADLINE,
            max_route_duration: DEFAULT_MAX_ROUTE_DURATION,
            vehicle_capacity: DEFAULT_VEHICLE_CAPACITY,
            span_cost_coefficient: DEFAULT_SPAN_COST,
            solve_time_limit: DEFAULT_SOLVE_TIME_LIMIT,
            max_escalations: DEFAULT_MAX_ESCALATIONS,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl PlannerOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = split_arg(raw_name, &mut args);
            options.apply_option(&name, value)?;
        }

        Ok(options)
    }

    fn apply_option(&mut self, name: &str, value: Option<String>) -> Result<()> {
        match name {
            "osrm-url" => self.osrm_url = required(name, value)?,
            "osrm-profile" => self.osrm_profile = required(name, value)?,
            "max-table-size" => self.max_table_size = parse_num(name, &required(name, value)?)?,
            "offline" => self.offline = flag_value(name, value)?,
            "no-offline" => {
                bare_flag(name, value)?;
                self.offline = false;
            }
            "offline-speed" => self.offline_speed = parse_num(name, &required(name, value)?)?,
            "max-cluster-size" => {
                self.max_cluster_size = parse_num(name, &required(name, value)?)?
            }
            "pickup-deadline" => self.pickup_deadline = parse_num(name, &required(name, value)?)?,
            "max-route-duration" => {
                self.max_route_duration = parse_num(name, &required(name, value)?)?
            }
            "vehicle-capacity" => {
                self.vehicle_capacity = parse_num(name, &required(name, value)?)?
            }
            "span-cost" => {
                self.span_cost_coefficient = parse_num(name, &required(name, value)?)?
            }
            "solve-time-limit" => {
                self.solve_time_limit = parse_num(name, &required(name, value)?)?
            }
            "max-escalations" => {
                self.max_escalations = parse_num(name, &required(name, value)?)?
            }
            "log-level" => self.log_level = LogLevel::parse(&required(name, value)?)?,
            "log-format" => self.log_format = LogFormat::parse(&required(name, value)?)?,
            "log-timestamp" => self.log_timestamp = flag_value(name, value)?,
            "no-log-timestamp" => {
                bare_flag(name, value)?;
                self.log_timestamp = false;
            }
            "log-output" => self.log_output = required(name, value)?,
            "input" => self.input = required(name, value)?,
            "output" => self.output = required(name, value)?,
            _ => {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )))
            }
        }
        Ok(())
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  fleet-mt [options] [--input trips.txt]\n",
            "  fleet-mt [options] < trips.txt\n\n",
            "Trips are whitespace-separated lat,lng tokens, two per trip\n",
            "(pickup then dropoff).\n\n",
            "Options:\n",
            "  --osrm-url <url>\n",
            "  --osrm-profile <name>\n",
            "  --max-table-size <usize>\n",
            "  --offline[=<bool>]\n",
            "  --no-offline\n",
            "  --offline-speed <f64>\n",
            "  --max-cluster-size <usize>\n",
            "  --pickup-deadline <u64>\n",
            "  --max-route-duration <u64>\n",
            "  --vehicle-capacity <u32>\n",
            "  --span-cost <u64>\n",
            "  --solve-time-limit <u64>\n",
            "  --max-escalations <usize>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  fleet-mt --input trips.txt --output routes.txt\n",
            "  fleet-mt --offline --offline-speed 12.5 < trips.txt\n",
            "  fleet-mt --max-cluster-size 25 --log-level=info < trips.txt\n",
            "  fleet-mt --osrm-url http://router:5000 --pickup-deadline 600 < trips.txt\n",
        )
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        stream_path(&self.log_output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        stream_path(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        stream_path(&self.output)
    }
}

fn stream_path(value: &str) -> Option<&Path> {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        None
    } else {
        Some(Path::new(value))
    }
}

/// Splits `--name=value`; otherwise takes the following argument as the
/// value unless it is another option.
fn split_arg<I>(raw_name: &str, args: &mut Peekable<I>) -> (String, Option<String>)
where
    I: Iterator<Item = String>,
{
    if let Some((name, value)) = raw_name.split_once('=') {
        return (name.to_string(), Some(value.to_string()));
    }
    let value = match args.peek() {
        Some(next) if !next.starts_with("--") => args.next(),
        _ => None,
    };
    (raw_name.to_string(), value)
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::invalid_input(format!("Missing value for --{name}")))
}

fn bare_flag(name: &str, value: Option<String>) -> Result<()> {
    if value.is_some() {
        return Err(Error::invalid_input(format!(
            "Flag --{name} does not take a value"
        )));
    }
    Ok(())
}

fn flag_value(name: &str, value: Option<String>) -> Result<bool> {
    match value {
        Some(v) => parse_bool(name, &v),
        None => Ok(true),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

fn parse_num<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::invalid_input(format!("Invalid value for --{name}: {value}")))
}
