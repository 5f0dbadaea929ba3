use std::{env, path::Path, time::Duration};

use log::LevelFilter;
use snap_tsp_derive::{CliOptions, CliValue, KvDisplay};

use crate::{DEFAULT_MAX_NODES, Error, Result, SolverMode};

/// Runtime options for loading, solving and reporting a route.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct RunOptions {
    /// Road network file with `id,lat1,lon1,lat2,lon2` rows.
    #[cli(long = "network", value = "path")]
    pub network: String,
    /// Points file with `id,lat,lon` rows. Empty or `-` reads stdin.
    #[cli(long = "points", value = "path")]
    pub points: String,
    /// Route output file. Empty or `-` writes stdout.
    #[cli(long = "output", value = "path")]
    pub output: String,
    /// Route output format.
    #[cli(long = "format", value = "text|wkt|geojson", parse_with = "OutputFormat::parse")]
    pub format: OutputFormat,
    /// Largest node count the exhaustive search accepts.
    #[cli(long = "max-nodes", value = "usize")]
    pub max_nodes: usize,
    /// Search strategy.
    #[cli(long = "solver-mode", value = "single|parallel", parse_with = "SolverMode::parse")]
    pub solver_mode: SolverMode,
    /// Abort the search after this many seconds. 0 disables the limit.
    #[cli(long = "time-limit", value = "seconds")]
    pub time_limit: f64,
    /// Logging level.
    #[cli(long = "log-level", value = "error|warn|info|debug|trace|off", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Log line layout.
    #[cli(long = "log-format", value = "compact|pretty", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Log file. Empty or `-` logs to stderr.
    #[cli(long = "log-output", value = "path")]
    pub log_output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
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
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "format")]
pub enum OutputFormat {
    #[cli(alias = "txt")]
    Text,
    Wkt,
    #[cli(name = "geojson", alias = "json")]
    GeoJson,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            network: String::new(),
            points: String::new(),
            output: String::new(),
            format: OutputFormat::Text,
            max_nodes: DEFAULT_MAX_NODES,
            solver_mode: SolverMode::Single,
            time_limit: 0.0,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
        }
    }
}

impl RunOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    pub(crate) fn parse_from_iter<I, S>(args: I) -> Result<Self>
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

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if options.apply_cli_option(&name, value.clone())? {
                continue;
            }

            match name.as_str() {
                "log-timestamp" => {
                    options.log_timestamp = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> Result<()> {
        if Duration::try_from_secs_f64(self.time_limit).is_err() {
            return Err(Error::invalid_input(format!(
                "--time-limit must be a non-negative number of seconds, got {}",
                self.time_limit
            )));
        }
        Ok(())
    }

    pub fn usage() -> String {
        format!(
            concat!(
                "Usage:\n",
                "  snap-tsp --network roads.csv --points stops.csv [options]\n",
                "  snap-tsp --network roads.csv [options] < stops.csv\n\n",
                "Options:\n",
                "{}",
                "  --log-timestamp[=<bool>]\n",
                "  --no-log-timestamp\n",
                "  --help\n",
                "\n",
                "Environment:\n",
                "  SNAP_TSP_LOG  extra log filter directives, e.g. algo::solver=trace\n",
                "\n",
                "Examples:\n",
                "  snap-tsp --network roads.csv --points stops.csv --format wkt\n",
                "  snap-tsp --network roads.csv --points stops.csv --format geojson --output route.json\n",
                "  snap-tsp --network roads.csv --solver-mode parallel --time-limit 30 < stops.csv\n",
                "  snap-tsp --network roads.csv --points stops.csv --log-level=info --log-format=pretty\n",
            ),
            Self::cli_usage()
        )
    }

    pub fn network_path(&self) -> Option<&Path> {
        optional_path(&self.network)
    }

    pub fn points_path(&self) -> Option<&Path> {
        optional_path(&self.points)
    }

    pub fn output_path(&self) -> Option<&Path> {
        optional_path(&self.output)
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        optional_path(&self.log_output)
    }

    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit).unwrap_or(Duration::ZERO)
    }
}

fn optional_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}
