use std::{
    env,
    fs::File,
    io::{self, Write},
};

use env_logger::{Builder, Target, WriteStyle, fmt::Formatter};
use log::{Level, LevelFilter, Record};

use crate::{
    Error, Result,
    options::{LogFormat, RunOptions},
};

const CRATE_TARGET_PREFIX: &str = "snap_tsp_core::";

/// Extra `env_logger` filter directives layered on top of `--log-level`,
/// e.g. `SNAP_TSP_LOG=algo::solver=trace`.
pub const LOG_FILTER_ENV: &str = "SNAP_TSP_LOG";

/// Installs the global logger. Fails if a logger is already set.
pub fn init_logger(options: &RunOptions) -> Result<()> {
    let format = options.log_format;
    let timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf, record| write_record(buf, record, format, timestamp));

    if let Ok(directives) = env::var(LOG_FILTER_ENV) {
        builder.parse_filters(&qualify_filters(&directives));
    }

    let target = match options.log_output_path() {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::other(format!(
                    "failed to create log output file {}: {e}",
                    path.display()
                ))
            })?;
            Target::Pipe(Box::new(file))
        }
        None => Target::Stderr,
    };
    builder.target(target);

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn write_record(
    buf: &mut Formatter,
    record: &Record<'_>,
    format: LogFormat,
    timestamp: bool,
) -> io::Result<()> {
    if timestamp {
        write!(buf, "{} ", buf.timestamp_millis())?;
    }
    let tag = level_tag(record.level());
    match format {
        LogFormat::Compact => writeln!(buf, "{tag} {}", record.args()),
        LogFormat::Pretty => writeln!(
            buf,
            "{tag} [{}] {}",
            short_target(record.target()),
            record.args()
        ),
    }
}

// Module paths in directives are written relative to the library, the way
// pretty log lines print them. A bare level such as `debug` stays global.
fn qualify_filters(directives: &str) -> String {
    directives
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| {
            let module = match d.split_once('=') {
                Some((module, _)) => module,
                None if d.parse::<LevelFilter>().is_ok() => return d.to_owned(),
                None => d,
            };
            if module.starts_with(CRATE_TARGET_PREFIX) {
                d.to_owned()
            } else {
                format!("{CRATE_TARGET_PREFIX}{d}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn short_target(target: &str) -> &str {
    target.strip_prefix(CRATE_TARGET_PREFIX).unwrap_or(target)
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::{level_tag, qualify_filters, short_target};

    #[test]
    fn level_tags_are_upper_case_names() {
        assert_eq!(level_tag(Level::Error), "ERROR");
        assert_eq!(level_tag(Level::Warn), "WARN");
        assert_eq!(level_tag(Level::Trace), "TRACE");
    }

    #[test]
    fn short_target_drops_crate_prefix_only() {
        assert_eq!(short_target("snap_tsp_core::algo::solver"), "algo::solver");
        assert_eq!(short_target("snap_tsp"), "snap_tsp");
    }

    #[test]
    fn filter_directives_are_scoped_to_the_library() {
        assert_eq!(
            qualify_filters("algo::solver=trace, geo::projector=debug"),
            "snap_tsp_core::algo::solver=trace,snap_tsp_core::geo::projector=debug"
        );
        assert_eq!(
            qualify_filters("snap_tsp_core::io=info"),
            "snap_tsp_core::io=info"
        );
        assert_eq!(qualify_filters("warn"), "warn");
        assert_eq!(qualify_filters("OFF"), "OFF");
        assert_eq!(
            qualify_filters("geo::projector,info"),
            "snap_tsp_core::geo::projector,info"
        );
        assert_eq!(qualify_filters("snap_tsp_core::io"), "snap_tsp_core::io");
        assert_eq!(qualify_filters(""), "");
    }
}
