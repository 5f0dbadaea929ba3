use std::{
    fmt, fs,
    io::Read,
    path::{Path, PathBuf},
};

use snap_tsp_derive::KvDisplay;

use crate::{
    Error, Result,
    node::{RawPoint, Segment},
    options::RunOptions,
};

const NETWORK_FIELDS: usize = 5;
const POINT_FIELDS: usize = 3;
const FIELD_SEPARATOR: char = ',';
const STDIN_LABEL: &str = "<stdin>";

const ERR_MISSING_NETWORK: &str = "no network file given (use --network <path>)";

/// Why a record was dropped. Malformed rows never abort a load.
#[derive(Clone, Debug, PartialEq)]
pub enum InputMalformed {
    TooFewFields { found: usize, expected: usize },
    BadCoordinate { column: usize, value: String },
}

impl fmt::Display for InputMalformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields { found, expected } => {
                write!(f, "expected at least {expected} fields, found {found}")
            }
            Self::BadCoordinate { column, value } => {
                write!(f, "column {column} is not a finite number: {value:?}")
            }
        }
    }
}

/// Records that survived parsing plus the number of dropped rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Parsed<T> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

/// Parses `id,lat1,lon1,lat2,lon2` rows. The first line is a header.
pub fn parse_network(text: &str) -> Parsed<Segment> {
    parse_rows(text, "network", NETWORK_FIELDS, |fields| {
        let [lat1, lon1, lat2, lon2] = [
            coordinate(fields, 1)?,
            coordinate(fields, 2)?,
            coordinate(fields, 3)?,
            coordinate(fields, 4)?,
        ];
        Ok(Segment::new(fields[0], lat1, lon1, lat2, lon2))
    })
}

/// Parses `id,lat,lon` rows. The first line is a header.
pub fn parse_points(text: &str) -> Parsed<RawPoint> {
    parse_rows(text, "points", POINT_FIELDS, |fields| {
        Ok(RawPoint::new(
            fields[0],
            coordinate(fields, 1)?,
            coordinate(fields, 2)?,
        ))
    })
}

pub fn read_network(path: &Path) -> Result<Parsed<Segment>> {
    Ok(parse_network(&read_text(path)?))
}

pub fn read_points(path: &Path) -> Result<Parsed<RawPoint>> {
    Ok(parse_points(&read_text(path)?))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::other(format!("failed to read input file {}: {e}", path.display()))
    })
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn coordinate(fields: &[&str], column: usize) -> std::result::Result<f64, InputMalformed> {
    let raw = fields[column];
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputMalformed::BadCoordinate {
            column,
            value: raw.to_owned(),
        }),
    }
}

fn parse_rows<T>(
    text: &str,
    kind: &str,
    min_fields: usize,
    build: impl Fn(&[&str]) -> std::result::Result<T, InputMalformed>,
) -> Parsed<T> {
    let mut parsed = Parsed::empty();

    for (line_no, line) in text.trim().lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
        let record = if fields.len() < min_fields {
            Err(InputMalformed::TooFewFields {
                found: fields.len(),
                expected: min_fields,
            })
        } else {
            build(&fields)
        };

        match record {
            Ok(record) => parsed.records.push(record),
            Err(reason) => {
                parsed.skipped += 1;
                log::debug!("input: {kind} line={} skipped: {reason}", line_no + 1);
            }
        }
    }

    log::info!(
        "input: {kind} records={} skipped={}",
        parsed.records.len(),
        parsed.skipped
    );
    parsed
}

/// Everything the route pipeline needs, loaded from the paths in [`RunOptions`].
#[derive(Clone, Debug, KvDisplay)]
pub struct RouteInput {
    #[kv(fmt = "path")]
    pub network_path: PathBuf,
    #[kv(fmt = "path")]
    pub points_path: PathBuf,
    #[kv(fmt = "len")]
    pub segments: Vec<Segment>,
    #[kv(fmt = "len")]
    pub points: Vec<RawPoint>,
    pub skipped_segments: usize,
    pub skipped_points: usize,
}

impl RouteInput {
    pub fn new(segments: Vec<Segment>, points: Vec<RawPoint>) -> Self {
        Self {
            network_path: PathBuf::new(),
            points_path: PathBuf::new(),
            segments,
            points,
            skipped_segments: 0,
            skipped_points: 0,
        }
    }

    /// Reads the network file and the points file (or stdin when the points
    /// path is empty or `-`).
    pub fn load(options: &RunOptions) -> Result<Self> {
        let network_path = options
            .network_path()
            .ok_or_else(|| Error::invalid_input(ERR_MISSING_NETWORK))?;
        let network = read_network(network_path)?;

        let (points_path, points) = match options.points_path() {
            Some(path) => (path.to_path_buf(), read_points(path)?),
            None => (PathBuf::from(STDIN_LABEL), parse_points(&read_stdin()?)),
        };

        Ok(Self {
            network_path: network_path.to_path_buf(),
            points_path,
            segments: network.records,
            points: points.records,
            skipped_segments: network.skipped,
            skipped_points: points.skipped,
        })
    }
}
