use std::fmt;

/// Planar coordinate pair.
/// Latitude and longitude are used directly as Cartesian `x=lat`, `y=lon`;
/// no geodesic correction is applied anywhere in the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn dist(self, rhs: &Self) -> f64 {
        let dx = self.lat - rhs.lat;
        let dy = self.lon - rhs.lon;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{},{}", b1.format(self.lat), b2.format(self.lon))
    }
}

/// Road segment between two endpoints. Duplicate ids are allowed.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub id: String,
    pub start: Coord,
    pub end: Coord,
}

impl Segment {
    pub fn new(id: impl Into<String>, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Self {
        Self {
            id: id.into(),
            start: Coord::new(lat1, lon1),
            end: Coord::new(lat2, lon2),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// Point of interest as read from the input, before snapping.
#[derive(Clone, Debug, PartialEq)]
pub struct RawPoint {
    pub id: String,
    pub coord: Coord,
}

impl RawPoint {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            coord: Coord::new(lat, lon),
        }
    }
}

/// A point relocated onto its nearest segment. Keeps the id of its source point.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedNode {
    pub id: String,
    pub coord: Coord,
}

impl ProjectedNode {
    pub fn new(id: impl Into<String>, coord: Coord) -> Self {
        Self {
            id: id.into(),
            coord,
        }
    }
}

impl fmt::Display for ProjectedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.id, self.coord)
    }
}
