//! Snap points of interest onto a planar road network and compute the exact
//! shortest closed tour through them, starting and ending at the first point.
//!
//! The pipeline is one-directional: segments + raw points are projected onto
//! the network, a symmetric distance matrix is built over the projected nodes,
//! and an exhaustive permutation search returns the optimal tour.

mod algo;
mod error;
mod geo;
mod io;
pub mod logging;
mod matrix;
mod node;
mod runner;
mod tour;

pub(crate) use algo::{permutations, solver};
pub(crate) use geo::{geometry, projector};
pub(crate) use io::options;

pub use algo::permutations::Permutations;
pub use algo::solver::{
    CancelToken, DEFAULT_MAX_NODES, ExactSolver, Solution, SolveStats, SolverMode, check_size,
    solve,
};
pub use error::{Error, Result};
pub use geo::geometry::{
    SegmentProjection, closed_path_length, euclidean, project_point_onto_segment,
};
pub use geo::projector::{NetworkProjector, Snap, project, project_detailed};
pub use io::export::{render, write_route};
pub use io::input::{
    InputMalformed, Parsed, RouteInput, parse_network, parse_points, read_network, read_points,
};
pub use io::options::{LogFormat, LogLevel, OutputFormat, RunOptions};
pub use matrix::DistanceMatrix;
pub use node::{Coord, ProjectedNode, RawPoint, Segment};
pub use runner::{RoutePlanner, RouteReport, plan_route};
pub use tour::{Tour, TourMetrics};
