use std::time::Duration;

use snap_tsp_derive::KvDisplay;

use crate::{
    CancelToken, DEFAULT_MAX_NODES, Error, ExactSolver, Result, RouteInput, RunOptions, SolverMode,
    Tour,
    matrix::DistanceMatrix,
    node::{ProjectedNode, RawPoint, Segment},
    projector::{Snap, project_detailed},
    solver::check_size,
    tour::TourMetrics,
};

const ERR_NO_NODES: &str = "no projected nodes to route (load points first)";

/// Everything produced by one run of the pipeline.
#[derive(Clone, Debug, KvDisplay)]
pub struct RouteReport {
    #[kv(fmt = "len")]
    pub nodes: Vec<ProjectedNode>,
    #[kv(skip)]
    pub snaps: Vec<Snap>,
    #[kv(skip)]
    pub matrix: DistanceMatrix,
    pub tour: Tour,
    #[kv(fmt = "debug")]
    pub metrics: TourMetrics,
    pub evaluated: u64,
    #[kv(fmt = "secs")]
    pub elapsed: Duration,
}

/// Projector, size guard, matrix builder and exact solver wired in order.
#[derive(Clone, Debug)]
pub struct RoutePlanner {
    max_nodes: usize,
    solver: ExactSolver,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NODES)
    }
}

impl RoutePlanner {
    pub fn new(max_nodes: usize) -> Self {
        Self {
            max_nodes,
            solver: ExactSolver::new(),
        }
    }

    pub fn from_options(options: &RunOptions, cancel: CancelToken) -> Self {
        Self {
            max_nodes: options.max_nodes,
            solver: ExactSolver::new()
                .with_mode(options.solver_mode)
                .with_time_limit(options.time_limit())
                .with_cancel_token(cancel),
        }
    }

    pub fn with_mode(mut self, mode: SolverMode) -> Self {
        self.solver = self.solver.with_mode(mode);
        self
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    pub fn plan(&self, segments: &[Segment], points: &[RawPoint]) -> Result<RouteReport> {
        let snaps = project_detailed(segments, points)?;
        if snaps.is_empty() {
            return Err(Error::precondition(ERR_NO_NODES));
        }
        check_size(snaps.len(), self.max_nodes)?;

        let nodes: Vec<ProjectedNode> = snaps.iter().map(|snap| snap.node.clone()).collect();
        let matrix = DistanceMatrix::build(&nodes);
        let solution = self.solver.solve(&matrix)?;
        let metrics = solution.tour.tour_metrics(&matrix);

        Ok(RouteReport {
            nodes,
            snaps,
            matrix,
            tour: solution.tour,
            metrics,
            evaluated: solution.stats.evaluated,
            elapsed: solution.stats.elapsed,
        })
    }
}

pub fn plan_route(
    input: &RouteInput,
    options: &RunOptions,
    cancel: CancelToken,
) -> Result<RouteReport> {
    RoutePlanner::from_options(options, cancel).plan(&input.segments, &input.points)
}
