use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use rayon::prelude::*;
use snap_tsp_derive::CliValue;

use crate::{Error, Result, Tour, matrix::DistanceMatrix, permutations::Permutations};

/// Largest instance the exhaustive search is allowed to take on by default.
/// `9!` candidate tours is still interactive; `10!` is already seconds.
pub const DEFAULT_MAX_NODES: usize = 10;

const ORIGIN: usize = 0;
const CANCEL_POLL_INTERVAL: u64 = 4_096;
const MIN_PARALLEL_NODES: usize = 3;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, CliValue)]
#[cli_value(option = "solver-mode")]
pub enum SolverMode {
    #[default]
    #[cli(alias = "sequential")]
    Single,
    Parallel,
}

/// Shared flag that asks a running solve to stop at its next poll.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Cancels and reports whether the token had already been cancelled, so
    /// an interrupt handler can escalate on the second signal.
    pub fn interrupt(&self) -> bool {
        self.0.swap(true, Ordering::Relaxed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveStats {
    /// Candidate tours whose length was computed.
    pub evaluated: u64,
    pub elapsed: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub tour: Tour,
    pub stats: SolveStats,
}

/// Exhaustive closed-tour search with node 0 fixed as start and end.
///
/// Every ordering of the non-origin nodes is evaluated, so the returned tour is
/// a global optimum. Among equal-length tours the first one produced by
/// [`Permutations`] wins, in both solver modes.
#[derive(Clone, Debug, Default)]
pub struct ExactSolver {
    mode: SolverMode,
    time_limit: Option<Duration>,
    cancel: CancelToken,
}

impl ExactSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: SolverMode) -> Self {
        self.mode = mode;
        self
    }

    /// Zero means no limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = (!limit.is_zero()).then_some(limit);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn solve(&self, matrix: &DistanceMatrix) -> Result<Solution> {
        let n = matrix.len();
        if n == 0 {
            return Err(Error::NoSolution);
        }

        let start = Instant::now();
        let stop = StopCondition {
            cancel: &self.cancel,
            // A limit past the end of the clock is no limit.
            deadline: self.time_limit.and_then(|limit| start.checked_add(limit)),
        };

        log::info!(
            "solve: n={n} mode={} candidates={} time_limit={}",
            self.mode,
            Permutations::non_origin(n)
                .count()
                .map_or_else(|| "overflow".to_owned(), |c| c.to_string()),
            self.time_limit
                .map_or_else(|| "none".to_owned(), |d| format!("{:.2}s", d.as_secs_f64()))
        );

        let outcome = match self.mode {
            SolverMode::Parallel if n >= MIN_PARALLEL_NODES => {
                search_parallel(matrix, &stop)
            }
            _ => search_branch(matrix, None, (1..n).collect(), &stop),
        };

        let elapsed = start.elapsed();
        let best = match (outcome.cancelled, outcome.best) {
            (false, Some(best)) => best,
            _ => {
                log::warn!(
                    "solve: cancelled n={n} evaluated={} time={:.3}s",
                    outcome.evaluated,
                    elapsed.as_secs_f64()
                );
                return Err(Error::Cancelled {
                    evaluated: outcome.evaluated,
                    elapsed,
                });
            }
        };

        let mut order = Vec::with_capacity(n + 1);
        order.push(ORIGIN);
        order.extend_from_slice(&best.order);
        order.push(ORIGIN);

        let tour = Tour::new(order, best.length);
        log::info!(
            "solve: n={n} length={:.6} evaluated={} time={:.3}s",
            tour.length,
            outcome.evaluated,
            elapsed.as_secs_f64()
        );

        Ok(Solution {
            tour,
            stats: SolveStats {
                evaluated: outcome.evaluated,
                elapsed,
            },
        })
    }
}

/// Optimal closed tour through every node of `matrix`, starting and ending at
/// node 0, using the sequential search without limits.
pub fn solve(matrix: &DistanceMatrix) -> Result<Tour> {
    ExactSolver::new().solve(matrix).map(|solution| solution.tour)
}

/// Caller-side guard run before the exhaustive search.
pub fn check_size(nodes: usize, max: usize) -> Result<()> {
    if nodes > max {
        return Err(Error::SizeLimitExceeded { nodes, max });
    }
    Ok(())
}

struct StopCondition<'a> {
    cancel: &'a CancelToken,
    deadline: Option<Instant>,
}

impl StopCondition<'_> {
    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

struct Best {
    /// Non-origin indices in visiting order.
    order: Vec<usize>,
    length: f64,
}

struct Outcome {
    best: Option<Best>,
    evaluated: u64,
    cancelled: bool,
}

#[inline]
fn closed_length(matrix: &DistanceMatrix, head: Option<usize>, perm: &[usize]) -> f64 {
    let mut prev = ORIGIN;
    let mut total = 0.0;
    for &idx in head.iter().chain(perm) {
        total += matrix.get(prev, idx);
        prev = idx;
    }
    total + matrix.get(prev, ORIGIN)
}

// Enumerates `tail` behind an optional fixed `head`. The undo step of the
// generator means a branch started from `tail` visits exactly the orderings
// the full recursion visits below that prefix, in the same sequence.
fn search_branch(
    matrix: &DistanceMatrix,
    head: Option<usize>,
    tail: Vec<usize>,
    stop: &StopCondition<'_>,
) -> Outcome {
    let mut perms = Permutations::new(tail);
    let mut best: Option<Best> = None;
    let mut evaluated = 0_u64;

    while let Some(perm) = perms.next_perm() {
        if evaluated % CANCEL_POLL_INTERVAL == 0 && stop.should_stop() {
            return Outcome {
                best,
                evaluated,
                cancelled: true,
            };
        }

        let length = closed_length(matrix, head, perm);
        evaluated += 1;

        if best.as_ref().is_none_or(|b| length < b.length) {
            let mut order = Vec::with_capacity(perm.len() + 1);
            order.extend(head);
            order.extend_from_slice(perm);
            best = Some(Best { order, length });
        }
    }

    Outcome {
        best,
        evaluated,
        cancelled: false,
    }
}

// One branch per choice of the first stop. Branch `i` starts from the seed with
// positions 0 and `i` swapped, matching the top level of the swap recursion, and
// branches are reduced in index order so ties resolve as in the sequential run.
fn search_parallel(matrix: &DistanceMatrix, stop: &StopCondition<'_>) -> Outcome {
    let seed: Vec<usize> = (1..matrix.len()).collect();

    let outcomes: Vec<Outcome> = (0..seed.len())
        .into_par_iter()
        .map(|i| {
            let mut branch = seed.clone();
            branch.swap(0, i);
            let head = branch[0];
            search_branch(matrix, Some(head), branch[1..].to_vec(), stop)
        })
        .collect();

    log::debug!("solve: parallel branches={}", outcomes.len());

    let mut merged = Outcome {
        best: None,
        evaluated: 0,
        cancelled: false,
    };
    for outcome in outcomes {
        merged.evaluated += outcome.evaluated;
        merged.cancelled |= outcome.cancelled;
        if let Some(candidate) = outcome.best
            && merged
                .best
                .as_ref()
                .is_none_or(|b| candidate.length < b.length)
        {
            merged.best = Some(candidate);
        }
    }
    merged
}
