use crate::{
    Error, Result,
    geometry::{PlanarGeometry, SegmentProjection},
    node::{ProjectedNode, RawPoint, Segment},
};

const ERR_NO_NETWORK: &str = "no network loaded";

/// Where a point landed on the network.
#[derive(Clone, Debug, PartialEq)]
pub struct Snap {
    pub node: ProjectedNode,
    /// Index of the chosen segment in the network slice.
    pub segment_index: usize,
    pub segment_id: String,
    /// Distance from the raw point to its projection.
    pub distance: f64,
    /// Position of the projection along the chosen segment, in `[0, 1]`.
    pub t: f64,
}

/// Snaps raw points onto the closest segment of a fixed, non-empty network.
pub struct NetworkProjector<'a> {
    segments: &'a [Segment],
}

impl<'a> NetworkProjector<'a> {
    pub fn new(segments: &'a [Segment]) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::precondition(ERR_NO_NETWORK));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &'a [Segment] {
        self.segments
    }

    /// Closest segment for one point. On equal distances the lowest segment
    /// index wins.
    pub fn snap(&self, point: &RawPoint) -> Snap {
        let mut best_idx = 0;
        let mut best: SegmentProjection = PlanarGeometry::project(point.coord, &self.segments[0]);

        for (idx, segment) in self.segments.iter().enumerate().skip(1) {
            let candidate = PlanarGeometry::project(point.coord, segment);
            if candidate.distance < best.distance {
                best = candidate;
                best_idx = idx;
            }
        }

        let segment = &self.segments[best_idx];
        log::trace!(
            "project: point={} segment={} idx={best_idx} dist={:.6} t={:.4}",
            point.id,
            segment.id,
            best.distance,
            best.t
        );

        Snap {
            node: ProjectedNode::new(point.id.clone(), best.coord()),
            segment_index: best_idx,
            segment_id: segment.id.clone(),
            distance: best.distance,
            t: best.t,
        }
    }

    /// Snaps every point, keeping input order.
    pub fn snap_all(&self, points: &[RawPoint]) -> Vec<Snap> {
        let snaps: Vec<Snap> = points.iter().map(|p| self.snap(p)).collect();

        let farthest = snaps.iter().map(|s| s.distance).fold(0.0_f64, f64::max);
        let degenerate = self.segments.iter().filter(|s| s.is_degenerate()).count();
        log::info!(
            "project: segments={} degenerate={degenerate} points={} snapped={} farthest_snap={farthest:.6}",
            self.segments.len(),
            points.len(),
            snaps.len()
        );
        snaps
    }
}

/// Projects every point onto its nearest segment.
///
/// Fails with [`Error::Precondition`] when `segments` is empty; an empty point
/// list on a loaded network is an empty success.
pub fn project(segments: &[Segment], points: &[RawPoint]) -> Result<Vec<ProjectedNode>> {
    Ok(project_detailed(segments, points)?
        .into_iter()
        .map(|snap| snap.node)
        .collect())
}

pub fn project_detailed(segments: &[Segment], points: &[RawPoint]) -> Result<Vec<Snap>> {
    Ok(NetworkProjector::new(segments)?.snap_all(points))
}
