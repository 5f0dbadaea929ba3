use std::fmt;

use crate::{matrix::DistanceMatrix, node::ProjectedNode};

/// Closed tour over node indices: starts and ends at the origin (index 0) and
/// visits every other index exactly once.
#[derive(Clone, Debug, PartialEq)]
pub struct Tour {
    pub order: Vec<usize>,
    pub length: f64,
}

impl Tour {
    pub fn new(order: Vec<usize>, length: f64) -> Self {
        Self { order, length }
    }

    /// Number of distinct nodes visited (the closing origin is not counted twice).
    pub fn n(&self) -> usize {
        self.order.len().saturating_sub(1)
    }

    /// Length of every consecutive leg of the tour.
    pub fn legs(&self, matrix: &DistanceMatrix) -> Vec<f64> {
        self.order
            .windows(2)
            .map(|w| matrix.get(w[0], w[1]))
            .collect()
    }

    /// Nodes in visiting order, origin repeated at the end.
    pub fn stops<'a>(&self, nodes: &'a [ProjectedNode]) -> Vec<&'a ProjectedNode> {
        self.order.iter().map(|&idx| &nodes[idx]).collect()
    }

    pub fn tour_metrics(&self, matrix: &DistanceMatrix) -> TourMetrics {
        let legs = self.legs(matrix);
        if legs.is_empty() || self.n() < 2 {
            log::info!("metrics: n={} so there's nothing to report", self.n());
            return TourMetrics::default();
        }

        let total: f64 = legs.iter().sum();
        let average = total / legs.len() as f64;
        let longest = legs.iter().copied().fold(0.0_f64, f64::max);
        let shortest = legs.iter().copied().fold(f64::INFINITY, f64::min);

        log::info!(
            "metrics: n={} legs={} total={total:.6} longest={longest:.6} shortest={shortest:.6} avg={average:.6}",
            self.n(),
            legs.len()
        );

        TourMetrics {
            legs: legs.len(),
            total,
            longest,
            shortest,
            average,
        }
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self
            .order
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        write!(f, "{order} (length={})", ryu::Buffer::new().format(self.length))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub legs: usize,
    pub total: f64,
    pub longest: f64,
    pub shortest: f64,
    pub average: f64,
}

#[cfg(test)]
mod tests {
    use super::{Tour, TourMetrics};
    use crate::{
        matrix::DistanceMatrix,
        node::{Coord, ProjectedNode},
    };

    fn triangle() -> Vec<ProjectedNode> {
        vec![
            ProjectedNode::new("a", Coord::new(0.0, 0.0)),
            ProjectedNode::new("b", Coord::new(0.0, 3.0)),
            ProjectedNode::new("c", Coord::new(4.0, 0.0)),
        ]
    }

    #[test]
    fn legs_and_metrics_follow_visiting_order() {
        let nodes = triangle();
        let matrix = DistanceMatrix::build(&nodes);
        let tour = Tour::new(vec![0, 1, 2, 0], 12.0);

        assert_eq!(tour.n(), 3);
        assert_eq!(tour.legs(&matrix), vec![3.0, 5.0, 4.0]);

        let metrics = tour.tour_metrics(&matrix);
        assert_eq!(metrics.legs, 3);
        assert_eq!(metrics.total, 12.0);
        assert_eq!(metrics.longest, 5.0);
        assert_eq!(metrics.shortest, 3.0);
        assert_eq!(metrics.average, 4.0);
    }

    #[test]
    fn origin_only_tour_has_default_metrics() {
        let nodes = triangle();
        let matrix = DistanceMatrix::build(&nodes[..1]);
        let tour = Tour::new(vec![0, 0], 0.0);
        assert_eq!(tour.n(), 1);
        assert_eq!(tour.tour_metrics(&matrix), TourMetrics::default());
    }

    #[test]
    fn stops_resolve_indices_to_nodes() {
        let nodes = triangle();
        let tour = Tour::new(vec![0, 2, 1, 0], 12.0);
        let ids: Vec<&str> = tour.stops(&nodes).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b", "a"]);
    }

    #[test]
    fn display_joins_order_with_length() {
        let tour = Tour::new(vec![0, 1, 0], 6.5);
        assert_eq!(tour.to_string(), "0 -> 1 -> 0 (length=6.5)");
    }
}
