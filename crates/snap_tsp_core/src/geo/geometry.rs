use crate::node::{Coord, Segment};

/// Result of projecting a point onto a finite segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentProjection {
    /// Euclidean distance from the query point to the projected point.
    pub distance: f64,
    pub proj_x: f64,
    pub proj_y: f64,
    /// Interpolation fraction along the segment, always in `[0, 1]`.
    pub t: f64,
}

impl SegmentProjection {
    pub fn coord(&self) -> Coord {
        Coord::new(self.proj_x, self.proj_y)
    }
}

/// Nearest point on the segment `(x1, y1)-(x2, y2)` to `(px, py)`.
///
/// The scalar projection parameter is clamped to `[0, 1]`, so the result never
/// lies on the extension of the segment. A zero-length segment projects onto
/// its shared endpoint.
pub fn project_point_onto_segment(
    px: f64,
    py: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
) -> SegmentProjection {
    let vx = x2 - x1;
    let vy = y2 - y1;
    let wx = px - x1;
    let wy = py - y1;

    let len2 = vx * vx + vy * vy;
    let t = if len2 > 0.0 {
        ((vx * wx + vy * wy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let proj_x = x1 + t * vx;
    let proj_y = y1 + t * vy;
    let dx = px - proj_x;
    let dy = py - proj_y;

    SegmentProjection {
        distance: (dx * dx + dy * dy).sqrt(),
        proj_x,
        proj_y,
        t,
    }
}

#[inline]
pub fn euclidean(a: Coord, b: Coord) -> f64 {
    a.dist(&b)
}

/// Length of the closed polyline through `coords`, returning to the first one.
pub fn closed_path_length(coords: &[Coord]) -> f64 {
    let Some(&first) = coords.first() else {
        return 0.0;
    };
    let open: f64 = coords.windows(2).map(|w| euclidean(w[0], w[1])).sum();
    coords.last().map_or(open, |&last| open + euclidean(last, first))
}

pub(crate) struct PlanarGeometry;

impl PlanarGeometry {
    #[inline]
    pub(crate) fn project(point: Coord, segment: &Segment) -> SegmentProjection {
        project_point_onto_segment(
            point.lat,
            point.lon,
            segment.start.lat,
            segment.start.lon,
            segment.end.lat,
            segment.end.lon,
        )
    }

    #[inline]
    pub(crate) fn dist(a: Coord, b: Coord) -> f64 {
        euclidean(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::{PlanarGeometry, closed_path_length, euclidean, project_point_onto_segment};
    use crate::node::{Coord, Segment};

    const EPS: f64 = 1e-12;

    #[test]
    fn interior_point_projects_perpendicularly() {
        let p = project_point_onto_segment(2.0, 3.0, 0.0, 0.0, 4.0, 0.0);
        assert!((p.proj_x - 2.0).abs() < EPS);
        assert!(p.proj_y.abs() < EPS);
        assert!((p.distance - 3.0).abs() < EPS);
        assert!((p.t - 0.5).abs() < EPS);
    }

    #[test]
    fn projection_is_clamped_to_segment_ends() {
        let before = project_point_onto_segment(-3.0, 4.0, 0.0, 0.0, 10.0, 0.0);
        assert_eq!(before.t, 0.0);
        assert_eq!((before.proj_x, before.proj_y), (0.0, 0.0));
        assert!((before.distance - 5.0).abs() < EPS);

        let after = project_point_onto_segment(13.0, -4.0, 0.0, 0.0, 10.0, 0.0);
        assert_eq!(after.t, 1.0);
        assert_eq!((after.proj_x, after.proj_y), (10.0, 0.0));
        assert!((after.distance - 5.0).abs() < EPS);
    }

    #[test]
    fn zero_length_segment_projects_onto_endpoint() {
        let p = project_point_onto_segment(4.0, 5.0, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(p.t, 0.0);
        assert_eq!((p.proj_x, p.proj_y), (1.0, 1.0));
        assert!((p.distance - 5.0).abs() < EPS);
        assert!(p.distance.is_finite());
    }

    #[test]
    fn projection_lies_on_the_finite_segment() {
        let (x1, y1, x2, y2) = (-1.5, 2.0, 3.5, -0.5);
        let queries = [
            (0.0, 0.0),
            (10.0, 10.0),
            (-10.0, 3.0),
            (3.5, -0.5),
            (1.0, 0.75),
            (-7.25, -9.0),
        ];
        for (px, py) in queries {
            let p = project_point_onto_segment(px, py, x1, y1, x2, y2);
            assert!((0.0..=1.0).contains(&p.t), "t out of range: {}", p.t);

            let lo_x = x1.min(x2);
            let hi_x = x1.max(x2);
            let lo_y = y1.min(y2);
            let hi_y = y1.max(y2);
            assert!(p.proj_x >= lo_x - EPS && p.proj_x <= hi_x + EPS);
            assert!(p.proj_y >= lo_y - EPS && p.proj_y <= hi_y + EPS);

            // collinear with the segment
            let cross = (x2 - x1) * (p.proj_y - y1) - (y2 - y1) * (p.proj_x - x1);
            assert!(cross.abs() < 1e-9);
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let a = project_point_onto_segment(0.3, 0.7, 0.1, 0.2, 0.9, 0.4);
        let b = project_point_onto_segment(0.3, 0.7, 0.1, 0.2, 0.9, 0.4);
        assert_eq!(a, b);
    }

    #[test]
    fn project_uses_lat_as_x_and_lon_as_y() {
        let segment = Segment::new("s", 0.0, 0.0, 0.0, 10.0);
        let p = PlanarGeometry::project(Coord::new(2.0, 4.0), &segment);
        assert!(p.coord().dist(&Coord::new(0.0, 4.0)) < EPS);
        assert!((p.t - 0.4).abs() < EPS);
        assert!((p.distance - 2.0).abs() < EPS);
    }

    #[test]
    fn closed_path_returns_to_start() {
        let triangle = [
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 3.0),
            Coord::new(4.0, 0.0),
        ];
        assert_eq!(euclidean(triangle[1], triangle[2]), 5.0);
        assert_eq!(closed_path_length(&triangle), 12.0);
        assert_eq!(closed_path_length(&triangle[..1]), 0.0);
        assert_eq!(closed_path_length(&[]), 0.0);
    }
}
