use std::ops::Index;

use crate::{Error, Result, geometry::PlanarGeometry, node::ProjectedNode};

/// Square, symmetric, zero-diagonal distance table stored row-major.
///
/// Index `i` always refers to the `i`-th node of the slice the matrix was
/// built from; index 0 is the tour origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Plain planar Euclidean distances, each unordered pair computed once.
    pub fn build(nodes: &[ProjectedNode]) -> Self {
        let n = nodes.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = PlanarGeometry::dist(nodes[i].coord, nodes[j].coord);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        log::debug!("matrix: n={n} cells={}", data.len());
        Self { n, data }
    }

    /// Builds a matrix from explicit rows, checking that it is square,
    /// symmetric, finite, non-negative and zero on the diagonal.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::invalid_data(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }

        for i in 0..n {
            if data[i * n + i] != 0.0 {
                return Err(Error::invalid_data(format!("diagonal entry {i} is not zero")));
            }
            for j in (i + 1)..n {
                let d = data[i * n + j];
                if !d.is_finite() || d < 0.0 {
                    return Err(Error::invalid_data(format!(
                        "entry ({i}, {j}) is not a finite non-negative distance: {d}"
                    )));
                }
                if d != data[j * n + i] {
                    return Err(Error::invalid_data(format!(
                        "entries ({i}, {j}) and ({j}, {i}) differ"
                    )));
                }
            }
        }

        Ok(Self { n, data })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Closed length of `order`, counting the edge from the last index back to
    /// the first. An order of zero or one index has length 0.
    pub fn cycle_length(&self, order: &[usize]) -> f64 {
        let Some((&first, _)) = order.split_first() else {
            return 0.0;
        };
        let mut prev = first;
        let mut total = 0.0;
        for &idx in &order[1..] {
            total += self.get(prev, idx);
            prev = idx;
        }
        total + self.get(prev, first)
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.n + j]
    }
}

#[cfg(test)]
mod tests {
    use super::DistanceMatrix;
    use crate::{
        Error,
        node::{Coord, ProjectedNode},
    };

    fn nodes(coords: &[(f64, f64)]) -> Vec<ProjectedNode> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| ProjectedNode::new(format!("n{i}"), Coord::new(lat, lon)))
            .collect()
    }

    #[test]
    fn build_is_symmetric_with_zero_diagonal() {
        let m = DistanceMatrix::build(&nodes(&[
            (0.0, 0.0),
            (0.0, 3.0),
            (4.0, 0.0),
            (-2.5, 7.25),
            (1.0, 1.0),
        ]));
        assert_eq!(m.len(), 5);
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..m.len() {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!(m.get(i, j) >= 0.0);
            }
        }
        assert!((m.get(1, 2) - 5.0).abs() < 1e-12);
        assert_eq!(m[(0, 1)], 3.0);
        assert_eq!(m.row(2), &[4.0, 5.0, 0.0, m.get(2, 3), m.get(2, 4)]);
    }

    #[test]
    fn build_on_empty_and_single_node_sets() {
        let empty = DistanceMatrix::build(&[]);
        assert!(empty.is_empty());

        let single = DistanceMatrix::build(&nodes(&[(3.0, 4.0)]));
        assert_eq!(single.len(), 1);
        assert_eq!(single.get(0, 0), 0.0);
    }

    #[test]
    fn from_rows_accepts_valid_matrix() {
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ])
        .expect("valid matrix");
        assert_eq!(m.get(2, 1), 3.0);
    }

    #[test]
    fn from_rows_rejects_malformed_input() {
        let ragged = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]);
        assert!(matches!(ragged, Err(Error::InvalidData(_))));

        let asymmetric = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]]);
        assert!(matches!(asymmetric, Err(Error::InvalidData(_))));

        let diagonal = DistanceMatrix::from_rows(vec![vec![1.0, 1.0], vec![1.0, 0.0]]);
        assert!(matches!(diagonal, Err(Error::InvalidData(_))));

        let negative = DistanceMatrix::from_rows(vec![vec![0.0, -1.0], vec![-1.0, 0.0]]);
        assert!(matches!(negative, Err(Error::InvalidData(_))));
    }

    #[test]
    fn cycle_length_closes_the_loop() {
        let m = DistanceMatrix::build(&nodes(&[(0.0, 0.0), (0.0, 3.0), (4.0, 0.0)]));
        assert!((m.cycle_length(&[0, 1, 2]) - 12.0).abs() < 1e-12);
        assert_eq!(m.cycle_length(&[0]), 0.0);
        assert_eq!(m.cycle_length(&[]), 0.0);
    }
}
