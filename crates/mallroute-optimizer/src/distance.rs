//! Distance metric and the per-call distance matrix.
//!
//! The metric is planar Euclidean distance in normalized map space plus a
//! flat penalty per floor of difference. The penalty does not model
//! vertical travel; it only makes floor changes cost something so that
//! tours finish one floor before moving on.

use crate::types::Waypoint;

/// Distance between two waypoints under the floor-penalized metric.
///
/// `sqrt(dx² + dy²) + floor_penalty_weight * |Δfloor|`
#[allow(clippy::suboptimal_flops)]
#[must_use]
pub fn distance(a: &Waypoint, b: &Waypoint, floor_penalty_weight: f64) -> f64 {
    let floor_diff = f64::from(a.floor.abs_diff(b.floor));
    a.point().distance(b.point()) + floor_penalty_weight * floor_diff
}

/// Dense n×n table of pairwise waypoint distances.
///
/// Stored row-major in a flat vector. Symmetric with a zero diagonal:
/// only the upper triangle is computed and it is mirrored into the lower.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix for `waypoints` under the given floor penalty.
    #[must_use]
    pub fn build(waypoints: &[Waypoint], floor_penalty_weight: f64) -> Self {
        let n = waypoints.len();
        let mut data = vec![0.0; n * n];

        for i in 0..n {
            for j in (i + 1)..n {
                let d = distance(&waypoints[i], &waypoints[j], floor_penalty_weight);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        Self { n, data }
    }

    /// Number of waypoints (rows) in the matrix.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.n
    }

    /// Returns `true` if the matrix covers no waypoints.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance from waypoint `i` to waypoint `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// All distances from waypoint `i`, indexed by destination.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Waypoint> {
        vec![
            Waypoint::new("A", 0.0, 0.0),
            Waypoint::new("B", 1.0, 0.0),
            Waypoint::new("C", 1.0, 1.0),
            Waypoint::new("D", 0.0, 1.0),
        ]
    }

    #[test]
    fn same_floor_is_euclidean() {
        let a = Waypoint::new("a", 0.0, 0.0);
        let b = Waypoint::new("b", 0.3, 0.4);
        assert!((distance(&a, &b, 0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn floor_penalty_is_per_floor() {
        let a = Waypoint::new("a", 0.0, 0.0).on_floor(-1);
        let b = Waypoint::new("b", 0.0, 0.0).on_floor(2);
        assert!((distance(&a, &b, 0.1) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Waypoint::new("a", 0.12, 0.93).on_floor(1);
        let b = Waypoint::new("b", 0.77, 0.05).on_floor(-2);
        assert_eq!(
            distance(&a, &b, 0.02).to_bits(),
            distance(&b, &a, 0.02).to_bits()
        );
    }

    #[test]
    fn raising_penalty_never_shrinks_cross_floor_distance() {
        let a = Waypoint::new("a", 0.2, 0.2);
        let b = Waypoint::new("b", 0.6, 0.9).on_floor(1);
        let mut previous = distance(&a, &b, 0.0);
        for step in 1..=10 {
            let d = distance(&a, &b, f64::from(step) * 0.05);
            assert!(d >= previous);
            previous = d;
        }
    }

    #[test]
    fn penalty_ignored_on_same_floor() {
        let a = Waypoint::new("a", 0.2, 0.2).on_floor(3);
        let b = Waypoint::new("b", 0.6, 0.9).on_floor(3);
        assert_eq!(
            distance(&a, &b, 0.0).to_bits(),
            distance(&a, &b, 10.0).to_bits()
        );
    }

    #[test]
    fn matrix_has_zero_diagonal() {
        let m = DistanceMatrix::build(&square(), 0.02);
        for i in 0..m.len() {
            assert!(m.get(i, i).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn matrix_is_symmetric() {
        let mut waypoints = square();
        waypoints[2].floor = 1;
        let m = DistanceMatrix::build(&waypoints, 0.5);
        for i in 0..m.len() {
            for j in 0..m.len() {
                assert_eq!(m.get(i, j).to_bits(), m.get(j, i).to_bits());
            }
        }
    }

    #[test]
    fn matrix_entries_match_metric() {
        let m = DistanceMatrix::build(&square(), 0.0);
        assert!((m.get(0, 1) - 1.0).abs() < f64::EPSILON);
        assert!((m.get(0, 2) - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!((m.get(3, 2) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn row_matches_get() {
        let m = DistanceMatrix::build(&square(), 0.0);
        let row = m.row(1);
        assert_eq!(row.len(), 4);
        for (j, d) in row.iter().enumerate() {
            assert_eq!(d.to_bits(), m.get(1, j).to_bits());
        }
    }

    #[test]
    fn empty_matrix() {
        let m = DistanceMatrix::build(&[], 0.02);
        assert!(m.is_empty());
        assert_eq!(m.len(), 0);
    }
}
