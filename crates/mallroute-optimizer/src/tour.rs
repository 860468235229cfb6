//! Tour evaluation helpers shared by construction and refinement.

use crate::distance::DistanceMatrix;

/// Total length of visiting `order` under `matrix`.
///
/// Sums consecutive edges left to right, then adds the closing edge from
/// the last stop back to the first when `return_to_start` is set. Tours
/// with fewer than two stops have length zero.
#[must_use]
pub fn tour_length(matrix: &DistanceMatrix, order: &[usize], return_to_start: bool) -> f64 {
    let mut length = 0.0;
    for edge in order.windows(2) {
        length += matrix.get(edge[0], edge[1]);
    }
    if return_to_start
        && let (Some(&first), Some(&last)) = (order.first(), order.last())
    {
        length += matrix.get(last, first);
    }
    length
}

/// Returns `true` if `order` contains every index in `0..n` exactly once.
#[must_use]
pub fn is_permutation(order: &[usize], n: usize) -> bool {
    if order.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &index in order {
        match seen.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Waypoint;

    fn square_matrix() -> DistanceMatrix {
        DistanceMatrix::build(
            &[
                Waypoint::new("A", 0.0, 0.0),
                Waypoint::new("B", 1.0, 0.0),
                Waypoint::new("C", 1.0, 1.0),
                Waypoint::new("D", 0.0, 1.0),
            ],
            0.0,
        )
    }

    #[test]
    fn open_path_length() {
        let m = square_matrix();
        assert!((tour_length(&m, &[0, 1, 2, 3], false) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn closed_tour_adds_return_edge() {
        let m = square_matrix();
        assert!((tour_length(&m, &[0, 1, 2, 3], true) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn crossing_path_is_longer() {
        let m = square_matrix();
        let crossed = tour_length(&m, &[0, 2, 1, 3], false);
        assert!((crossed - (1.0 + 2.0 * 2.0_f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn short_tours_have_zero_length() {
        let m = square_matrix();
        assert!(tour_length(&m, &[], true).abs() < f64::EPSILON);
        assert!(tour_length(&m, &[0], true).abs() < f64::EPSILON);
    }

    #[test]
    fn permutation_checks() {
        assert!(is_permutation(&[0, 2, 1], 3));
        assert!(is_permutation(&[], 0));
        assert!(!is_permutation(&[0, 1], 3));
        assert!(!is_permutation(&[0, 1, 1], 3));
        assert!(!is_permutation(&[0, 1, 3], 3));
    }
}
