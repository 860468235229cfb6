//! Tour construction: nearest-neighbor greedy heuristic.
//!
//! Starting from the first waypoint, repeatedly walk to the closest
//! waypoint not yet visited. The scan runs in ascending index order with
//! a strict `<` comparison, so ties always go to the lowest index and the
//! result is fully deterministic.

use crate::distance::DistanceMatrix;
use crate::types::Solution;

/// Build an initial tour with the nearest-neighbor heuristic.
///
/// The tour always starts at index 0. When `return_to_start` is set, the
/// closing edge back to index 0 is added to the length but not to the
/// order. An empty matrix yields an empty tour of length zero.
#[must_use = "returns the constructed tour"]
pub fn nearest_neighbor(matrix: &DistanceMatrix, return_to_start: bool) -> Solution {
    let n = matrix.len();
    if n == 0 {
        return Solution {
            order: Vec::new(),
            length: 0.0,
        };
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut length = 0.0;

    visited[0] = true;
    order.push(0);
    let mut current = 0;

    for _ in 1..n {
        let mut nearest: Option<usize> = None;
        let mut nearest_dist = f64::INFINITY;

        for (j, &d) in matrix.row(current).iter().enumerate() {
            if visited[j] {
                continue;
            }
            // An overflowed (infinite) distance never beats INFINITY, so
            // fall back to the first unvisited index to keep a permutation.
            if nearest.is_none() || d < nearest_dist {
                nearest = Some(j);
                nearest_dist = d;
            }
        }

        // At least one index is unvisited on every iteration.
        let Some(next) = nearest else {
            break;
        };

        visited[next] = true;
        order.push(next);
        length += nearest_dist;
        current = next;
    }

    if return_to_start {
        length += matrix.get(current, 0);
    }

    Solution { order, length }
}
