//! Tour refinement: first-improvement 2-opt local search.
//!
//! A 2-opt move reverses a contiguous segment `order[i..=j]`, replacing the
//! edges `(i-1, i)` and `(j, j+1)` with `(i-1, j)` and `(i, j+1)`. Passes
//! scan `i` ascending from 1 (the start never moves) and `j` ascending
//! from `i + 1`. An improving move is kept immediately and the scan
//! continues from the next `(i, j)` pair, so the result depends on scan
//! order but is fully deterministic.
//!
//! Every candidate is re-evaluated with [`tour_length`] rather than an
//! edge delta. This is O(n) per candidate but keeps accept/reject
//! decisions bit-identical to a straightforward full-length comparison.

use crate::distance::DistanceMatrix;
use crate::tour::tour_length;
use crate::types::Solution;

/// Outcome of a 2-opt refinement run.
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    /// The refined tour.
    pub solution: Solution,
    /// Length of the tour before refinement.
    pub initial_length: f64,
    /// Number of passes performed, including the final non-improving one.
    pub passes: usize,
    /// Number of accepted improving moves.
    pub improvements: usize,
    /// `false` if the pass cap stopped the search while moves were still
    /// being found.
    pub converged: bool,
}

/// Improve `order` with 2-opt until no move helps or `max_passes` is hit.
///
/// The returned order is a permutation of the input with the same first
/// element, and its length never exceeds the input's.
#[must_use = "returns the refined tour"]
pub fn two_opt(
    matrix: &DistanceMatrix,
    order: Vec<usize>,
    return_to_start: bool,
    max_passes: Option<usize>,
) -> Refinement {
    let n = order.len();
    let mut best_order = order;
    let mut best_length = tour_length(matrix, &best_order, return_to_start);
    let initial_length = best_length;

    let mut passes = 0;
    let mut improvements = 0;
    let mut converged = true;

    loop {
        if max_passes.is_some_and(|cap| passes >= cap) {
            converged = false;
            log::warn!(
                "refine: stopped after {passes} passes without converging length={best_length:.6}"
            );
            break;
        }

        passes += 1;
        let mut improved = false;

        for i in 1..n.saturating_sub(1) {
            for j in (i + 1)..n {
                best_order[i..=j].reverse();
                let candidate = tour_length(matrix, &best_order, return_to_start);

                if candidate < best_length {
                    log::trace!("refine: reverse [{i}..={j}] length {best_length:.6} -> {candidate:.6}");
                    best_length = candidate;
                    improvements += 1;
                    improved = true;
                } else {
                    best_order[i..=j].reverse();
                }
            }
        }

        if !improved {
            break;
        }
    }

    log::debug!(
        "refine: n={n} passes={passes} improvements={improvements} length {initial_length:.6} -> {best_length:.6}"
    );

    Refinement {
        solution: Solution {
            order: best_order,
            length: best_length,
        },
        initial_length,
        passes,
        improvements,
        converged,
    }
}
