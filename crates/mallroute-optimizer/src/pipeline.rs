//! The solve pipeline behind [`crate::solve`] and
//! [`crate::diagnostics::solve_with_diagnostics`]:
//! validate -> distance matrix -> nearest neighbor -> 2-opt.

use std::time::Duration;

use crate::construct::nearest_neighbor;
use crate::diagnostics::{Clock, PhaseDiagnostics, PhaseMetrics, SolveDiagnostics, SolveSummary};
use crate::distance::DistanceMatrix;
use crate::refine::two_opt;
use crate::types::{OptimizerConfig, RouteError, Solution, Waypoint, distinct_floors};

/// [`Clock`] for callers that only want the solution.
pub struct NoClock;

impl Clock for NoClock {
    type Instant = ();

    fn now(&self) -> Self::Instant {}

    fn elapsed(&self, _since: &Self::Instant) -> Duration {
        Duration::ZERO
    }
}

/// Run every phase, timing each with `clock`.
pub fn run<C: Clock>(
    waypoints: &[Waypoint],
    config: &OptimizerConfig,
    clock: &C,
) -> Result<(Solution, SolveDiagnostics), RouteError> {
    let start = clock.now();

    crate::validate_waypoints(waypoints)?;
    config.validate()?;

    let n = waypoints.len();
    let floor_count = distinct_floors(waypoints.iter().map(|w| w.floor));

    if n == 1 {
        log::debug!("solve: single waypoint, nothing to order");
        let solution = Solution::single();
        let diagnostics = SolveDiagnostics {
            matrix: PhaseDiagnostics {
                duration: Duration::ZERO,
                metrics: matrix_metrics(n, config, floor_count),
            },
            construction: PhaseDiagnostics {
                duration: Duration::ZERO,
                metrics: PhaseMetrics::Construction {
                    length: solution.length,
                    return_to_start: config.return_to_start,
                },
            },
            refinement: None,
            total_duration: clock.elapsed(&start),
            summary: summary(n, floor_count, solution.length, solution.length),
        };
        return Ok((solution, diagnostics));
    }

    let phase_start = clock.now();
    let matrix = DistanceMatrix::build(waypoints, config.floor_penalty_weight);
    let matrix_diag = PhaseDiagnostics {
        duration: clock.elapsed(&phase_start),
        metrics: matrix_metrics(n, config, floor_count),
    };
    log::debug!(
        "matrix: n={n} floors={floor_count} floor_penalty_weight={}",
        config.floor_penalty_weight
    );

    let phase_start = clock.now();
    let constructed = nearest_neighbor(&matrix, config.return_to_start);
    let construction_length = constructed.length;
    let construction_diag = PhaseDiagnostics {
        duration: clock.elapsed(&phase_start),
        metrics: PhaseMetrics::Construction {
            length: construction_length,
            return_to_start: config.return_to_start,
        },
    };
    log::debug!("construct: length={construction_length:.6}");

    let (solution, refinement_diag) = if n > crate::REFINE_THRESHOLD {
        let phase_start = clock.now();
        let refined = two_opt(
            &matrix,
            constructed.order,
            config.return_to_start,
            config.max_passes,
        );
        let diag = PhaseDiagnostics {
            duration: clock.elapsed(&phase_start),
            metrics: PhaseMetrics::Refinement {
                passes: refined.passes,
                improvements: refined.improvements,
                length_before: refined.initial_length,
                length_after: refined.solution.length,
                converged: refined.converged,
            },
        };
        (refined.solution, Some(diag))
    } else {
        log::debug!("refine: skipped, n={n} is at most {}", crate::REFINE_THRESHOLD);
        (constructed, None)
    };

    debug_assert!(crate::tour::is_permutation(&solution.order, n));

    let diagnostics = SolveDiagnostics {
        matrix: matrix_diag,
        construction: construction_diag,
        refinement: refinement_diag,
        total_duration: clock.elapsed(&start),
        summary: summary(n, floor_count, construction_length, solution.length),
    };

    Ok((solution, diagnostics))
}

const fn matrix_metrics(n: usize, config: &OptimizerConfig, floor_count: usize) -> PhaseMetrics {
    PhaseMetrics::DistanceMatrix {
        size: n,
        floor_penalty_weight: config.floor_penalty_weight,
        floor_count,
    }
}

fn summary(
    waypoint_count: usize,
    floor_count: usize,
    construction_length: f64,
    final_length: f64,
) -> SolveSummary {
    let improvement_pct = if construction_length > 0.0 {
        (1.0 - final_length / construction_length) * 100.0
    } else {
        0.0
    };
    SolveSummary {
        waypoint_count,
        floor_count,
        construction_length,
        final_length,
        improvement_pct,
    }
}
