//! Solve diagnostics: timing and counts for each optimizer phase.
//!
//! [`solve_with_diagnostics`] runs the same phases as [`crate::solve`]
//! and records how long each took and what it produced. Timing goes
//! through the caller-supplied [`Clock`] so this crate stays free of
//! platform time sources.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{OptimizerConfig, RouteError, Solution, Waypoint};

/// Monotonic time source used to measure phase durations.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single solve.
///
/// `refinement` is `None` when the tour was at or below
/// [`REFINE_THRESHOLD`](crate::REFINE_THRESHOLD) and 2-opt was skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveDiagnostics {
    /// Phase 1: distance matrix construction.
    pub matrix: PhaseDiagnostics,
    /// Phase 2: nearest-neighbor construction.
    pub construction: PhaseDiagnostics,
    /// Phase 3: 2-opt refinement.
    pub refinement: Option<PhaseDiagnostics>,
    /// Total wall-clock duration of the solve (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary across all phases.
    pub summary: SolveSummary,
}

/// Diagnostics for a single phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseDiagnostics {
    /// Wall-clock duration of this phase (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Phase-specific metrics.
    pub metrics: PhaseMetrics,
}

/// Phase-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PhaseMetrics {
    /// Distance matrix metrics.
    DistanceMatrix {
        /// Number of waypoints.
        size: usize,
        /// Floor penalty weight in effect.
        floor_penalty_weight: f64,
        /// Number of distinct floors among the waypoints.
        floor_count: usize,
    },
    /// Nearest-neighbor construction metrics.
    Construction {
        /// Length of the constructed tour.
        length: f64,
        /// Whether the closing edge is counted.
        return_to_start: bool,
    },
    /// 2-opt refinement metrics.
    Refinement {
        /// Passes performed, including the final non-improving one.
        passes: usize,
        /// Accepted improving moves.
        improvements: usize,
        /// Tour length before refinement.
        length_before: f64,
        /// Tour length after refinement.
        length_after: f64,
        /// `false` if the pass cap stopped the search early.
        converged: bool,
    },
}

/// High-level summary for the whole solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveSummary {
    /// Number of waypoints.
    pub waypoint_count: usize,
    /// Number of distinct floors.
    pub floor_count: usize,
    /// Length of the nearest-neighbor tour.
    pub construction_length: f64,
    /// Length of the returned tour.
    pub final_length: f64,
    /// Percentage by which refinement shortened the constructed tour.
    pub improvement_pct: f64,
}

/// Run [`crate::solve`] while collecting per-phase diagnostics.
///
/// The returned [`Solution`] is identical to what [`crate::solve`]
/// returns for the same input.
///
/// # Errors
///
/// Same as [`crate::solve`].
pub fn solve_with_diagnostics<C: Clock>(
    waypoints: &[Waypoint],
    config: &OptimizerConfig,
    clock: &C,
) -> Result<(Solution, SolveDiagnostics), RouteError> {
    crate::pipeline::run(waypoints, config, clock)
}

impl SolveDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Solve Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Waypoints: {} on {} floor(s)",
            self.summary.waypoint_count, self.summary.floor_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Phase", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);

        let mut phases = vec![
            ("Distance Matrix", &self.matrix),
            ("Nearest Neighbor", &self.construction),
        ];
        if let Some(ref refinement) = self.refinement {
            phases.push(("2-opt", refinement));
        }

        for (name, diag) in &phases {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Length: {:.4} -> {:.4} ({:.2}% shorter)",
            self.summary.construction_length,
            self.summary.final_length,
            self.summary.improvement_pct,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format phase metrics into a compact detail string.
fn format_metrics(metrics: &PhaseMetrics) -> String {
    match metrics {
        PhaseMetrics::DistanceMatrix {
            size,
            floor_penalty_weight,
            floor_count,
        } => format!("{size}x{size} floors={floor_count} penalty={floor_penalty_weight:.3}"),
        PhaseMetrics::Construction {
            length,
            return_to_start,
        } => {
            let shape = if *return_to_start { "closed" } else { "open" };
            format!("{shape} length={length:.4}")
        }
        PhaseMetrics::Refinement {
            passes,
            improvements,
            length_before,
            length_after,
            converged,
        } => {
            let status = if *converged { "" } else { " (pass cap hit)" };
            format!(
                "{passes} passes, {improvements} moves, {length_before:.4}->{length_after:.4}{status}",
            )
        }
    }
}
