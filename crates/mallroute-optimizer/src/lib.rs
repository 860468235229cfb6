//! mallroute-optimizer: deterministic route optimizer (sans-IO).
//!
//! Orders a set of waypoints, possibly spread over several floors, into a
//! short tour that starts at the first waypoint:
//! distance matrix -> nearest-neighbor construction -> 2-opt refinement.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! waypoint slices and returns structured data. Identical input and
//! configuration always produce bit-identical output, so a route's length
//! can be shown to users as a stable score.

pub mod construct;
pub mod diagnostics;
pub mod distance;
mod pipeline;
pub mod refine;
pub mod route;
pub mod tour;
pub mod types;

use std::collections::HashMap;

pub use distance::{DistanceMatrix, distance};
pub use route::{Route, RouteStop, parse_unit_list, plan_route, resolve};
pub use types::{OptimizerConfig, Point, RouteError, Solution, Waypoint};

/// Tours with more waypoints than this are refined with 2-opt; smaller
/// ones keep the nearest-neighbor tour as is.
pub const REFINE_THRESHOLD: usize = 10;

/// Compute a short visiting order for `waypoints`.
///
/// The tour always starts at `waypoints[0]`. The returned
/// [`Solution::order`] indexes into `waypoints`; map it back to ids and
/// coordinates with [`Route::from_solution`].
///
/// # Steps
///
/// 1. Validate waypoints and configuration
/// 2. Build the floor-penalized distance matrix
/// 3. Nearest-neighbor construction
/// 4. 2-opt refinement (only above [`REFINE_THRESHOLD`] waypoints)
///
/// # Errors
///
/// Returns [`RouteError::EmptyInput`] if `waypoints` is empty.
/// Returns [`RouteError::EmptyId`], [`RouteError::DuplicateId`], or
/// [`RouteError::NonFiniteCoordinate`] for malformed waypoints.
/// Returns [`RouteError::InvalidConfig`] for an unusable configuration.
pub fn solve(waypoints: &[Waypoint], config: &OptimizerConfig) -> Result<Solution, RouteError> {
    pipeline::run(waypoints, config, &pipeline::NoClock).map(|(solution, _)| solution)
}

/// Check that `waypoints` is non-empty with unique, non-empty ids and
/// finite coordinates.
///
/// # Errors
///
/// Returns the first problem found, scanning in input order.
pub fn validate_waypoints(waypoints: &[Waypoint]) -> Result<(), RouteError> {
    if waypoints.is_empty() {
        return Err(RouteError::EmptyInput);
    }

    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(waypoints.len());
    for (index, waypoint) in waypoints.iter().enumerate() {
        if waypoint.id.trim().is_empty() {
            return Err(RouteError::EmptyId { index });
        }
        if !waypoint.point().is_finite() {
            return Err(RouteError::NonFiniteCoordinate {
                id: waypoint.id.clone(),
                x: waypoint.x,
                y: waypoint.y,
            });
        }
        if let Some(&first) = seen.get(waypoint.id.as_str()) {
            return Err(RouteError::DuplicateId {
                id: waypoint.id.clone(),
                first,
                second: index,
            });
        }
        seen.insert(waypoint.id.as_str(), index);
    }

    Ok(())
}
