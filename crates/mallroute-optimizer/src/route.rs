//! Route planning on top of the optimizer: resolve requested unit ids
//! against a directory, solve, and map the visiting order back to ids
//! and coordinates for display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{OptimizerConfig, RouteError, Solution, Waypoint};

/// One stop along a planned route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Waypoint id.
    pub id: String,
    /// Horizontal position, normalized to the map width.
    pub x: f64,
    /// Vertical position, normalized to the map height.
    pub y: f64,
    /// Floor index.
    pub floor: i32,
}

impl From<&Waypoint> for RouteStop {
    fn from(waypoint: &Waypoint) -> Self {
        Self {
            id: waypoint.id.clone(),
            x: waypoint.x,
            y: waypoint.y,
            floor: waypoint.floor,
        }
    }
}

/// A planned route ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Waypoint ids in visiting order.
    pub route: Vec<String>,
    /// Total tour length under the optimizer's metric.
    pub length: f64,
    /// Stops in visiting order, for drawing the path.
    pub path: Vec<RouteStop>,
}

impl Route {
    /// Map a solution's index order back onto `waypoints`.
    ///
    /// Indices outside `waypoints` are skipped; a [`Solution`] produced by
    /// [`crate::solve`] for the same slice never contains any.
    #[must_use]
    pub fn from_solution(waypoints: &[Waypoint], solution: &Solution) -> Self {
        let path: Vec<RouteStop> = solution
            .order
            .iter()
            .filter_map(|&i| waypoints.get(i))
            .map(RouteStop::from)
            .collect();
        let route = path.iter().map(|stop| stop.id.clone()).collect();
        Self {
            route,
            length: solution.length,
            path,
        }
    }

    /// The length rounded to two decimals, as shown to users.
    #[must_use]
    pub fn score(&self) -> f64 {
        (self.length * 100.0).round() / 100.0
    }

    /// Number of distinct floors the route touches.
    #[must_use]
    pub fn floor_count(&self) -> usize {
        crate::types::distinct_floors(self.path.iter().map(|stop| stop.floor))
    }
}

/// Split a comma-separated unit list, trimming whitespace and dropping
/// empty entries.
///
/// ```
/// use mallroute_optimizer::parse_unit_list;
///
/// assert_eq!(parse_unit_list(" 101, 102,,A-3 "), vec!["101", "102", "A-3"]);
/// ```
#[must_use]
pub fn parse_unit_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Look up each requested id in `directory`, preserving request order.
///
/// When the directory lists an id more than once, the last entry wins,
/// so appending a corrected entry overrides an older one.
///
/// # Errors
///
/// Returns [`RouteError::UnknownWaypoints`] listing every requested id
/// missing from the directory, in request order.
pub fn resolve<S: AsRef<str>>(
    directory: &[Waypoint],
    ids: &[S],
) -> Result<Vec<Waypoint>, RouteError> {
    let mut by_id: HashMap<&str, &Waypoint> = HashMap::with_capacity(directory.len());
    for waypoint in directory {
        by_id.insert(waypoint.id.as_str(), waypoint);
    }

    let mut resolved = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in ids {
        let id = id.as_ref();
        match by_id.get(id) {
            Some(waypoint) => resolved.push((*waypoint).clone()),
            None => missing.push(id.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(RouteError::UnknownWaypoints(missing))
    }
}

/// Resolve `ids` against `directory` and plan a route through them,
/// starting at the first requested id.
///
/// # Errors
///
/// Returns [`RouteError::UnknownWaypoints`] for ids missing from the
/// directory, and any error from [`crate::solve`] (for example
/// [`RouteError::EmptyInput`] when `ids` is empty or
/// [`RouteError::DuplicateId`] when an id is requested twice).
pub fn plan_route<S: AsRef<str>>(
    directory: &[Waypoint],
    ids: &[S],
    config: &OptimizerConfig,
) -> Result<Route, RouteError> {
    let waypoints = resolve(directory, ids)?;
    let solution = crate::solve(&waypoints, config)?;
    log::info!(
        "route: stops={} length={:.4}",
        solution.len(),
        solution.length
    );
    Ok(Route::from_solution(&waypoints, &solution))
}
