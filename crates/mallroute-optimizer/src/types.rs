//! Shared types for the mallroute optimizer.

use serde::{Deserialize, Deserializer, Serialize};

/// A 2D point in normalized map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position as a fraction of the map width.
    pub x: f64,
    /// Vertical position as a fraction of the map height.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    // Plain multiply-add so results do not depend on FMA availability.
    #[allow(clippy::suboptimal_flops)]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A named stop on the map, optionally tagged with a floor.
///
/// The `id` also deserializes from `unit`, the field name used by mall
/// directory exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Identifier, unique within one optimization call.
    #[serde(alias = "unit")]
    pub id: String,
    /// Horizontal position, normalized to the map width.
    pub x: f64,
    /// Vertical position, normalized to the map height.
    pub y: f64,
    /// Floor index. Negative floors are basements. Missing or `null`
    /// means the ground floor.
    #[serde(default, deserialize_with = "floor_or_ground")]
    pub floor: i32,
}

fn floor_or_ground<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(0))
}

/// Number of distinct values in `floors`.
pub(crate) fn distinct_floors(floors: impl Iterator<Item = i32>) -> usize {
    let mut floors: Vec<i32> = floors.collect();
    floors.sort_unstable();
    floors.dedup();
    floors.len()
}

impl Waypoint {
    /// Create a waypoint on floor 0.
    #[must_use]
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            floor: 0,
        }
    }

    /// Returns this waypoint moved to `floor`.
    #[must_use]
    pub fn on_floor(mut self, floor: i32) -> Self {
        self.floor = floor;
        self
    }

    /// The waypoint's position as a [`Point`].
    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Configuration for a single optimization call.
///
/// Missing fields take their defaults when deserialized, so `{}` is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Flat cost added per floor of difference between two waypoints.
    ///
    /// Biases the tour toward finishing one floor before moving to the
    /// next. Must be finite and non-negative.
    pub floor_penalty_weight: f64,

    /// Whether the tour closes back onto the first waypoint.
    ///
    /// The closing edge is counted in the length but never appears in
    /// the returned order.
    pub return_to_start: bool,

    /// Upper bound on 2-opt passes. `None` runs until a pass finds no
    /// improving move.
    pub max_passes: Option<usize>,
}

impl OptimizerConfig {
    /// Default floor penalty weight.
    pub const DEFAULT_FLOOR_PENALTY_WEIGHT: f64 = 0.02;

    /// Default for [`return_to_start`](Self::return_to_start).
    pub const DEFAULT_RETURN_TO_START: bool = false;

    /// Check the configuration for values the optimizer cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidConfig`] if the floor penalty weight is
    /// negative, NaN, or infinite.
    pub fn validate(&self) -> Result<(), RouteError> {
        if !self.floor_penalty_weight.is_finite() {
            return Err(RouteError::InvalidConfig(format!(
                "floor_penalty_weight must be finite, got {}",
                self.floor_penalty_weight
            )));
        }
        if self.floor_penalty_weight < 0.0 {
            return Err(RouteError::InvalidConfig(format!(
                "floor_penalty_weight must be >= 0, got {}",
                self.floor_penalty_weight
            )));
        }
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            floor_penalty_weight: Self::DEFAULT_FLOOR_PENALTY_WEIGHT,
            return_to_start: Self::DEFAULT_RETURN_TO_START,
            max_passes: None,
        }
    }
}

/// Result of an optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Indices into the input waypoints in visiting order. Always a
    /// permutation starting at 0 for non-empty input.
    pub order: Vec<usize>,
    /// Total tour length under the distance metric, including the closing
    /// edge when the tour returns to its start.
    pub length: f64,
}

impl Solution {
    /// The solution for a single waypoint: stay put.
    #[must_use]
    pub fn single() -> Self {
        Self {
            order: vec![0],
            length: 0.0,
        }
    }

    /// Number of stops in the tour.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the tour visits nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Errors that can occur while validating input or planning a route.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// No waypoints were supplied.
    #[error("no waypoints to route")]
    EmptyInput,

    /// A waypoint has an empty or whitespace-only id.
    #[error("waypoint at index {index} has an empty id")]
    EmptyId {
        /// Position of the offending waypoint in the input.
        index: usize,
    },

    /// Two waypoints share an id.
    #[error("duplicate waypoint id {id:?} at indices {first} and {second}")]
    DuplicateId {
        /// The repeated id.
        id: String,
        /// Index of the first occurrence.
        first: usize,
        /// Index of the repeat.
        second: usize,
    },

    /// A waypoint coordinate is NaN or infinite.
    #[error("waypoint {id:?} has non-finite coordinates ({x}, {y})")]
    NonFiniteCoordinate {
        /// Id of the offending waypoint.
        id: String,
        /// Its x coordinate.
        x: f64,
        /// Its y coordinate.
        y: f64,
    },

    /// Optimizer configuration is invalid.
    #[error("invalid optimizer configuration: {0}")]
    InvalidConfig(String),

    /// Requested ids were not found in the directory.
    #[error("units not found: {}", .0.join(", "))]
    UnknownWaypoints(Vec<String>),
}
