//! Unit directory loading.

use std::collections::HashSet;

use mallroute_optimizer::Waypoint;
use serde::Deserialize;

use crate::error::CliError;

/// Accepted directory file layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum DirectoryFile {
    List(Vec<Waypoint>),
    Wrapped { units: Vec<Waypoint> },
}

/// Parse a unit directory: either a bare JSON array of waypoints or an
/// object with a `units` array. Entries may name their id `id` or `unit`
/// and omit `floor` (ground floor).
pub fn parse_directory(text: &str) -> Result<Vec<Waypoint>, CliError> {
    let file: DirectoryFile = serde_json::from_str(text).map_err(|source| CliError::Json {
        what: "unit directory",
        source,
    })?;
    Ok(match file {
        DirectoryFile::List(units) | DirectoryFile::Wrapped { units } => units,
    })
}

/// Ids to route when `--units` is not given: every distinct directory id,
/// in order of first appearance.
pub fn all_ids(directory: &[Waypoint]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(directory.len());
    directory
        .iter()
        .filter(|w| seen.insert(w.id.as_str()))
        .map(|w| w.id.clone())
        .collect()
}
