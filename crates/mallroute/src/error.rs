use std::io;
use std::path::PathBuf;

use mallroute_optimizer::RouteError;

/// Failures surfaced by the `mallroute` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading or writing a file failed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being attempted ("reading", "writing").
        action: &'static str,
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// Writing to stdout failed.
    #[error("writing output: {0}")]
    Stdout(#[from] io::Error),

    /// The directory file or `--config-json` is not valid JSON for the
    /// expected shape.
    #[error("parsing {what}: {source}")]
    Json {
        /// Which input failed to parse.
        what: &'static str,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// Route serialization failed.
    #[error("serializing route: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The optimizer rejected the input.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// Logger setup failed.
    #[error("initializing logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl CliError {
    pub fn reading(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action: "reading",
            path: path.into(),
            source,
        }
    }

    pub fn writing(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action: "writing",
            path: path.into(),
            source,
        }
    }
}
