//! Stderr logging for the CLI.
//!
//! Stdout carries the route JSON, so every log line goes to stderr with
//! styling disabled. `--log-level` sets the baseline filter; the
//! `MALLROUTE_LOG` environment variable, when set, refines it with the
//! usual `env_logger` directive syntax (for example
//! `MALLROUTE_LOG=mallroute_optimizer::refine=trace`).

use std::io::Write;

use clap::ValueEnum;
use env_logger::{Builder, Env, Target, WriteStyle};
use log::{LevelFilter, Record, SetLoggerError};

/// Environment variable holding extra filter directives.
pub const FILTER_ENV: &str = "MALLROUTE_LOG";

/// Minimum level written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
            LogLevel::Off => Self::Off,
        }
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// `WARN  message`
    Compact,
    /// `WARN  optimizer::refine: message`
    Pretty,
}

/// Install the global logger.
pub fn init_logger(
    level: LogLevel,
    format: LogFormat,
    timestamp: bool,
) -> Result<(), SetLoggerError> {
    Builder::new()
        .filter_level(level.into())
        .parse_env(Env::new().filter(FILTER_ENV))
        .write_style(WriteStyle::Never)
        .target(Target::Stderr)
        .format(move |buf, record| {
            if timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            writeln!(buf, "{}", render(format, record))
        })
        .try_init()
}

/// Format one record without the timestamp.
fn render(format: LogFormat, record: &Record<'_>) -> String {
    match format {
        LogFormat::Compact => format!("{:<5} {}", record.level(), record.args()),
        LogFormat::Pretty => format!(
            "{:<5} {}: {}",
            record.level(),
            short_target(record.target()),
            record.args()
        ),
    }
}

/// Drop the shared `mallroute_` crate prefix from a log target.
fn short_target(target: &str) -> &str {
    target.strip_prefix("mallroute_").unwrap_or(target)
}
