//! mallroute: plan a walking route through mall directory units.
//!
//! Loads a unit directory (JSON), resolves the requested units, orders
//! them with the floor-aware optimizer, and writes the route as JSON.
//! Optionally renders an SVG overlay for the mall map and prints
//! per-phase solver diagnostics.
//!
//! # Usage
//!
//! ```text
//! mallroute [OPTIONS] <DIRECTORY>
//! mallroute units.json --units "101, 204, 118" --svg route.svg
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod error;
mod input;
mod logging;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use mallroute_export::{Dimensions, SvgMetadata};
use mallroute_optimizer::diagnostics::{Clock, SolveDiagnostics, solve_with_diagnostics};
use mallroute_optimizer::{OptimizerConfig, Route, parse_unit_list, resolve};

use crate::error::CliError;
use crate::logging::{LogFormat, LogLevel};

/// Plan a short walking route through mall directory units.
///
/// The route starts at the first requested unit and visits every other
/// one once, preferring to finish a floor before changing levels.
#[derive(Parser)]
#[command(name = "mallroute", version)]
struct Cli {
    /// Unit directory: a JSON array of `{id, x, y, floor}` entries or an
    /// object with a `units` array.
    directory: PathBuf,

    /// Comma-separated unit ids to visit, starting unit first.
    ///
    /// Defaults to every distinct unit in the directory, in file order.
    #[arg(long)]
    units: Option<String>,

    /// Extra cost per floor changed between consecutive stops.
    #[arg(long, default_value_t = OptimizerConfig::DEFAULT_FLOOR_PENALTY_WEIGHT)]
    floor_penalty: f64,

    /// Count the walk back to the starting unit in the route length.
    #[arg(long)]
    return_to_start: bool,

    /// Stop 2-opt refinement after this many passes.
    #[arg(long)]
    max_passes: Option<usize>,

    /// Full optimizer config as a JSON string.
    ///
    /// When provided, `--floor-penalty`, `--return-to-start`, and
    /// `--max-passes` are ignored.
    #[arg(long)]
    config_json: Option<String>,

    /// Write route JSON to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Write an SVG route overlay to this file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Map image width in pixels, for the SVG overlay.
    #[arg(long, default_value_t = Dimensions::FALLBACK.width, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    width: u32,

    /// Map image height in pixels, for the SVG overlay.
    #[arg(long, default_value_t = Dimensions::FALLBACK.height, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    height: u32,

    /// Number of solver runs, for timing.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Print per-phase solver diagnostics to stderr.
    #[arg(long)]
    diagnostics: bool,

    /// Minimum log level. `MALLROUTE_LOG` adds per-module directives.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Log line layout.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Prefix log lines with a millisecond timestamp.
    #[arg(long)]
    log_timestamp: bool,
}

impl Cli {
    const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Build an [`OptimizerConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual optimizer flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<OptimizerConfig, CliError> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|source| CliError::Json {
            what: "--config-json",
            source,
        })?
    } else {
        OptimizerConfig {
            floor_penalty_weight: cli.floor_penalty,
            return_to_start: cli.return_to_start,
            max_passes: cli.max_passes,
        }
    };
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logger(cli.log_level, cli.log_format, cli.log_timestamp) {
        eprintln!("{}", CliError::from(e));
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = config_from_cli(cli)?;

    let text = std::fs::read_to_string(&cli.directory)
        .map_err(|e| CliError::reading(&cli.directory, e))?;
    let directory = input::parse_directory(&text)?;
    let ids = cli
        .units
        .as_deref()
        .map_or_else(|| input::all_ids(&directory), parse_unit_list);
    let waypoints = resolve(&directory, &ids)?;
    log::info!(
        "directory: {} units, routing {}",
        directory.len(),
        waypoints.len()
    );

    let (solution, first) = solve_with_diagnostics(&waypoints, &config, &StdClock)?;
    let mut all_diagnostics = Vec::with_capacity(cli.runs);
    all_diagnostics.push(first);
    for _ in 1..cli.runs {
        let (_, diagnostics) = solve_with_diagnostics(&waypoints, &config, &StdClock)?;
        all_diagnostics.push(diagnostics);
    }

    if cli.diagnostics {
        for (run, diagnostics) in all_diagnostics.iter().enumerate() {
            if cli.runs > 1 {
                eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
            }
            eprintln!("{}", diagnostics.report());
            eprintln!();
        }
        if cli.runs > 1 {
            print_multi_run_summary(&all_diagnostics);
        }
    }

    let route = Route::from_solution(&waypoints, &solution);
    let json = serde_json::to_string_pretty(&route)?;
    match cli.output {
        Some(ref path) => {
            std::fs::write(path, format!("{json}\n")).map_err(|e| CliError::writing(path, e))?;
            eprintln!("Route written to {}", path.display());
        }
        None => writeln!(std::io::stdout().lock(), "{json}")?,
    }

    if let Some(ref svg_path) = cli.svg {
        let title = cli
            .directory
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mallroute");
        let description = format!(
            "{} stops, length score {:.2}",
            route.route.len(),
            route.score()
        );
        let config_json = serde_json::to_string(&config)?;
        let metadata = SvgMetadata {
            title: Some(title),
            description: Some(&description),
            config_json: Some(&config_json),
        };
        let svg = mallroute_export::to_svg(&route, cli.dimensions(), &metadata);
        std::fs::write(svg_path, &svg).map_err(|e| CliError::writing(svg_path, e))?;
        eprintln!(
            "SVG written to {} ({} bytes)",
            svg_path.display(),
            svg.len()
        );
    }

    eprintln!(
        "Route: {} stops on {} floor(s), length score {:.2}",
        route.route.len(),
        route.floor_count(),
        route.score()
    );

    Ok(())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Function pointer type for extracting a phase duration from diagnostics.
type PhaseExtractor = fn(&SolveDiagnostics) -> Option<Duration>;

/// Print aggregated timing across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[SolveDiagnostics]) {
    eprintln!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    if durations.is_empty() {
        return;
    }

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    eprintln!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");
    eprintln!();
    eprintln!("{:<24} {:>12}", "Phase", "Mean (ms)");
    eprintln!("{}", "-".repeat(40));

    let phase_extractors: &[(&str, PhaseExtractor)] = &[
        ("Distance Matrix", |d| Some(d.matrix.duration)),
        ("Nearest Neighbor", |d| Some(d.construction.duration)),
        ("2-opt", |d| d.refinement.as_ref().map(|p| p.duration)),
    ];

    for (name, extractor) in phase_extractors {
        let phase_durations: Vec<f64> = all_diagnostics
            .iter()
            .filter_map(extractor)
            .map(|dur| dur.as_secs_f64() * 1000.0)
            .collect();

        if phase_durations.is_empty() {
            continue;
        }

        let phase_mean = phase_durations.iter().sum::<f64>() / phase_durations.len() as f64;
        eprintln!("{name:<24} {phase_mean:>10.3}ms");
    }
}
