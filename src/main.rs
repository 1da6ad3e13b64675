// LogRecon - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (platform default or --config)
// 3. Logging initialisation (debug mode support)
// 4. One comparison run, report on stdout, optional exports
// 5. Exit status

use clap::Parser;
use logrecon::app::compare::{self, CompareSettings};
use logrecon::core::model::{BlockFlush, Delimiter, ExtractionMode};
use logrecon::core::report::{self, Labels};
use logrecon::platform::config::{self, AppConfig, PlatformPaths};
use logrecon::util::constants;
use logrecon::util::error::{ConfigError, LogReconError, Result};
use logrecon::util::logging;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// LogRecon - reconcile two chess-engine debug logs.
///
/// Extracts the lines selected by MODE from both logs and reports entries
/// found in only one of them, or whose counts/values disagree.
#[derive(Parser, Debug)]
#[command(name = "logrecon", version, about)]
struct Cli {
    /// First log (left side of the report).
    left: PathBuf,

    /// Second log (right side of the report).
    right: PathBuf,

    /// Extraction mode: depth-lines, perft-divide, movelist-depth,
    /// node-incr-count, or node-incr-set. Falls back to [compare] mode in
    /// config.toml; there is no built-in default.
    mode: Option<ExtractionMode>,

    /// Name shown for the left log in the report.
    #[arg(long = "left-label", value_name = "NAME")]
    left_label: Option<String>,

    /// Name shown for the right log in the report.
    #[arg(long = "right-label", value_name = "NAME")]
    right_label: Option<String>,

    /// Key/value delimiter for the left log (colon, whitespace, auto).
    #[arg(long = "left-delimiter", value_name = "DELIM")]
    left_delimiter: Option<Delimiter>,

    /// Key/value delimiter for the right log (colon, whitespace, auto).
    #[arg(long = "right-delimiter", value_name = "DELIM")]
    right_delimiter: Option<Delimiter>,

    /// Drop the final movelist block when no header follows it.
    #[arg(long = "drop-last-block")]
    drop_last_block: bool,

    /// Drop lines matching this regex before extraction (repeatable).
    #[arg(long = "ignore", value_name = "REGEX")]
    ignore: Vec<String>,

    /// Also write the report as JSON to this path.
    #[arg(long = "json", value_name = "PATH")]
    json: Option<PathBuf>,

    /// Also write the findings as CSV to this path.
    #[arg(long = "csv", value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Exit with status 1 when any difference is found.
    #[arg(long = "fail-on-diff")]
    fail_on_diff: bool,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is loaded before logging so [logging] can configure it.
    let loaded = match cli.config {
        Some(ref path) => config::load_config(path, true),
        None => config::load_config(&PlatformPaths::resolve().config_file(), false),
    };

    let (app_config, config_warnings) = match loaded {
        Ok(pair) => pair,
        Err(e) => {
            logging::init(cli.debug, None, None);
            return fatal(&e.into());
        }
    };

    logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "LogRecon starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config validation warning");
    }

    match run(&cli, &app_config) {
        Ok(differences) if differences > 0 && (cli.fail_on_diff || app_config.fail_on_diff) => {
            ExitCode::from(constants::EXIT_DIFFERENCES)
        }
        Ok(_) => ExitCode::from(constants::EXIT_OK),
        Err(e) => fatal(&e),
    }
}

/// Run one comparison. Returns the number of differences found.
fn run(cli: &Cli, app_config: &AppConfig) -> Result<usize> {
    let settings = build_settings(cli, app_config)?;
    let outcome = compare::run_compare(&cli.left, &cli.right, &settings)?;

    {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        report::render_text(&outcome.report, &outcome.labels, &mut out)
            .and_then(|_| out.flush())
            .map_err(LogReconError::Output)?;
    }

    if let Some(ref path) = cli.json {
        compare::write_json_export(&outcome, path)?;
    }
    if let Some(ref path) = cli.csv {
        compare::write_csv_export(&outcome, path)?;
    }

    let warnings = outcome.left.warning_count() + outcome.right.warning_count();
    if warnings > 0 {
        tracing::warn!(warnings, "Some lines were skipped or overwritten; see warnings above");
    }

    Ok(outcome.report.difference_count())
}

/// Merge CLI flags over config.toml values. CLI always wins.
fn build_settings(cli: &Cli, app_config: &AppConfig) -> Result<CompareSettings> {
    let mode = cli.mode.or(app_config.mode).ok_or(ConfigError::MissingMode)?;

    let mut ignore = Vec::new();
    for pattern in app_config.ignore_patterns.iter().chain(cli.ignore.iter()) {
        ignore.push(config::compile_ignore_pattern(pattern)?);
    }

    let block_flush = if cli.drop_last_block {
        BlockFlush::DropLast
    } else {
        app_config.block_flush
    };

    Ok(CompareSettings {
        mode,
        labels: Labels {
            left: cli
                .left_label
                .clone()
                .unwrap_or_else(|| app_config.left_label.clone()),
            right: cli
                .right_label
                .clone()
                .unwrap_or_else(|| app_config.right_label.clone()),
        },
        left_delimiter: cli.left_delimiter.unwrap_or(app_config.left_delimiter),
        right_delimiter: cli.right_delimiter.unwrap_or(app_config.right_delimiter),
        block_flush,
        ignore,
        mmap_threshold: app_config.mmap_threshold,
    })
}

fn fatal(error: &LogReconError) -> ExitCode {
    tracing::error!(error = %error, "Comparison aborted");
    eprintln!("Error: {error}");
    ExitCode::from(constants::EXIT_FATAL)
}
