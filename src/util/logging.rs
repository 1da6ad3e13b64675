// LogRecon - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// Output: stderr by default, or appended to the configured log file.
// Never stdout: stdout carries the diff report.

use std::fs::{File, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem.
///
/// `debug_flag` is true when the user passed --debug on the CLI.
/// `config_level` is the level from config.toml (if present).
/// `log_file` is the optional log file path from config.toml.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
pub fn init(debug_flag: bool, config_level: Option<&str>, log_file: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact();

    // The open error can only be reported once a subscriber exists.
    let mut open_failure: Option<(String, std::io::Error)> = None;

    let file = match log_file {
        Some(path) => match open_log_file(path) {
            Ok(f) => Some(f),
            Err(e) => {
                open_failure = Some((path.to_string(), e));
                None
            }
        },
        None => None,
    };

    match file {
        Some(f) => builder.with_ansi(false).with_writer(Mutex::new(f)).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }

    if let Some((path, error)) = open_failure {
        tracing::warn!(
            path = %path,
            error = %error,
            "Could not open log file; logging to stderr instead"
        );
    }

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        "Logging initialised"
    );
}

/// Open the log file in append mode, creating it if needed.
fn open_log_file(path: &str) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Shorten a log line for inclusion in diagnostics.
pub fn preview(line: &str) -> &str {
    let max = super::constants::DEBUG_MAX_LINE_PREVIEW;
    if line.len() <= max {
        return line;
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_keeps_short_lines() {
        assert_eq!(preview("depth 1: e4"), "depth 1: e4");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(300);
        let p = preview(&long);
        assert!(p.len() <= crate::util::constants::DEBUG_MAX_LINE_PREVIEW);
        assert!(p.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_open_log_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logrecon.log");
        let path_str = path.to_str().unwrap();

        {
            use std::io::Write;
            let mut f = open_log_file(path_str).unwrap();
            writeln!(f, "first").unwrap();
        }
        {
            use std::io::Write;
            let mut f = open_log_file(path_str).unwrap();
            writeln!(f, "second").unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }
}
