// LogRecon - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
// Non-fatal findings (malformed lines, duplicate keys) are modelled as
// warnings and never abort a run.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogRecon operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogReconError {
    /// A source log could not be located, read, or decoded.
    Source(SourceError),

    /// The two collections could not be reconciled.
    Reconcile(ReconcileError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Writing the report to standard output failed.
    Output(io::Error),
}

impl fmt::Display for LogReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "Source error: {e}"),
            Self::Reconcile(e) => write!(f, "Reconcile error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Output(e) => write!(f, "Failed to write report: {e}"),
        }
    }
}

impl std::error::Error for LogReconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Reconcile(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Output(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Source errors
// ---------------------------------------------------------------------------

/// Fatal errors raised while loading a source log file.
#[derive(Debug)]
pub enum SourceError {
    /// The file does not exist.
    NotFound { path: PathBuf },

    /// The file exists but could not be opened or read.
    Unreadable { path: PathBuf, source: io::Error },

    /// The file content is not valid UTF-8.
    InvalidEncoding {
        path: PathBuf,
        source: std::str::Utf8Error,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "Log file '{}' does not exist", path.display())
            }
            Self::Unreadable { path, source } => {
                write!(f, "Cannot read log file '{}': {source}", path.display())
            }
            Self::InvalidEncoding { path, source } => {
                write!(f, "'{}': invalid UTF-8 encoding: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreadable { source, .. } => Some(source),
            Self::InvalidEncoding { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<SourceError> for LogReconError {
    fn from(e: SourceError) -> Self {
        Self::Source(e)
    }
}

// ---------------------------------------------------------------------------
// Extraction warnings
// ---------------------------------------------------------------------------

/// Non-fatal problems found while building a collection.
///
/// The offending line is skipped (or, for duplicates, the latest value kept)
/// and extraction continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractWarning {
    /// The expected key/value delimiter was absent from a matching line.
    MalformedLine {
        file: PathBuf,
        line_number: u64,
        line: String,
        delimiter: &'static str,
    },

    /// A key appeared more than once; the latest value replaces the previous.
    DuplicateKey {
        file: PathBuf,
        line_number: u64,
        key: String,
        previous: String,
        latest: String,
    },
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine {
                file,
                line_number,
                line,
                delimiter,
            } => write!(
                f,
                "'{}' line {line_number}: no {delimiter} delimiter in '{line}', skipped",
                file.display()
            ),
            Self::DuplicateKey {
                file,
                line_number,
                key,
                previous,
                latest,
            } => write!(
                f,
                "'{}' line {line_number}: duplicate key '{key}' \
                 (previous '{previous}', keeping '{latest}')",
                file.display()
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Reconcile errors
// ---------------------------------------------------------------------------

/// Errors related to comparing two collections.
#[derive(Debug)]
pub enum ReconcileError {
    /// The collections were built as different kinds and cannot be compared.
    KindMismatch {
        left: &'static str,
        right: &'static str,
    },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch { left, right } => write!(
                f,
                "Cannot reconcile a {left} collection against a {right} collection"
            ),
        }
    }
}

impl std::error::Error for ReconcileError {}

impl From<ReconcileError> for LogReconError {
    fn from(e: ReconcileError) -> Self {
        Self::Reconcile(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LogReconError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration and command-line values.
#[derive(Debug)]
pub enum ConfigError {
    /// No extraction mode was given on the command line or in config.toml.
    MissingMode,

    /// An extraction mode name was not recognised.
    UnknownMode { value: String },

    /// A delimiter name was not recognised.
    UnknownDelimiter { value: String },

    /// An ignore pattern is not a valid regex.
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    /// An ignore pattern exceeds the maximum allowed length.
    RegexTooLong { length: usize, max_length: usize },

    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMode => write!(
                f,
                "No extraction mode given. Pass one of depth-lines, perft-divide, \
                 movelist-depth, node-incr-count, node-incr-set, or set [compare] mode \
                 in config.toml"
            ),
            Self::UnknownMode { value } => write!(
                f,
                "Unknown extraction mode '{value}'. Expected one of: depth-lines, \
                 perft-divide, movelist-depth, node-incr-count, node-incr-set"
            ),
            Self::UnknownDelimiter { value } => write!(
                f,
                "Unknown delimiter '{value}'. Expected one of: colon, whitespace, auto"
            ),
            Self::InvalidRegex { pattern, source } => {
                write!(f, "Invalid ignore regex '{pattern}': {source}")
            }
            Self::RegexTooLong { length, max_length } => write!(
                f,
                "Ignore regex is {length} chars, exceeds maximum of {max_length}"
            ),
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogReconError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogRecon results.
pub type Result<T> = std::result::Result<T, LogReconError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_source_error_names_path() {
        let err = SourceError::NotFound {
            path: PathBuf::from("/tmp/kkk.kkk"),
        };
        assert!(err.to_string().contains("/tmp/kkk.kkk"));
    }

    #[test]
    fn test_top_level_error_preserves_chain() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: LogReconError = SourceError::Unreadable {
            path: PathBuf::from("rrr.rrr"),
            source: io,
        }
        .into();
        let inner = err.source().expect("source error");
        assert!(inner.source().is_some(), "io error should be chained");
        assert!(err.to_string().starts_with("Source error:"));
    }

    #[test]
    fn test_duplicate_key_warning_mentions_both_values() {
        let w = ExtractWarning::DuplicateKey {
            file: PathBuf::from("rrr.rrr"),
            line_number: 7,
            key: "e2e4".to_string(),
            previous: "20".to_string(),
            latest: "21".to_string(),
        };
        let text = w.to_string();
        assert!(text.contains("line 7"));
        assert!(text.contains("'20'"));
        assert!(text.contains("'21'"));
    }
}
