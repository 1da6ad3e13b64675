// LogRecon - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::{BlockFlush, Delimiter, ExtractionMode};
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogRecon configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logrecon/ or %APPDATA%\LogRecon\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file still works
/// with an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[compare]` section.
    pub compare: CompareSection,
    /// `[reading]` section.
    pub reading: ReadingSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[compare]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CompareSection {
    /// Extraction mode name.
    pub mode: Option<String>,
    pub left_label: Option<String>,
    pub right_label: Option<String>,
    /// "colon", "whitespace" or "auto".
    pub left_delimiter: Option<String>,
    pub right_delimiter: Option<String>,
    /// Emit the final block at end of input (movelist-depth).
    pub flush_last_block: Option<bool>,
    /// Exit with a failing status when differences are found.
    pub fail_on_diff: Option<bool>,
    /// Regexes for lines dropped before extraction.
    pub ignore_patterns: Option<Vec<String>>,
}

/// `[reading]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReadingSection {
    /// Files at least this large are memory-mapped.
    pub mmap_threshold_bytes: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Compare --
    /// Mode used when none is given on the command line.
    pub mode: Option<ExtractionMode>,
    pub left_label: String,
    pub right_label: String,
    pub left_delimiter: Delimiter,
    pub right_delimiter: Delimiter,
    pub block_flush: BlockFlush,
    pub fail_on_diff: bool,
    /// Validated ignore patterns (source text; compiled by the app layer).
    pub ignore_patterns: Vec<String>,

    // -- Reading --
    pub mmap_threshold: u64,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: None,
            left_label: constants::DEFAULT_LEFT_LABEL.to_string(),
            right_label: constants::DEFAULT_RIGHT_LABEL.to_string(),
            left_delimiter: Delimiter::default(),
            right_delimiter: Delimiter::default(),
            block_flush: BlockFlush::default(),
            fail_on_diff: false,
            ignore_patterns: Vec::new(),
            mmap_threshold: constants::DEFAULT_MMAP_THRESHOLD,
            log_level: None,
            log_file: None,
        }
    }
}

/// Compile an ignore pattern, enforcing the length limit.
pub fn compile_ignore_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    if pattern.len() > constants::MAX_REGEX_PATTERN_LENGTH {
        return Err(ConfigError::RegexTooLong {
            length: pattern.len(),
            max_length: constants::MAX_REGEX_PATTERN_LENGTH,
        });
    }
    Regex::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        pattern: pattern.to_string(),
        source: e,
    })
}

/// Load and validate a config file.
///
/// When `required` is false (the platform default location), a missing file
/// yields defaults, and an unreadable or unparseable file yields defaults plus
/// a warning. When `required` is true (an explicit `--config` path), those
/// conditions are errors.
///
/// Returns the validated config and the list of non-fatal warnings.
pub fn load_config(
    config_path: &Path,
    required: bool,
) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    if !required && !config_path.exists() {
        return Ok((AppConfig::default(), warnings));
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) if required => {
            return Err(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) if required => {
            return Err(ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let config = validate(raw, &mut warnings);
    Ok((config, warnings))
}

/// Validate each field, accumulating warnings for every rejected value.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();
    let compare = raw.compare;

    // -- Compare: mode --
    if let Some(ref mode) = compare.mode {
        match mode.parse::<ExtractionMode>() {
            Ok(m) => config.mode = Some(m),
            Err(e) => warnings.push(format!("[compare] mode: {e}. No default mode set.")),
        }
    }

    // -- Compare: labels --
    if let Some(label) = compare.left_label {
        match validate_label(&label) {
            Some(l) => config.left_label = l,
            None => warnings.push(label_warning("left_label", &label, constants::DEFAULT_LEFT_LABEL)),
        }
    }
    if let Some(label) = compare.right_label {
        match validate_label(&label) {
            Some(l) => config.right_label = l,
            None => warnings.push(label_warning(
                "right_label",
                &label,
                constants::DEFAULT_RIGHT_LABEL,
            )),
        }
    }

    // -- Compare: delimiters --
    if let Some(ref d) = compare.left_delimiter {
        match d.parse::<Delimiter>() {
            Ok(d) => config.left_delimiter = d,
            Err(e) => warnings.push(format!("[compare] left_delimiter: {e}. Using default (auto).")),
        }
    }
    if let Some(ref d) = compare.right_delimiter {
        match d.parse::<Delimiter>() {
            Ok(d) => config.right_delimiter = d,
            Err(e) => warnings.push(format!("[compare] right_delimiter: {e}. Using default (auto).")),
        }
    }

    // -- Compare: flags --
    if let Some(flush) = compare.flush_last_block {
        config.block_flush = if flush {
            BlockFlush::FlushOnEof
        } else {
            BlockFlush::DropLast
        };
    }
    if let Some(fail) = compare.fail_on_diff {
        config.fail_on_diff = fail;
    }

    // -- Compare: ignore patterns --
    for pattern in compare.ignore_patterns.unwrap_or_default() {
        match compile_ignore_pattern(&pattern) {
            Ok(_) => config.ignore_patterns.push(pattern),
            Err(e) => warnings.push(format!("[compare] ignore_patterns: {e}. Pattern skipped.")),
        }
    }

    // -- Reading: mmap threshold --
    if let Some(threshold) = raw.reading.mmap_threshold_bytes {
        if threshold > 0 {
            config.mmap_threshold = threshold;
        } else {
            warnings.push(format!(
                "[reading] mmap_threshold_bytes = 0 is out of range (must be > 0). Using default ({}).",
                constants::DEFAULT_MMAP_THRESHOLD,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    config
}

fn validate_label(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() || trimmed.len() > constants::MAX_LABEL_LENGTH {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn label_warning(field: &str, value: &str, default: &str) -> String {
    format!(
        "[compare] {field} = \"{value}\" must be 1-{} characters. Using default ({default}).",
        constants::MAX_LABEL_LENGTH
    )
}
