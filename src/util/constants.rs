// LogRecon - util/constants.rs
//
// Single source of truth for all named constants, markers, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogRecon";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogRecon";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Extraction markers
// =============================================================================

/// Prefix of search-trace lines compared in `depth-lines` mode.
pub const DEPTH_LINE_PREFIX: &str = "depth";

/// Header that opens a new block in `movelist-depth` mode.
/// The trailing space is part of the marker; the depth number follows it.
pub const MOVELIST_HEADER_MARKER: &str = "+++++++++++++ moves generated for depth ";

/// Marker that opens the counted section inside a `movelist-depth` block.
pub const MOVELIST_SECTION_MARKER: &str = "MoveList:";

/// Marker identifying node-increment trace lines.
pub const NODE_INCR_MARKER: &str = "NODE INCR";

// =============================================================================
// Reading limits
// =============================================================================

/// File size threshold in bytes above which the file is memory-mapped
/// instead of read into a heap buffer.
pub const DEFAULT_MMAP_THRESHOLD: u64 = 64 * 1024 * 1024; // 64 MB

/// Maximum number of non-fatal extraction warnings kept per source file.
/// Further warnings are still logged but not retained.
pub const MAX_WARNINGS_PER_FILE: usize = 1_000;

/// Maximum regex pattern length accepted for ignore patterns.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4_096;

// =============================================================================
// Report defaults
// =============================================================================

/// Label used for the first (left) log in the report.
pub const DEFAULT_LEFT_LABEL: &str = "A";

/// Label used for the second (right) log in the report.
pub const DEFAULT_RIGHT_LABEL: &str = "B";

/// Maximum length of a side label. Longer labels are rejected in config.
pub const MAX_LABEL_LENGTH: usize = 64;

// =============================================================================
// Exit status
// =============================================================================

/// Comparison completed.
pub const EXIT_OK: u8 = 0;

/// Differences found and the caller asked for a failing status.
pub const EXIT_DIFFERENCES: u8 = 1;

/// Fatal error (unreadable input, bad configuration, export failure).
pub const EXIT_FATAL: u8 = 2;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in warning and debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
