// LogRecon - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::ConfigError;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Log Line
// =============================================================================

/// A single line of a source log, borrowed from the file content.
///
/// `key` and `value` are only populated once the line has been through the
/// key/value splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    /// 1-based line number in the source file.
    pub line_number: u64,

    /// Line text without its terminator.
    pub raw: &'a str,

    /// Derived key (text before the delimiter, trimmed).
    pub key: Option<&'a str>,

    /// Derived value (text after the delimiter, trimmed).
    pub value: Option<&'a str>,
}

impl<'a> LogLine<'a> {
    pub fn new(line_number: u64, raw: &'a str) -> Self {
        Self {
            line_number,
            raw,
            key: None,
            value: None,
        }
    }

    /// The raw text with surrounding whitespace removed.
    pub fn text(&self) -> &'a str {
        self.raw.trim()
    }
}

// =============================================================================
// Extraction mode
// =============================================================================

/// Selects the marker, extraction rule, and collection kind for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMode {
    /// Lines starting with `depth`, compared as a set.
    DepthLines,
    /// Every non-blank `move count` line, compared as move -> count values.
    PerftDivide,
    /// Lines inside each `MoveList:` section, counted per depth header.
    MovelistDepth,
    /// `NODE INCR` lines, counted per distinct line.
    NodeIncrCount,
    /// `NODE INCR` lines, compared as a set.
    NodeIncrSet,
}

impl ExtractionMode {
    /// Returns all variants in display order.
    pub fn all() -> &'static [ExtractionMode] {
        &[
            ExtractionMode::DepthLines,
            ExtractionMode::PerftDivide,
            ExtractionMode::MovelistDepth,
            ExtractionMode::NodeIncrCount,
            ExtractionMode::NodeIncrSet,
        ]
    }

    /// Name used on the command line and in config.toml.
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionMode::DepthLines => "depth-lines",
            ExtractionMode::PerftDivide => "perft-divide",
            ExtractionMode::MovelistDepth => "movelist-depth",
            ExtractionMode::NodeIncrCount => "node-incr-count",
            ExtractionMode::NodeIncrSet => "node-incr-set",
        }
    }

    /// The kind of collection this mode builds.
    pub fn collection_kind(&self) -> CollectionKind {
        match self {
            ExtractionMode::DepthLines | ExtractionMode::NodeIncrSet => CollectionKind::Lines,
            ExtractionMode::MovelistDepth | ExtractionMode::NodeIncrCount => {
                CollectionKind::Counts
            }
            ExtractionMode::PerftDivide => CollectionKind::Values,
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExtractionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ExtractionMode::all()
            .iter()
            .copied()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownMode {
                value: s.to_string(),
            })
    }
}

// =============================================================================
// Delimiter
// =============================================================================

/// How a matching line is split into key and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// First literal `:` (`e2e4: 20`).
    Colon,
    /// First run of whitespace (`e2e4 20`). The value is the next field only.
    Whitespace,
    /// Colon if the line has one, otherwise whitespace.
    #[default]
    Auto,
}

impl Delimiter {
    pub fn label(&self) -> &'static str {
        match self {
            Delimiter::Colon => "colon",
            Delimiter::Whitespace => "whitespace",
            Delimiter::Auto => "auto",
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Delimiter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "colon" | ":" => Ok(Delimiter::Colon),
            "whitespace" | "space" => Ok(Delimiter::Whitespace),
            "auto" => Ok(Delimiter::Auto),
            _ => Err(ConfigError::UnknownDelimiter {
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Block flush policy
// =============================================================================

/// What happens to the last block of a block-structured log when the input
/// ends without another header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockFlush {
    /// Emit the in-progress block at end of input.
    #[default]
    FlushOnEof,
    /// Drop the in-progress block; only blocks closed by a following header count.
    DropLast,
}

// =============================================================================
// Collections
// =============================================================================

/// Tag identifying the shape of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Lines,
    Counts,
    Values,
}

impl CollectionKind {
    pub fn label(&self) -> &'static str {
        match self {
            CollectionKind::Lines => "set-of-lines",
            CollectionKind::Counts => "keyed-count",
            CollectionKind::Values => "keyed-value",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unique lines, remembered in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl LineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a line. Returns false if it was already present.
    pub fn insert(&mut self, line: &str) -> bool {
        if self.members.contains(line) {
            return false;
        }
        self.members.insert(line.to_string());
        self.order.push(line.to_string());
        true
    }

    pub fn contains(&self, line: &str) -> bool {
        self.members.contains(line)
    }

    /// Lines in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for LineSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = LineSet::new();
        for line in iter {
            set.insert(line);
        }
        set
    }
}

/// Mapping from key to value, remembering keys in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedMap<V> {
    order: Vec<String>,
    values: HashMap<String, V>,
}

impl<V> Default for KeyedMap<V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            values: HashMap::new(),
        }
    }
}

impl<V> KeyedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `key`. Returns the previous value.
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let previous = self.values.insert(key.to_string(), value);
        if previous.is_none() {
            self.order.push(key.to_string());
        }
        previous
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Entries in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.order
            .iter()
            .filter_map(|k| self.values.get(k).map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl KeyedMap<u64> {
    /// Add one occurrence of `key`.
    pub fn increment(&mut self, key: &str) {
        if let Some(count) = self.values.get_mut(key) {
            *count += 1;
        } else {
            self.insert(key, 1);
        }
    }
}

/// A comparable collection built from exactly one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    Lines(LineSet),
    Counts(KeyedMap<u64>),
    Values(KeyedMap<String>),
}

impl Collection {
    pub fn kind(&self) -> CollectionKind {
        match self {
            Collection::Lines(_) => CollectionKind::Lines,
            Collection::Counts(_) => CollectionKind::Counts,
            Collection::Values(_) => CollectionKind::Values,
        }
    }

    /// Number of distinct lines or keys.
    pub fn len(&self) -> usize {
        match self {
            Collection::Lines(s) => s.len(),
            Collection::Counts(m) => m.len(),
            Collection::Values(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
