// LogRecon - core/split.rs
//
// Key/value splitting of matching lines (`e2e4: 20` or `e2e4 20`).

use crate::core::model::{Delimiter, LogLine};
use regex::Regex;
use std::sync::OnceLock;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"))
}

/// Split `text` into a trimmed `(key, value)` pair.
///
/// Returns `None` when the delimiter is absent or the key would be empty;
/// the caller decides whether that is worth a warning.
pub fn split_key_value(text: &str, delimiter: Delimiter) -> Option<(&str, &str)> {
    let text = text.trim();
    let (key, value) = match delimiter {
        Delimiter::Colon => text.split_once(':')?,
        Delimiter::Whitespace => split_on_whitespace(text)?,
        Delimiter::Auto => {
            if text.contains(':') {
                text.split_once(':')?
            } else {
                split_on_whitespace(text)?
            }
        }
    };

    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// First field is the key, second field the value; later fields
/// (`e2e4 20 (check)`) are ignored.
fn split_on_whitespace(text: &str) -> Option<(&str, &str)> {
    let mut fields = whitespace_run().splitn(text, 3);
    let key = fields.next()?;
    let value = fields.next()?;
    Some((key, value))
}

/// Populate `key` and `value` on a line, or `None` if it cannot be split.
pub fn split_line(line: LogLine<'_>, delimiter: Delimiter) -> Option<LogLine<'_>> {
    let (key, value) = split_key_value(line.raw, delimiter)?;
    Some(LogLine {
        key: Some(key),
        value: Some(value),
        ..line
    })
}
