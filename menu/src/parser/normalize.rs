//! Listing normalization.

use super::source_path;

/// Splits a listing into parseable lines.
///
/// Line endings are unified, trailing whitespace and blank lines dropped.
/// With `join_continuations`, an indented line that is not a source line is
/// appended to the record line before it, so a wrapped record still has its
/// source line exactly one line below.
pub fn listing_lines(text: &str, join_continuations: bool) -> Vec<String> {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for raw in unified.lines() {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        let is_continuation = join_continuations
            && line.starts_with(char::is_whitespace)
            && source_path(line).is_none()
            && lines.last().is_some_and(|prev| source_path(prev).is_none());

        if is_continuation {
            if let Some(prev) = lines.last_mut() {
                prev.push(' ');
                prev.push_str(line.trim_start());
            }
            continue;
        }

        lines.push(line.to_string());
    }
    lines
}
