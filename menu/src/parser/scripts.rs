//! Script listing (`<index>: <path>`) parser.

use std::sync::LazyLock;

use headlights_core::{ParseError, RecordKind};
use regex::Regex;

static SCRIPT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<index>\d+)(?:\s+A)?:\s*(?P<path>\S.*?)\s*$").expect("static regex must compile")
});

/// One entry of the script listing, path still raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub order: usize,
    pub path: String,
}

/// Parses one `<index>: <path>` line. Autoload scripts that are listed but
/// not sourced yet carry an `A` marker (`<index> A: <path>`).
///
/// # Examples
///
/// ```
/// use headlights_menu::parser::parse_script_line;
///
/// let entry = parse_script_line("  3: ~/.vim/plugin/surround.vim").unwrap();
/// assert_eq!(entry.order, 3);
/// assert_eq!(entry.path, "~/.vim/plugin/surround.vim");
/// assert!(parse_script_line("~/.vim/plugin/surround.vim").is_none());
/// ```
pub fn parse_script_line(line: &str) -> Option<ScriptEntry> {
    let caps = SCRIPT_LINE.captures(line)?;
    let order = caps.name("index")?.as_str().parse().ok()?;
    let path = caps.name("path")?.as_str().to_string();
    Some(ScriptEntry { order, path })
}

/// Parses a whole script listing. Blank lines are ignored; any other line
/// without the `<index>: <path>` shape is reported and skipped.
pub fn parse_scriptnames(text: &str) -> Vec<Result<ScriptEntry, ParseError>> {
    super::listing_lines(text, false)
        .into_iter()
        .map(|line| {
            parse_script_line(&line).ok_or_else(|| ParseError::Structural {
                kind: RecordKind::Scripts,
                reason: "no '<index>: <path>' entry".to_string(),
                line,
            })
        })
        .collect()
}
