//! Highlight group listing parser.
//!
//! Long groups wrap onto indented continuation lines, so this parser asks
//! for continuations to be joined before it sees a line. Groups that are
//! cleared or only link to another group carry no attributes and are
//! skipped.

use std::sync::LazyLock;

use headlights_core::{HighlightAttribute, HighlightRecord, Record, RecordKind};
use regex::Regex;

use super::{LineOutcome, ParseFailure, RecordParser};

static HIGHLIGHT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<group>[A-Za-z0-9_@.\-]+)\s+(?:xxx\s+)?(?P<body>.+)$")
        .expect("static regex must compile")
});

static TRAILING_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+links to \S+\s*$").expect("static regex must compile"));

pub struct HighlightParser;

impl RecordParser for HighlightParser {
    fn kind(&self) -> RecordKind {
        RecordKind::Highlights
    }

    fn joins_continuations(&self) -> bool {
        true
    }

    fn parse_line(&self, line: &str) -> Result<LineOutcome, ParseFailure> {
        let caps = HIGHLIGHT_LINE
            .captures(line.trim_end())
            .ok_or_else(|| ParseFailure::new("no highlight group found"))?;
        let (Some(group), Some(body)) = (caps.name("group"), caps.name("body")) else {
            return Err(ParseFailure::new("no highlight group found"));
        };

        let body = body.as_str().trim();
        if body == "cleared" || body.starts_with("links to") {
            return Ok(LineOutcome::Skip("group has no attributes"));
        }
        let body = TRAILING_LINK.replace(body, "");

        let attributes = parse_attributes(&body)?;
        if attributes.is_empty() {
            return Err(ParseFailure::new("no attributes found"));
        }
        Ok(LineOutcome::Records(vec![Record::Highlight(HighlightRecord {
            group: group.as_str().to_string(),
            attributes,
        })]))
    }
}

/// Splits `term=bold gui=bold,italic font=Monospace 10` into attributes.
/// A word without `=` belongs to the previous value (font names contain
/// spaces).
fn parse_attributes(body: &str) -> Result<Vec<HighlightAttribute>, ParseFailure> {
    let mut attributes: Vec<HighlightAttribute> = Vec::new();
    for token in body.split_whitespace() {
        match token.split_once('=') {
            Some((terminal, values)) if !terminal.is_empty() => {
                attributes.push(HighlightAttribute {
                    terminal: terminal.to_string(),
                    values: values.split(',').map(str::to_string).collect(),
                });
            }
            _ => {
                let value = attributes
                    .last_mut()
                    .and_then(|attribute| attribute.values.last_mut())
                    .ok_or_else(|| ParseFailure::new(format!("stray word '{token}'")))?;
                value.push(' ');
                value.push_str(token);
            }
        }
    }
    Ok(attributes)
}
