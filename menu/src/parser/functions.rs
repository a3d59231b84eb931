//! Function listing parser. Only public, global names become records.

use std::sync::LazyLock;

use headlights_core::{FunctionRecord, Record, RecordKind};
use regex::Regex;

use super::{LineOutcome, ParseFailure, RecordParser};

static FUNCTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:function|def)!?\s+(?P<name>[^\s(]+)\s*\(").expect("static regex must compile")
});

/// Whether a listed function name is script-local, numbered, anonymous or
/// scoped rather than a plain global name.
fn is_internal(name: &str) -> bool {
    name.starts_with("<SNR>")
        || name.starts_with("<lambda>")
        || name.chars().all(|ch| ch.is_ascii_digit())
        || name.contains(['#', ':', '.'])
}

pub struct FunctionParser;

impl RecordParser for FunctionParser {
    fn kind(&self) -> RecordKind {
        RecordKind::Functions
    }

    fn parse_line(&self, line: &str) -> Result<LineOutcome, ParseFailure> {
        let caps = FUNCTION_LINE
            .captures(line)
            .ok_or_else(|| ParseFailure::new("no function name found"))?;
        let name = caps
            .name("name")
            .map(|m| m.as_str())
            .ok_or_else(|| ParseFailure::new("no function name found"))?;

        if is_internal(name) {
            return Ok(LineOutcome::Skip("internal function"));
        }
        Ok(LineOutcome::Records(vec![Record::Function(FunctionRecord {
            name: name.to_string(),
        })]))
    }
}
