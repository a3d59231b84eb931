//! Abbreviation listing parser.

use std::sync::LazyLock;

use headlights_core::{AbbreviationRecord, Record, RecordKind};
use regex::Regex;

use super::{LineOutcome, ParseFailure, RecordParser, parse_modes};

static ABBREVIATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^
        (?P<modes>[nvsxo!ilct]+)?
        \s+
        (?P<expr><expr>\s+)?
        (?P<lhs>\S+)
        \s+
        (?P<rhs>.+?)
        \s*$
        ",
    )
    .expect("static regex must compile")
});

pub struct AbbreviationParser;

impl RecordParser for AbbreviationParser {
    fn kind(&self) -> RecordKind {
        RecordKind::Abbreviations
    }

    fn parse_line(&self, line: &str) -> Result<LineOutcome, ParseFailure> {
        if line.trim() == "No abbreviation found" {
            return Ok(LineOutcome::Skip("empty abbreviation listing"));
        }

        let caps = ABBREVIATION_LINE
            .captures(line)
            .ok_or_else(|| ParseFailure::new("lhs/rhs not found"))?;
        let (Some(lhs), Some(rhs)) = (caps.name("lhs"), caps.name("rhs")) else {
            return Err(ParseFailure::new("lhs/rhs not found"));
        };

        let is_expr = caps.name("expr").is_some();
        let records = parse_modes(caps.name("modes").map(|m| m.as_str()))?
            .into_iter()
            .map(|mode| {
                Record::Abbreviation(AbbreviationRecord {
                    mode,
                    lhs: lhs.as_str().to_string(),
                    rhs: rhs.as_str().to_string(),
                    is_expr,
                })
            })
            .collect();
        Ok(LineOutcome::Records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headlights_core::Mode;

    fn parse(line: &str) -> Vec<AbbreviationRecord> {
        match AbbreviationParser.parse_line(line) {
            Ok(LineOutcome::Records(records)) => records
                .into_iter()
                .map(|record| match record {
                    Record::Abbreviation(abbreviation) => abbreviation,
                    other => panic!("unexpected record {other:?}"),
                })
                .collect(),
            other => panic!("expected abbreviations for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_abbreviation() {
        let abbreviations = parse("i  teh           the");
        assert_eq!(abbreviations.len(), 1);
        assert_eq!(abbreviations[0].mode, Mode::Insert);
        assert_eq!(abbreviations[0].lhs, "teh");
        assert_eq!(abbreviations[0].rhs, "the");
        assert!(!abbreviations[0].is_expr);
    }

    #[test]
    fn test_all_modes_abbreviation_and_multiword_rhs() {
        let abbreviations = parse("!  adn           and then some");
        assert_eq!(abbreviations[0].mode, Mode::InsertCommandLine);
        assert_eq!(abbreviations[0].rhs, "and then some");
    }

    #[test]
    fn test_expr_marker() {
        let abbreviations = parse("ic <expr> dts strftime('%c')");
        assert_eq!(abbreviations.len(), 2);
        assert!(abbreviations.iter().all(|a| a.is_expr && a.lhs == "dts"));
        assert_eq!(abbreviations[1].mode, Mode::CommandLine);
    }

    #[test]
    fn test_missing_rhs_fails() {
        assert!(AbbreviationParser.parse_line("i  teh").is_err());
    }
}
