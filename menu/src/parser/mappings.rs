//! Key mapping listing parser.

use std::sync::LazyLock;

use headlights_core::{MappingRecord, Record, RecordKind};
use regex::Regex;

use super::{LineOutcome, ParseFailure, RecordParser, parse_modes};

static MAPPING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^
        (?P<modes>[nvsxo!ilct]+)?
        \s+
        (?P<lhs>\S+)
        \s+
        (?P<noremap>\*)?
        (?P<script>&)?
        (?P<buffer>@)?
        \s*
        (?P<rhs>.+?)
        \s*$
        ",
    )
    .expect("static regex must compile")
});

pub struct MappingParser;

impl RecordParser for MappingParser {
    fn kind(&self) -> RecordKind {
        RecordKind::Mappings
    }

    fn parse_line(&self, line: &str) -> Result<LineOutcome, ParseFailure> {
        if line.trim() == "No mapping found" {
            return Ok(LineOutcome::Skip("empty mapping listing"));
        }

        let caps = MAPPING_LINE
            .captures(line)
            .ok_or_else(|| ParseFailure::new("lhs/rhs not found"))?;
        let (Some(lhs), Some(rhs)) = (caps.name("lhs"), caps.name("rhs")) else {
            return Err(ParseFailure::new("lhs/rhs not found"));
        };

        let modes = parse_modes(caps.name("modes").map(|m| m.as_str()))?;
        let is_buffer_local = caps.name("buffer").is_some();
        let noremap = caps.name("noremap").is_some();
        let script_local = caps.name("script").is_some();

        let records = modes
            .into_iter()
            .map(|mode| {
                Record::Mapping(MappingRecord {
                    mode,
                    lhs: lhs.as_str().to_string(),
                    rhs: rhs.as_str().to_string(),
                    is_buffer_local,
                    noremap,
                    script_local,
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

    fn parse(line: &str) -> Vec<MappingRecord> {
        match MappingParser.parse_line(line) {
            Ok(LineOutcome::Records(records)) => records
                .into_iter()
                .map(|record| match record {
                    Record::Mapping(mapping) => mapping,
                    other => panic!("unexpected record {other:?}"),
                })
                .collect(),
            other => panic!("expected mappings for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_single_mode_noremap() {
        let mappings = parse("n  <Leader>gs  * :Gstatus<CR>");
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].mode, Mode::Normal);
        assert_eq!(mappings[0].lhs, "<Leader>gs");
        assert_eq!(mappings[0].rhs, ":Gstatus<CR>");
        assert!(mappings[0].noremap);
        assert!(!mappings[0].is_buffer_local);
    }

    #[test]
    fn test_multi_mode_expands_per_mode() {
        let mappings = parse("nv <C-j>  * 5j");
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].mode, Mode::Normal);
        assert_eq!(mappings[1].mode, Mode::VisualSelect);
        assert!(mappings.iter().all(|m| m.lhs == "<C-j>" && m.rhs == "5j"));
    }

    #[test]
    fn test_empty_mode_column_means_all_modes() {
        let mappings = parse("   <Plug>(easymotion-prefix)   <Plug>(easymotion-s)");
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].mode, Mode::NormalVisualOperator);
        assert_eq!(mappings[0].rhs, "<Plug>(easymotion-s)");
        assert!(!mappings[0].noremap);
    }

    #[test]
    fn test_buffer_and_script_flags() {
        let mappings = parse("i  <Tab>       *@<SNR>12_complete()");
        assert!(mappings[0].is_buffer_local);
        assert!(mappings[0].noremap);
        assert_eq!(mappings[0].rhs, "<SNR>12_complete()");

        let mappings = parse("x  ga          &@ <SID>Align");
        assert!(mappings[0].script_local);
        assert!(mappings[0].is_buffer_local);
        assert_eq!(mappings[0].rhs, "<SID>Align");
    }

    #[test]
    fn test_malformed_lines_fail() {
        assert!(MappingParser.parse_line("garbage").is_err());
        assert!(MappingParser.parse_line("n  lonely").is_err());
    }

    #[test]
    fn test_no_mapping_found_is_skipped() {
        assert!(matches!(
            MappingParser.parse_line("No mapping found"),
            Ok(LineOutcome::Skip(_))
        ));
    }
}
