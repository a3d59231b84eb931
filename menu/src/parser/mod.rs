//! Record parsers for the host's introspection listings.
//!
//! Every category listing shares one layout: a record line (sometimes
//! wrapped over several physical lines) followed by a source attribution
//! line naming the script that defined it:
//!
//! ```text
//! n  <Leader>gs    * :Gstatus<CR>
//! 	Last set from ~/.vim/bundle/fugitive/plugin/fugitive.vim line 12
//! ```
//!
//! [`parse_listing`] drives one [`RecordParser`] over a listing. It never
//! resolves owners itself: each recognized record is returned with the
//! [`Attribution`] found exactly one line after it, and the aggregator turns
//! that into a bundle.
//!
//! The record kinds are a closed set; [`parser_for`] maps each kind to its
//! parser with a `match`, never by name lookup.

mod abbreviations;
mod commands;
mod functions;
mod highlights;
mod mappings;
mod normalize;
mod scripts;

use std::sync::LazyLock;

use headlights_core::{Mode, ParseError, Record, RecordKind};
use regex::Regex;
use tracing::debug;

pub use abbreviations::AbbreviationParser;
pub use commands::CommandParser;
pub use functions::FunctionParser;
pub use highlights::HighlightParser;
pub use mappings::MappingParser;
pub use normalize::listing_lines;
pub use scripts::{ScriptEntry, parse_script_line, parse_scriptnames};

static SOURCE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*Last set from\s+(?P<path>.+?)(?:\s+line\s+\d+)?\s*$")
        .expect("static regex must compile")
});

/// Result of one record line that matched its grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line yields these records (one per mode for mappings).
    Records(Vec<Record>),
    /// The line is well-formed but carries nothing renderable.
    Skip(&'static str),
}

/// Why a record line did not match its grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub reason: String,
}

impl ParseFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Grammar for one listing kind.
pub trait RecordParser {
    fn kind(&self) -> RecordKind;

    /// Column header lines dropped before parsing.
    fn is_header(&self, _line: &str) -> bool {
        false
    }

    /// Whether indented lines continue the previous record line.
    fn joins_continuations(&self) -> bool {
        false
    }

    fn parse_line(&self, line: &str) -> Result<LineOutcome, ParseFailure>;
}

static COMMANDS: CommandParser = CommandParser;
static MAPPINGS: MappingParser = MappingParser;
static ABBREVIATIONS: AbbreviationParser = AbbreviationParser;
static FUNCTIONS: FunctionParser = FunctionParser;
static HIGHLIGHTS: HighlightParser = HighlightParser;

/// The parser for a category listing. The script listing has no source
/// lines and is handled by [`parse_scriptnames`] instead.
pub fn parser_for(kind: RecordKind) -> Option<&'static dyn RecordParser> {
    match kind {
        RecordKind::Scripts => None,
        RecordKind::Commands => Some(&COMMANDS),
        RecordKind::Mappings => Some(&MAPPINGS),
        RecordKind::Abbreviations => Some(&ABBREVIATIONS),
        RecordKind::Functions => Some(&FUNCTIONS),
        RecordKind::Highlights => Some(&HIGHLIGHTS),
    }
}

/// Owner information found on the line after a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribution {
    /// A source line; the raw (unnormalized) script path.
    Source(String),
    /// The next line exists but is not a source line.
    NotSource(String),
    /// The listing ended right after the record.
    Missing,
}

impl Attribution {
    fn of(next: Option<&String>) -> Self {
        match next {
            None => Self::Missing,
            Some(line) => match source_path(line) {
                Some(path) => Self::Source(path.to_string()),
                None => Self::NotSource(line.clone()),
            },
        }
    }
}

/// A recognized record line awaiting attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub line: String,
    pub records: Vec<Record>,
    pub attribution: Attribution,
}

/// Returns the script path of a source attribution line.
///
/// # Examples
///
/// ```
/// use headlights_menu::parser::source_path;
///
/// assert_eq!(source_path("\tLast set from ~/.vimrc"), Some("~/.vimrc"));
/// assert_eq!(source_path("\tLast set from ~/.vimrc line 42"), Some("~/.vimrc"));
/// assert_eq!(source_path("n  gx  * <Plug>NetrwBrowseX"), None);
/// ```
pub fn source_path(line: &str) -> Option<&str> {
    SOURCE_LINE
        .captures(line)
        .and_then(|caps| caps.name("path"))
        .map(|m| m.as_str())
}

/// Runs `parser` over a listing, in line order.
///
/// Lines that fail their grammar come back as
/// [`ParseError::Structural`]; everything else that yields records comes
/// back with the attribution of the line right after it.
pub fn parse_listing(
    parser: &dyn RecordParser,
    text: &str,
) -> Vec<Result<ParsedRecord, ParseError>> {
    let kind = parser.kind();
    let mut lines = listing_lines(text, parser.joins_continuations());
    if lines.first().is_some_and(|line| parser.is_header(line)) {
        lines.remove(0);
    }

    let mut entries = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if source_path(line).is_some() {
            continue;
        }

        match parser.parse_line(line) {
            Ok(LineOutcome::Records(records)) => entries.push(Ok(ParsedRecord {
                line: line.clone(),
                records,
                attribution: Attribution::of(lines.get(idx + 1)),
            })),
            Ok(LineOutcome::Skip(reason)) => {
                debug!(%kind, line = line.as_str(), reason, "skipped listing line");
            }
            Err(failure) => entries.push(Err(ParseError::Structural {
                kind,
                line: line.clone(),
                reason: failure.reason,
            })),
        }
    }
    entries
}

/// Expands a mode column into modes. An empty column is the all-modes
/// default; repeated characters yield one mode.
pub(crate) fn parse_modes(column: Option<&str>) -> Result<Vec<Mode>, ParseFailure> {
    let column = match column {
        Some(text) if !text.is_empty() => text,
        _ => " ",
    };

    let mut modes = Vec::new();
    for ch in column.chars() {
        let mode = Mode::from_char(ch)
            .ok_or_else(|| ParseFailure::new(format!("unknown mode '{ch}'")))?;
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }
    Ok(modes)
}
