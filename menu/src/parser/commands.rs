//! User command listing parser.
//!
//! ```text
//!     Name              Args Address Complete    Definition
//! !   Gstatus           0                        call fugitive#Status()
//! b   Lint              ?    .       file        :call lint#Run(<q-args>)
//! !|  Git               ?            customlist,fugitive#Complete exe fugitive#Command()
//! ```

use std::sync::LazyLock;

use headlights_core::{CommandRecord, Record, RecordKind};
use regex::Regex;

use super::{LineOutcome, ParseFailure, RecordParser};

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Name\s+Args\b").expect("static regex must compile"));

/// User command names always start with an uppercase letter, so a `b` in
/// the flag field never swallows the start of a name.
static COMMAND_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        ^
        (?P<bang>!)?\s*
        (?P<register>")?\s*
        (?P<buffer>b)?\s*
        (?P<bar>\|)?\s*
        (?P<name>[A-Z]\w*)
        (?:\s+|$)
        (?:(?P<nargs>[01*?+])(?:\s+|$))?
        (?:(?P<range>\.|%|\d+c?)(?:\s+|$))?
        (?:(?P<addr>arg|buf|load|win|tab|qf|none|\?)(?:\s+|$))?
        (?:(?P<complete>
            (?:custom|customlist),\S+
            | arglist | augroup | behave | breakpoint | buffer | color | command
            | compiler | cscope | diff_buffer | dir | dir_in_path | environment
            | event | expression | file | file_in_path | filetype | function
            | help | highlight | history | keymap | locale | mapclear | mapping
            | menu | messages | option | packadd | runtime | scriptnames
            | shellcmd | sign | syntax | syntime | tag | tag_listfiles | user | var
        )(?:\s+|$))?
        :?
        (?P<definition>.*?)
        \s*$
        "#,
    )
    .expect("static regex must compile")
});

pub struct CommandParser;

impl RecordParser for CommandParser {
    fn kind(&self) -> RecordKind {
        RecordKind::Commands
    }

    fn is_header(&self, line: &str) -> bool {
        HEADER.is_match(line)
    }

    fn parse_line(&self, line: &str) -> Result<LineOutcome, ParseFailure> {
        let line = line.trim();
        if line.starts_with("No user-defined commands found") {
            return Ok(LineOutcome::Skip("empty command listing"));
        }

        let caps = COMMAND_LINE
            .captures(line)
            .ok_or_else(|| ParseFailure::new("no command name found"))?;
        let name = caps
            .name("name")
            .map(|m| m.as_str())
            .ok_or_else(|| ParseFailure::new("no command name found"))?;

        let column = |group: &str| caps.name(group).map(|m| m.as_str().trim().to_string());

        let record = CommandRecord {
            name: name.to_string(),
            definition: caps
                .name("definition")
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
            is_buffer_local: caps.name("buffer").is_some(),
            bang: caps.name("bang").is_some(),
            register: caps.name("register").is_some(),
            nargs: column("nargs"),
            range: column("range"),
            address_type: column("addr"),
            complete: column("complete"),
        };
        Ok(LineOutcome::Records(vec![Record::Command(record)]))
    }
}
