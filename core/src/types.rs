//! Record and bundle type definitions.
//!
//! This module defines the data recovered from host introspection output:
//! one record type per listing kind, the [`Bundle`] that groups records by
//! their originating script, and the [`MenuItem`] rendered from them. All
//! types serialize with [`serde`] so a run can be dumped for troubleshooting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of introspection listing a block of text came from.
///
/// The variant order is the order blocks are processed in and the order
/// their sections appear in the debug log.
///
/// # Examples
///
/// ```
/// use headlights_core::RecordKind;
///
/// assert_eq!(RecordKind::Mappings.label(), "mappings");
/// assert_eq!("highlights".parse::<RecordKind>(), Ok(RecordKind::Highlights));
/// assert!(RecordKind::CATEGORIES.iter().all(|kind| *kind != RecordKind::Scripts));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// `:scriptnames` listing.
    Scripts,
    /// `:verbose command` listing.
    Commands,
    /// `:verbose map` listing.
    Mappings,
    /// `:verbose abbreviate` listing.
    Abbreviations,
    /// `:verbose function` listing.
    Functions,
    /// `:verbose highlight` listing.
    Highlights,
}

impl RecordKind {
    /// Every kind that is attributed to a bundle through a source line.
    pub const CATEGORIES: [RecordKind; 5] = [
        RecordKind::Commands,
        RecordKind::Mappings,
        RecordKind::Abbreviations,
        RecordKind::Functions,
        RecordKind::Highlights,
    ];

    /// Stable lowercase label used in errors, logs and input file names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Scripts => "scriptnames",
            Self::Commands => "commands",
            Self::Mappings => "mappings",
            Self::Abbreviations => "abbreviations",
            Self::Functions => "functions",
            Self::Highlights => "highlights",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scriptnames" | "scripts" => Ok(Self::Scripts),
            "commands" => Ok(Self::Commands),
            "mappings" => Ok(Self::Mappings),
            "abbreviations" => Ok(Self::Abbreviations),
            "functions" => Ok(Self::Functions),
            "highlights" => Ok(Self::Highlights),
            other => Err(format!("unknown record kind '{other}'")),
        }
    }
}

/// Editor mode a mapping or abbreviation applies to.
///
/// Introspection output encodes modes as single characters; an empty mode
/// column means "all of Normal, Visual, Select and Operator-pending".
///
/// # Examples
///
/// ```
/// use headlights_core::Mode;
///
/// assert_eq!(Mode::from_char('n'), Some(Mode::Normal));
/// assert_eq!(Mode::from_char(' ').map(Mode::label), Some("Normal, Visual, Select, Operator-pending"));
/// assert_eq!(Mode::from_char('q'), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    NormalVisualOperator,
    Normal,
    VisualSelect,
    Select,
    Visual,
    OperatorPending,
    InsertCommandLine,
    Insert,
    LangMap,
    CommandLine,
    Terminal,
}

impl Mode {
    /// Maps one mode character of a listing to its mode.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(Self::NormalVisualOperator),
            'n' => Some(Self::Normal),
            'v' => Some(Self::VisualSelect),
            's' => Some(Self::Select),
            'x' => Some(Self::Visual),
            'o' => Some(Self::OperatorPending),
            '!' => Some(Self::InsertCommandLine),
            'i' => Some(Self::Insert),
            'l' => Some(Self::LangMap),
            'c' => Some(Self::CommandLine),
            't' => Some(Self::Terminal),
            _ => None,
        }
    }

    /// Human-readable mode name shown as a submenu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::NormalVisualOperator => "Normal, Visual, Select, Operator-pending",
            Self::Normal => "Normal",
            Self::VisualSelect => "Visual and Select",
            Self::Select => "Select",
            Self::Visual => "Visual",
            Self::OperatorPending => "Operator-pending",
            Self::InsertCommandLine => "Insert and Command-line",
            Self::Insert => "Insert",
            Self::LangMap => ":lmap",
            Self::CommandLine => "Command-line",
            Self::Terminal => "Terminal-Job",
        }
    }
}

/// A user command recovered from the command listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Command name (e.g. `Gstatus`).
    pub name: String,
    /// Replacement text, without the leading `:`. May be empty.
    pub definition: String,
    /// Defined with `-buffer`.
    pub is_buffer_local: bool,
    /// Defined with `-bang`.
    #[serde(default)]
    pub bang: bool,
    /// Defined with `-register`.
    #[serde(default)]
    pub register: bool,
    /// `-nargs` column (`0`, `1`, `*`, `?`, `+`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nargs: Option<String>,
    /// Range/count column (`.`, `%`, `1c`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Address type after the range (`buf`, `win`, `?`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
    /// Completion column (`file`, `dir`, `custom,Fn`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<String>,
}

impl CommandRecord {
    /// Creates a global command with no attribute columns.
    pub fn new(name: &str, definition: &str) -> Self {
        Self {
            name: name.to_string(),
            definition: definition.to_string(),
            is_buffer_local: false,
            bang: false,
            register: false,
            nargs: None,
            range: None,
            address_type: None,
            complete: None,
        }
    }
}

/// One mapping for one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub mode: Mode,
    pub lhs: String,
    pub rhs: String,
    pub is_buffer_local: bool,
    #[serde(default)]
    pub noremap: bool,
    #[serde(default)]
    pub script_local: bool,
}

/// One abbreviation for one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationRecord {
    pub mode: Mode,
    pub lhs: String,
    pub rhs: String,
    /// Declared with `<expr>`.
    #[serde(default)]
    pub is_expr: bool,
}

/// A public (global) function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
}

/// Attribute list for one terminal type of a highlight group
/// (e.g. `gui=bold,italic`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightAttribute {
    pub terminal: String,
    pub values: Vec<String>,
}

impl fmt::Display for HighlightAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.terminal, self.values.join(","))
    }
}

/// A highlight group with renderable attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRecord {
    pub group: String,
    pub attributes: Vec<HighlightAttribute>,
}

impl HighlightRecord {
    /// Attributes in listing order, space separated.
    ///
    /// # Examples
    ///
    /// ```
    /// use headlights_core::{HighlightAttribute, HighlightRecord};
    ///
    /// let record = HighlightRecord {
    ///     group: "Comment".into(),
    ///     attributes: vec![
    ///         HighlightAttribute { terminal: "term".into(), values: vec!["bold".into()] },
    ///         HighlightAttribute { terminal: "gui".into(), values: vec!["bold".into(), "italic".into()] },
    ///     ],
    /// };
    /// assert_eq!(record.attribute_summary(), "term=bold gui=bold,italic");
    /// ```
    pub fn attribute_summary(&self) -> String {
        self.attributes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Any parsed record, as produced by the record parsers before it is
/// attributed to a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Command(CommandRecord),
    Mapping(MappingRecord),
    Abbreviation(AbbreviationRecord),
    Function(FunctionRecord),
    Highlight(HighlightRecord),
}

impl Record {
    /// Whether attributing this record makes its bundle buffer-local.
    pub fn is_buffer_local(&self) -> bool {
        match self {
            Self::Command(command) => command.is_buffer_local,
            Self::Mapping(mapping) => mapping.is_buffer_local,
            Self::Abbreviation(_) | Self::Function(_) | Self::Highlight(_) => false,
        }
    }
}

/// One source script (or a group of sibling scripts of one plugin) and
/// everything attributed to it.
///
/// # Examples
///
/// ```
/// use headlights_core::{Bundle, CommandRecord, Record};
///
/// let mut bundle = Bundle::new("/home/u/.vim/plugin/surround.vim", "surround", 3);
/// bundle.push(Record::Command(CommandRecord::new("Surround", "call s:go()")));
/// assert_eq!(bundle.commands.len(), 1);
/// assert!(!bundle.is_buffer_local);
/// assert!(!bundle.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Canonical absolute path; the bundle table key.
    pub path: String,
    /// Display name used as the menu label.
    pub name: String,
    /// Plugin root directory, when smart merging found one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Load-order index from the script listing.
    pub order: usize,
    pub is_buffer_local: bool,
    pub commands: Vec<CommandRecord>,
    pub mappings: Vec<MappingRecord>,
    pub abbreviations: Vec<AbbreviationRecord>,
    pub functions: Vec<FunctionRecord>,
    pub highlights: Vec<HighlightRecord>,
}

impl Bundle {
    /// Creates an empty bundle.
    pub fn new(path: &str, name: &str, order: usize) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            root: None,
            order,
            is_buffer_local: false,
            commands: Vec::new(),
            mappings: Vec::new(),
            abbreviations: Vec::new(),
            functions: Vec::new(),
            highlights: Vec::new(),
        }
    }

    /// Appends a record to its sequence, flagging the bundle buffer-local
    /// when the record is.
    pub fn push(&mut self, record: Record) {
        if record.is_buffer_local() {
            self.is_buffer_local = true;
        }
        match record {
            Record::Command(command) => self.commands.push(command),
            Record::Mapping(mapping) => self.mappings.push(mapping),
            Record::Abbreviation(abbreviation) => self.abbreviations.push(abbreviation),
            Record::Function(function) => self.functions.push(function),
            Record::Highlight(highlight) => self.highlights.push(highlight),
        }
    }

    /// Number of records attributed to this bundle.
    pub fn record_count(&self) -> usize {
        self.commands.len()
            + self.mappings.len()
            + self.abbreviations.len()
            + self.functions.len()
            + self.highlights.len()
    }

    /// Returns `true` when no records were attributed.
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

/// Whether a menu line creates an item or greys one out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Create,
    Disable,
}

/// Dotted numeric menu priority (`210` or `210.10`).
///
/// # Examples
///
/// ```
/// use headlights_core::Priority;
///
/// assert_eq!(Priority::new(150).to_string(), "150");
/// assert_eq!(Priority::sub(210, 20).to_string(), "210.20");
/// assert!(Priority::sub(210, 10) < Priority::sub(210, 20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority {
    pub major: u16,
    pub minor: Option<u16>,
}

impl Priority {
    pub const fn new(major: u16) -> Self {
        Self { major, minor: None }
    }

    pub const fn sub(major: u16, minor: u16) -> Self {
        Self {
            major,
            minor: Some(minor),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}.{minor:02}", self.major),
            None => write!(f, "{}", self.major),
        }
    }
}

/// One menu definition, before it is flattened to a command string.
///
/// `path_segments` are already escaped; the renderer joins them with `.`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub verb: Verb,
    pub priority: Priority,
    pub path_segments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    pub action: String,
}

impl MenuItem {
    /// An item that runs `action` when selected.
    pub fn create(priority: Priority, path_segments: Vec<String>, action: &str) -> Self {
        Self {
            verb: Verb::Create,
            priority,
            path_segments,
            secondary: None,
            action: action.to_string(),
        }
    }

    /// Greys out the item at `path_segments`.
    pub fn disable(path_segments: Vec<String>) -> Self {
        Self {
            verb: Verb::Disable,
            priority: Priority::new(0),
            path_segments,
            secondary: None,
            action: String::new(),
        }
    }

    /// Sets the right-aligned secondary label (shown after `<Tab>`).
    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }

    /// The dotted menu path.
    pub fn path(&self) -> String {
        self.path_segments.join(".")
    }

    /// Renders the literal host command.
    ///
    /// # Examples
    ///
    /// ```
    /// use headlights_core::{MenuItem, Priority};
    ///
    /// let item = MenuItem::create(
    ///     Priority::new(120),
    ///     vec!["Bundles".into(), "a-i".into(), "fugitive".into(), "Doc".into()],
    ///     ":help fugitive<CR>",
    /// )
    /// .with_secondary("help\\ fugitive");
    /// assert_eq!(
    ///     item.to_command(),
    ///     "amenu 120 Bundles.a-i.fugitive.Doc<Tab>help\\ fugitive :help fugitive<CR>"
    /// );
    ///
    /// let disabled = MenuItem::disable(vec!["Bundles".into(), "Help".into()]);
    /// assert_eq!(disabled.to_command(), "amenu disable Bundles.Help");
    /// ```
    pub fn to_command(&self) -> String {
        match self.verb {
            Verb::Disable => format!("amenu disable {}", self.path()),
            Verb::Create => {
                let tab = self
                    .secondary
                    .as_deref()
                    .map(|secondary| format!("<Tab>{secondary}"))
                    .unwrap_or_default();
                format!(
                    "amenu {} {}{tab} {}",
                    self.priority,
                    self.path(),
                    self.action
                )
            }
        }
    }
}
