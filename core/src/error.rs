//! Error types for menu generation.
//!
//! Two tiers: [`ParseError`] is recoverable and collected per line while
//! listings are parsed; [`HeadlightsError`] is a fatal cause that aborts a
//! run, surfaced as [`FatalRunError`] together with everything collected
//! before it.

use thiserror::Error;

use crate::types::RecordKind;

/// A recoverable, per-line failure. The offending record is dropped and
/// parsing continues with the next line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line did not match its listing grammar.
    #[error("{kind}: {reason} in line '{line}'")]
    Structural {
        kind: RecordKind,
        line: String,
        reason: String,
    },

    /// The listing ended before the record's source line.
    #[error("{kind}: source line not found for '{line}'")]
    AttributionMissing { kind: RecordKind, line: String },

    /// The line after the record is not a source line, or names a script
    /// that has no bundle.
    #[error("{kind}: source script not initialised for '{line}'{}", .path.as_deref().map(|p| format!(" ({p})")).unwrap_or_default())]
    BundleNotInitialized {
        kind: RecordKind,
        line: String,
        path: Option<String>,
    },
}

impl ParseError {
    /// Listing the failing line came from.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Structural { kind, .. }
            | Self::AttributionMissing { kind, .. }
            | Self::BundleNotInitialized { kind, .. } => *kind,
        }
    }

    /// The offending input line.
    pub fn line(&self) -> &str {
        match self {
            Self::Structural { line, .. }
            | Self::AttributionMissing { line, .. }
            | Self::BundleNotInitialized { line, .. } => line,
        }
    }
}

/// Failures outside the per-record recovery paths.
#[derive(Debug, Error)]
pub enum HeadlightsError {
    /// A setting is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configured pattern does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The script listing produced no script at all, so nothing can be
    /// attributed.
    #[error("script listing contains no scripts")]
    NoScripts,

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A run that produced no menus. Carries the recoverable errors collected
/// before the failure so they can be reported verbatim.
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct FatalRunError {
    #[source]
    pub cause: HeadlightsError,
    pub errors: Vec<ParseError>,
}

impl FatalRunError {
    pub fn new(cause: HeadlightsError, errors: Vec<ParseError>) -> Self {
        Self { cause, errors }
    }
}

/// Convenience alias for results with [`HeadlightsError`].
pub type Result<T> = std::result::Result<T, HeadlightsError>;
