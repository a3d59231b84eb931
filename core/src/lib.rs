//! Core types for the headlights menu engine.
//!
//! This crate holds the plain data shared by the parsing engine and its
//! front ends:
//!
//! - [`Bundle`] — one source script and everything attributed to it.
//! - [`CommandRecord`], [`MappingRecord`], [`AbbreviationRecord`],
//!   [`FunctionRecord`], [`HighlightRecord`] — records recovered from the
//!   host's introspection listings, unified as [`Record`].
//! - [`MenuItem`] — one menu definition, rendered with
//!   [`MenuItem::to_command`].
//! - [`MenuConfig`] — the run settings, loadable from YAML.
//!
//! Errors are split into the recoverable per-line [`ParseError`] and the
//! fatal [`HeadlightsError`] / [`FatalRunError`].
//!
//! # Example
//!
//! ```
//! use headlights_core::*;
//!
//! let mut bundle = Bundle::new("/home/u/.vim/plugin/commentary.vim", "commentary", 12);
//! bundle.push(Record::Mapping(MappingRecord {
//!     mode: Mode::Normal,
//!     lhs: "gcc".into(),
//!     rhs: "<Plug>CommentaryLine".into(),
//!     is_buffer_local: false,
//!     noremap: false,
//!     script_local: false,
//! }));
//!
//! assert_eq!(bundle.mappings[0].mode.label(), "Normal");
//! assert!(MenuConfig::default().validate().is_ok());
//! ```

mod config;
mod error;
mod types;

pub use config::{CategoryRule, MenuConfig, Platform, compile_pattern};
pub use error::{FatalRunError, HeadlightsError, ParseError, Result};
pub use types::*;
