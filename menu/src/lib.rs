//! Menu generation from editor introspection listings.
//!
//! This crate turns the text the host editor prints when asked what it has
//! loaded (script listing, commands, mappings, abbreviations, functions,
//! highlight groups) into `amenu` commands that build a browsable menu of
//! every loaded script and what it defines.
//!
//! A run goes through four stages:
//!
//! 1. [`parser`] recovers records from each listing, one explicit result
//!    per line;
//! 2. [`aggregate`] attributes every record to the script named on the
//!    line right after it;
//! 3. [`categorize`] puts every bundle into one top-level bucket;
//! 4. [`render`] produces the sorted menu lines.
//!
//! # Main entry points
//!
//! - [`build_menus`] — run all stages on captured listings.
//! - [`build_menus_with`] — same, with an explicit [`PathNormalizer`].
//!
//! # Example
//!
//! ```
//! use headlights_core::{MenuConfig, RecordKind};
//! use headlights_menu::{IntrospectionInput, build_menus};
//!
//! let input = IntrospectionInput::new("  1: /home/u/.vimrc")
//!     .with_block(RecordKind::Commands, "\
//!     Name              Args Address Complete    Definition
//!     Foo               0    .       file        :echo 1
//! \tLast set from /home/u/.vimrc");
//!
//! let config = MenuConfig { show_files: false, ..MenuConfig::default() };
//! let run = build_menus(&input, &config).unwrap();
//! assert!(run.errors.is_empty());
//! assert!(run
//!     .menus
//!     .iter()
//!     .any(|menu| menu.ends_with(".vimrc.Foo<Tab>:echo\\ 1 :Foo<CR>")));
//! ```
//!
//! [`PathNormalizer`]: path::PathNormalizer

pub mod aggregate;
pub mod categorize;
pub mod output;
pub mod parser;
pub mod path;
pub mod pipeline;
pub mod render;
pub mod report;

use std::collections::BTreeMap;

use headlights_core::{FatalRunError, HeadlightsError, MenuConfig, ParseError, RecordKind};
use tracing::{info, warn};

use categorize::Categorizer;
use path::PathNormalizer;
use pipeline::RunContext;
use render::MenuRenderer;
use report::{CategorizedBundle, InspectReport};

/// The raw listings of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntrospectionInput {
    /// The script listing (`<index>: <path>` lines).
    pub scriptnames: String,
    /// Category listings; absent kinds are simply not processed.
    pub blocks: BTreeMap<RecordKind, String>,
}

impl IntrospectionInput {
    pub fn new(scriptnames: impl Into<String>) -> Self {
        Self {
            scriptnames: scriptnames.into(),
            blocks: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) the listing of one category.
    pub fn with_block(mut self, kind: RecordKind, text: impl Into<String>) -> Self {
        self.blocks.insert(kind, text.into());
        self
    }
}

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct MenuRun {
    /// Sorted, de-duplicated menu lines.
    pub menus: Vec<String>,
    /// Recoverable errors, in the order they were found.
    pub errors: Vec<ParseError>,
    /// Every bundle with its bucket, in path order.
    pub bundles: Vec<CategorizedBundle>,
}

impl MenuRun {
    pub fn report(&self) -> InspectReport {
        InspectReport::new(&self.bundles, &self.errors)
    }
}

/// Runs every stage on `input` with the process's home and working
/// directories.
///
/// # Errors
///
/// Returns a [`FatalRunError`] when the configuration is invalid or the
/// script listing yields no script. Malformed or unattributable record
/// lines never fail the run; they are collected in [`MenuRun::errors`].
pub fn build_menus(input: &IntrospectionInput, config: &MenuConfig) -> Result<MenuRun, FatalRunError> {
    build_menus_with(input, config, PathNormalizer::new())
}

/// [`build_menus`] with an explicit path normalizer.
pub fn build_menus_with(
    input: &IntrospectionInput,
    config: &MenuConfig,
    normalizer: PathNormalizer,
) -> Result<MenuRun, FatalRunError> {
    let fatal = |cause: HeadlightsError| FatalRunError::new(cause, Vec::new());

    config.validate().map_err(fatal)?;
    let categorizer = Categorizer::from_config(config).map_err(fatal)?;
    let mut context =
        RunContext::new(config, normalizer, categorizer.classifier().clone()).map_err(fatal)?;

    if context.load_scriptnames(&input.scriptnames) == 0 {
        let (_, errors) = context.into_parts();
        return Err(FatalRunError::new(HeadlightsError::NoScripts, errors));
    }
    for (kind, text) in &input.blocks {
        if *kind == RecordKind::Scripts {
            warn!("script listing passed as a category block, ignored");
            continue;
        }
        context.load_block(*kind, text);
    }
    let (table, errors) = context.into_parts();

    let menus = MenuRenderer::new(config, &categorizer).render(table.iter());
    let bundles: Vec<CategorizedBundle> = table
        .into_bundles()
        .into_iter()
        .map(|bundle| CategorizedBundle {
            bucket: categorizer.categorize(&bundle).to_string(),
            bundle,
        })
        .collect();

    info!(
        bundles = bundles.len(),
        menus = menus.len(),
        errors = errors.len(),
        "menus built"
    );
    Ok(MenuRun {
        menus,
        errors,
        bundles,
    })
}
