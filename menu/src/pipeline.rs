//! Per-run state: the bundle table and the recoverable errors collected
//! while listings are fed through it.

use headlights_core::{MenuConfig, ParseError, RecordKind, Result};
use tracing::{debug, warn};

use crate::aggregate::BundleTable;
use crate::categorize::ScriptClassifier;
use crate::parser::{parse_listing, parse_scriptnames, parser_for};
use crate::path::PathNormalizer;

/// Everything one run accumulates. Built fresh for every run and consumed
/// at the end, so nothing leaks between runs.
#[derive(Debug)]
pub struct RunContext {
    table: BundleTable,
    errors: Vec<ParseError>,
}

impl RunContext {
    pub fn new(
        config: &MenuConfig,
        normalizer: PathNormalizer,
        classifier: ScriptClassifier,
    ) -> Result<Self> {
        Ok(Self {
            table: BundleTable::new(config, normalizer, classifier)?,
            errors: Vec::new(),
        })
    }

    /// Creates one bundle per script listing entry. Returns the number of
    /// entries recognized, duplicates included.
    pub fn load_scriptnames(&mut self, text: &str) -> usize {
        let mut recognized = 0;
        for entry in parse_scriptnames(text) {
            match entry {
                Ok(entry) => {
                    recognized += 1;
                    self.table.insert_script(&entry.path, entry.order);
                }
                Err(err) => {
                    debug!(error = %err, "script listing line rejected");
                    self.errors.push(err);
                }
            }
        }
        recognized
    }

    /// Parses one category listing and attributes its records.
    pub fn load_block(&mut self, kind: RecordKind, text: &str) {
        let Some(parser) = parser_for(kind) else {
            warn!(%kind, "listing kind has no record parser, ignored");
            return;
        };

        let mut attributed = 0usize;
        for entry in parse_listing(parser, text) {
            let parsed = match entry {
                Ok(parsed) => parsed,
                Err(err) => {
                    debug!(error = %err, "listing line rejected");
                    self.errors.push(err);
                    continue;
                }
            };

            match self.table.attribute(kind, &parsed.line, &parsed.attribution) {
                Ok(bundle) => {
                    attributed += parsed.records.len();
                    for record in parsed.records {
                        bundle.push(record);
                    }
                }
                Err(err) => {
                    debug!(error = %err, "record dropped");
                    self.errors.push(err);
                }
            }
        }
        debug!(%kind, attributed, "listing attributed");
    }

    pub fn table(&self) -> &BundleTable {
        &self.table
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_parts(self) -> (BundleTable, Vec<ParseError>) {
        (self.table, self.errors)
    }
}
