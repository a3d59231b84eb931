//! Bundle table: script listing entries and record attribution.
//!
//! Every bundle is keyed by its normalized script path. Records reach a
//! bundle only through [`BundleTable::attribute`], which resolves the source
//! line found right after the record; a record whose owner cannot be
//! resolved is reported and dropped, never attached somewhere else.
//!
//! With smart menus enabled, scripts living in conventional plugin
//! subdirectories (`plugin/`, `autoload/`, ...) of one plugin root share a
//! display name, so they render as one menu.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use headlights_core::{Bundle, MenuConfig, ParseError, RecordKind, Result, compile_pattern};
use regex::Regex;
use tracing::{debug, warn};

use crate::categorize::{ScriptClassifier, file_name};
use crate::parser::Attribution;
use crate::path::PathNormalizer;

/// Display name of a script: its file stem, with one decorative prefix and
/// one decorative suffix removed when something is left afterwards.
///
/// # Examples
///
/// ```
/// use headlights_menu::aggregate::display_name;
///
/// let prefixes = ["vim-".to_string()];
/// let suffixes = ["-vim".to_string()];
/// assert_eq!(display_name("/b/vim-airline.vim", &prefixes, &suffixes), "airline");
/// assert_eq!(display_name("/b/ctrlp-vim.vim", &prefixes, &suffixes), "ctrlp");
/// assert_eq!(display_name("/home/u/.vimrc", &prefixes, &suffixes), ".vimrc");
/// assert_eq!(display_name("/b/vim-.vim", &prefixes, &suffixes), "vim-");
/// ```
pub fn display_name(path: &str, prefixes: &[String], suffixes: &[String]) -> String {
    let name = file_name(path);
    let mut stem = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };

    if let Some(rest) = prefixes
        .iter()
        .find_map(|prefix| stem.strip_prefix(prefix.as_str()))
        .filter(|rest| !rest.is_empty())
    {
        stem = rest;
    }
    if let Some(rest) = suffixes
        .iter()
        .find_map(|suffix| stem.strip_suffix(suffix.as_str()))
        .filter(|rest| !rest.is_empty())
    {
        stem = rest;
    }
    stem.to_string()
}

/// All bundles of one run, keyed by normalized path.
#[derive(Debug)]
pub struct BundleTable {
    bundles: BTreeMap<String, Bundle>,
    /// Plugin root → display name of the first bundle seen under it.
    roots: HashMap<String, String>,
    normalizer: PathNormalizer,
    classifier: ScriptClassifier,
    smart_menus: bool,
    lazy_bundles: bool,
    framework_dirs: Vec<String>,
    merge_stop: Vec<Regex>,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl BundleTable {
    /// Creates an empty table for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPattern`](headlights_core::HeadlightsError::InvalidPattern)
    /// when a merge stop pattern does not compile.
    pub fn new(
        config: &MenuConfig,
        normalizer: PathNormalizer,
        classifier: ScriptClassifier,
    ) -> Result<Self> {
        let merge_stop = config
            .merge_stop_patterns
            .iter()
            .map(|pattern| compile_pattern(pattern))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bundles: BTreeMap::new(),
            roots: HashMap::new(),
            normalizer,
            classifier,
            smart_menus: config.smart_menus,
            lazy_bundles: config.lazy_bundles,
            framework_dirs: config.framework_dirs.clone(),
            merge_stop,
            prefixes: config.decorative_prefixes.clone(),
            suffixes: config.decorative_suffixes.clone(),
        })
    }

    /// Creates the bundle of one script listing entry.
    ///
    /// Returns `false` when the path already has a bundle; the first entry
    /// is kept.
    pub fn insert_script(&mut self, raw_path: &str, order: usize) -> bool {
        let path = self.normalizer.normalize(raw_path);
        if let Some(existing) = self.bundles.get(&path) {
            warn!(
                path = path.as_str(),
                order,
                kept = existing.order,
                "duplicate script entry, keeping the first"
            );
            return false;
        }
        self.insert_normalized(path, order);
        true
    }

    fn insert_normalized(&mut self, path: String, order: usize) {
        let mut bundle = Bundle::new(&path, &display_name(&path, &self.prefixes, &self.suffixes), order);

        if self.smart_menus
            && !self.classifier.is_config(&path)
            && !self.classifier.is_runtime(&path)
        {
            if let Some(root) = self.plugin_root(&path) {
                match self.roots.get(&root) {
                    Some(name) => {
                        debug!(
                            path = path.as_str(),
                            root = root.as_str(),
                            name = name.as_str(),
                            "merged script into plugin menu"
                        );
                        bundle.name = name.clone();
                    }
                    None => {
                        self.roots.insert(root.clone(), bundle.name.clone());
                    }
                }
                bundle.root = Some(root);
            }
        }

        self.bundles.insert(path, bundle);
    }

    /// Plugin root of a script: walk up from its directory while the
    /// directory is a framework directory. At least one step is required,
    /// and a root matching a stop pattern is a shared directory, not a
    /// plugin.
    fn plugin_root(&self, path: &str) -> Option<String> {
        let is_framework = |dir: &Path| {
            dir.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| self.framework_dirs.iter().any(|f| f == name))
        };

        let mut dir = Path::new(path).parent()?;
        let mut steps = 0usize;
        while is_framework(dir) {
            dir = dir.parent()?;
            steps += 1;
        }
        if steps == 0 {
            return None;
        }

        let name = dir.file_name()?.to_str()?;
        if self.merge_stop.iter().any(|pattern| pattern.is_match(name)) {
            return None;
        }
        Some(dir.to_string_lossy().into_owned())
    }

    /// Resolves the owner of a parsed record line.
    ///
    /// # Errors
    ///
    /// - [`ParseError::AttributionMissing`] when the listing ended after
    ///   the record;
    /// - [`ParseError::BundleNotInitialized`] when the next line is not a
    ///   source line, or names a script without a bundle (unless lazy
    ///   bundles are enabled, in which case one is created).
    pub fn attribute(
        &mut self,
        kind: RecordKind,
        record_line: &str,
        attribution: &Attribution,
    ) -> std::result::Result<&mut Bundle, ParseError> {
        let raw = match attribution {
            Attribution::Source(raw) => raw,
            Attribution::Missing => {
                return Err(ParseError::AttributionMissing {
                    kind,
                    line: record_line.to_string(),
                });
            }
            Attribution::NotSource(_) => {
                return Err(ParseError::BundleNotInitialized {
                    kind,
                    line: record_line.to_string(),
                    path: None,
                });
            }
        };

        let path = self.normalizer.normalize(raw);
        if !self.bundles.contains_key(&path) {
            if !self.lazy_bundles {
                return Err(ParseError::BundleNotInitialized {
                    kind,
                    line: record_line.to_string(),
                    path: Some(path),
                });
            }
            let order = self.next_order();
            debug!(path = path.as_str(), order, "created bundle for unlisted script");
            self.insert_normalized(path.clone(), order);
        }

        self.bundles
            .get_mut(&path)
            .ok_or_else(|| ParseError::BundleNotInitialized {
                kind,
                line: record_line.to_string(),
                path: Some(path.clone()),
            })
    }

    fn next_order(&self) -> usize {
        self.bundles.values().map(|b| b.order).max().unwrap_or(0) + 1
    }

    pub fn get(&self, path: &str) -> Option<&Bundle> {
        self.bundles.get(path)
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Bundles in path order.
    pub fn iter(&self) -> impl Iterator<Item = &Bundle> {
        self.bundles.values()
    }

    pub fn into_bundles(self) -> Vec<Bundle> {
        self.bundles.into_values().collect()
    }
}
