//! Bucket assignment ("spillover").
//!
//! A bundle goes to exactly one top-level bucket. The checks run in a fixed
//! order and the first hit wins:
//!
//! 1. config/rc script ([`CONFIG_BUCKET`]);
//! 2. buffer-local bundle ([`BUFFER_BUCKET`]);
//! 3. script from the host's runtime tree ([`RUNTIME_BUCKET`]);
//! 4. the configured name rules, in order;
//! 5. the default bucket.
//!
//! The special buckets start with U+2063 (invisible separator), which sorts
//! after every letter and digit, so they end up below the alphabetic
//! buckets in the rendered menu.

use headlights_core::{Bundle, MenuConfig, Result, compile_pattern};
use regex::Regex;

/// Bucket of config/rc scripts.
pub const CONFIG_BUCKET: &str = "\u{2063}vimrc";
/// Bucket of bundles that define buffer-local commands or mappings.
pub const BUFFER_BUCKET: &str = "\u{2063}\u{2063}buffer";
/// Bucket of scripts shipped with the host.
pub const RUNTIME_BUCKET: &str = "\u{2063}runtime";

/// Last component of a path, for either separator style.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Recognizes config/rc scripts and runtime-tree scripts by path.
#[derive(Debug, Clone)]
pub struct ScriptClassifier {
    config: Vec<Regex>,
    runtime: Regex,
}

impl ScriptClassifier {
    pub fn from_config(config: &MenuConfig) -> Result<Self> {
        Ok(Self {
            config: config
                .config_patterns
                .iter()
                .map(|pattern| compile_pattern(pattern))
                .collect::<Result<_>>()?,
            runtime: compile_pattern(&config.runtime_pattern)?,
        })
    }

    /// Whether the script's file name is a config/rc name.
    ///
    /// # Examples
    ///
    /// ```
    /// use headlights_core::MenuConfig;
    /// use headlights_menu::categorize::ScriptClassifier;
    ///
    /// let classifier = ScriptClassifier::from_config(&MenuConfig::default()).unwrap();
    /// assert!(classifier.is_config("/home/u/.vimrc"));
    /// assert!(classifier.is_config("C:\\Users\\u\\_gvimrc"));
    /// assert!(classifier.is_config("/home/u/.config/nvim/init.lua"));
    /// assert!(!classifier.is_config("/home/u/.vim/plugin/vimrc_helper.vim"));
    /// ```
    pub fn is_config(&self, path: &str) -> bool {
        let name = file_name(path);
        self.config.iter().any(|pattern| pattern.is_match(name))
    }

    /// Whether the script lives in the host's runtime tree.
    pub fn is_runtime(&self, path: &str) -> bool {
        self.runtime.is_match(path)
    }
}

/// Assigns bundles to buckets.
#[derive(Debug, Clone)]
pub struct Categorizer {
    classifier: ScriptClassifier,
    rules: Vec<(Regex, String)>,
    default_category: String,
}

impl Categorizer {
    /// Compiles the bucket rules of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPattern`](headlights_core::HeadlightsError::InvalidPattern)
    /// for the first rule that does not compile.
    pub fn from_config(config: &MenuConfig) -> Result<Self> {
        let rules = config
            .categories
            .iter()
            .map(|rule| -> Result<(Regex, String)> {
                Ok((compile_pattern(&rule.pattern)?, rule.label.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            classifier: ScriptClassifier::from_config(config)?,
            rules,
            default_category: config.default_category.clone(),
        })
    }

    pub fn classifier(&self) -> &ScriptClassifier {
        &self.classifier
    }

    /// Returns the bucket label of `bundle`.
    ///
    /// # Examples
    ///
    /// ```
    /// use headlights_core::{Bundle, MenuConfig};
    /// use headlights_menu::categorize::Categorizer;
    ///
    /// let categorizer = Categorizer::from_config(&MenuConfig::default()).unwrap();
    /// let bundle = Bundle::new("/home/u/.vim/plugin/Zebra.vim", "Zebra", 4);
    /// assert_eq!(categorizer.categorize(&bundle), "s-z");
    /// ```
    pub fn categorize(&self, bundle: &Bundle) -> &str {
        if self.classifier.is_config(&bundle.path) {
            return CONFIG_BUCKET;
        }
        if bundle.is_buffer_local {
            return BUFFER_BUCKET;
        }
        if self.classifier.is_runtime(&bundle.path) {
            return RUNTIME_BUCKET;
        }

        let name = bundle.name.trim_start_matches('.');
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(name))
            .map(|(_, label)| label.as_str())
            .unwrap_or(&self.default_category)
    }
}
