//! Menu generation settings.
//!
//! [`MenuConfig`] is the single configuration surface of a run. It is
//! YAML-serializable and every field has a default, so a config file only
//! needs to name the settings it changes.
//!
//! # Example YAML
//!
//! ```yaml
//! menu_root: Plugins
//! show_files: false
//! smart_menus: true
//! truncation_limit: 40
//! categories:
//!   - pattern: "(?i)^[a-m]"
//!     label: a-m
//!   - pattern: "(?i)^[n-z]"
//!     label: n-z
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{HeadlightsError, Result};

/// Host platform, which decides how file items open and reveal paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }

    /// Command prefix that opens a file in the editor.
    pub fn open_command(self) -> &'static str {
        match self {
            Self::MacOs => "!open -a MacVim",
            Self::Windows => "!start gvim.exe",
            Self::Linux | Self::Other => "edit",
        }
    }

    /// Command prefix that reveals a directory in the system file browser,
    /// when the platform has one.
    pub fn reveal_command(self) -> Option<&'static str> {
        match self {
            Self::MacOs => Some("!open"),
            Self::Windows => Some("!start"),
            Self::Linux => Some("!xdg-open"),
            Self::Other => None,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// One ordered categorization rule: bundles whose display name matches
/// `pattern` go to the `label` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub label: String,
}

impl CategoryRule {
    pub fn new(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
        }
    }
}

/// All settings of one menu generation run.
///
/// # Examples
///
/// ```
/// use headlights_core::MenuConfig;
///
/// let config: MenuConfig = serde_yaml::from_str("menu_root: Plugins\nsmart_menus: true\n").unwrap();
/// assert_eq!(config.menu_root, "Plugins");
/// assert!(config.smart_menus);
/// assert_eq!(config.truncation_limit, 30);
/// assert_eq!(config.default_category, "other");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Label of the top-level menu.
    pub menu_root: String,
    /// Render a Files section per bundle.
    pub show_files: bool,
    /// Render each bundle's load-order index in its Help section.
    pub show_load_order: bool,
    /// Group sibling scripts of one plugin under a single menu.
    pub smart_menus: bool,
    /// Collect a debug log and attach the debug menu.
    pub debug_mode: bool,
    /// Maximum characters of a file path or abbreviation label.
    pub truncation_limit: usize,
    /// Ordered categorization rules; first match wins.
    pub categories: Vec<CategoryRule>,
    /// Bucket for bundles no rule matches.
    pub default_category: String,
    /// File-name patterns of config/rc scripts.
    pub config_patterns: Vec<String>,
    /// Path pattern of the host's runtime tree.
    pub runtime_pattern: String,
    /// Conventional plugin subdirectory names walked over to find a plugin root.
    pub framework_dirs: Vec<String>,
    /// Patterns of directory names that end a plugin-root walk without
    /// merging (shared user or runtime directories).
    pub merge_stop_patterns: Vec<String>,
    /// Prefixes stripped from display names (`vim-`).
    pub decorative_prefixes: Vec<String>,
    /// Suffixes stripped from display names (`.vim`).
    pub decorative_suffixes: Vec<String>,
    /// Create a bundle for attribution paths missing from the script listing
    /// instead of dropping the record.
    pub lazy_bundles: bool,
    pub platform: Platform,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            menu_root: "Bundles".to_string(),
            show_files: true,
            show_load_order: false,
            smart_menus: false,
            debug_mode: false,
            truncation_limit: 30,
            categories: vec![
                CategoryRule::new(r"^\d", "0-9"),
                CategoryRule::new(r"(?i)^[a-i]", "a-i"),
                CategoryRule::new(r"(?i)^[j-r]", "j-r"),
                CategoryRule::new(r"(?i)^[s-z]", "s-z"),
            ],
            default_category: "other".to_string(),
            config_patterns: vec![
                r"(?i)^[._]?g?vimrc$".to_string(),
                r"(?i)^[._]?exrc$".to_string(),
                r"(?i)^g?init\.(vim|lua)$".to_string(),
            ],
            runtime_pattern: r"(?i)[/\\]runtime[/\\]".to_string(),
            framework_dirs: [
                "plugin", "autoload", "ftplugin", "ftdetect", "syntax", "indent", "after",
                "colors", "compiler", "keymap", "lua", "doc",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            merge_stop_patterns: [
                r"^\.vim$", r"^vimfiles$", r"^nvim$", r"^site$", r"^\.config$", r"^vim\d+$",
                r"^runtime$",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            decorative_prefixes: vec!["vim-".to_string(), "vim_".to_string()],
            decorative_suffixes: vec![
                "-vim".to_string(),
                "_vim".to_string(),
                ".vim".to_string(),
            ],
            lazy_bundles: false,
            platform: Platform::current(),
        }
    }
}

impl MenuConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](HeadlightsError::Io) if the file cannot be read, or
    /// [`Yaml`](HeadlightsError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks the settings a run cannot recover from.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfig`](HeadlightsError::InvalidConfig) for an
    /// empty root label, a zero truncation limit or an empty bucket label,
    /// and [`InvalidPattern`](HeadlightsError::InvalidPattern) for the first
    /// pattern that does not compile.
    pub fn validate(&self) -> Result<()> {
        if self.menu_root.trim().is_empty() {
            return Err(HeadlightsError::InvalidConfig(
                "menu_root must not be empty".to_string(),
            ));
        }
        if self.truncation_limit == 0 {
            return Err(HeadlightsError::InvalidConfig(
                "truncation_limit must be at least 1".to_string(),
            ));
        }
        if self.default_category.trim().is_empty() {
            return Err(HeadlightsError::InvalidConfig(
                "default_category must not be empty".to_string(),
            ));
        }
        for rule in &self.categories {
            if rule.label.trim().is_empty() {
                return Err(HeadlightsError::InvalidConfig(format!(
                    "category rule '{}' has an empty label",
                    rule.pattern
                )));
            }
            compile_pattern(&rule.pattern)?;
        }
        for pattern in self.config_patterns.iter().chain(&self.merge_stop_patterns) {
            compile_pattern(pattern)?;
        }
        compile_pattern(&self.runtime_pattern)?;
        Ok(())
    }
}

/// Compiles a user-supplied pattern, keeping the pattern text in the error.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| HeadlightsError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
menu_root: Plugins
show_files: false
show_load_order: true
smart_menus: true
truncation_limit: 12
categories:
  - pattern: "(?i)^[a-m]"
    label: a-m
  - pattern: "(?i)^[n-z]"
    label: n-z
default_category: misc
platform: linux
"#
    }

    #[test]
    fn test_deserialize_partial_keeps_defaults() {
        let config: MenuConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.menu_root, "Plugins");
        assert!(!config.show_files);
        assert!(config.show_load_order);
        assert!(config.smart_menus);
        assert_eq!(config.truncation_limit, 12);
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[1].label, "n-z");
        assert_eq!(config.default_category, "misc");
        assert_eq!(config.platform, Platform::Linux);
        // untouched fields fall back to defaults
        assert_eq!(config.framework_dirs, MenuConfig::default().framework_dirs);
        assert!(!config.lazy_bundles);
    }

    #[test]
    fn test_default_validates() {
        assert!(MenuConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_truncation() {
        let config = MenuConfig {
            truncation_limit: 0,
            ..MenuConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HeadlightsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let mut config = MenuConfig::default();
        config.categories.push(CategoryRule::new("(unclosed", "broken"));
        match config.validate() {
            Err(HeadlightsError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_empty_root() {
        let config = MenuConfig {
            menu_root: "  ".to_string(),
            ..MenuConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_platform_commands() {
        assert_eq!(Platform::MacOs.open_command(), "!open -a MacVim");
        assert_eq!(Platform::Windows.reveal_command(), Some("!start"));
        assert_eq!(Platform::Linux.open_command(), "edit");
        assert_eq!(Platform::Other.reveal_command(), None);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headlights.yml");

        let saved: MenuConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        saved.save(&path).unwrap();

        let loaded = MenuConfig::load(&path).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_reports_yaml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headlights.yml");
        std::fs::write(&path, "menu_root: [unclosed\n").unwrap();

        assert!(matches!(
            MenuConfig::load(&path),
            Err(HeadlightsError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = MenuConfig::load(dir.path().join("absent.yml"));
        assert!(matches!(missing, Err(HeadlightsError::Io(_))));
    }
}
