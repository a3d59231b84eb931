//! Script path canonicalization.
//!
//! Bundles are keyed by path, and the same script shows up spelled
//! differently across listings (`~/.vimrc` in one, `/home/u/.vimrc` in
//! another). Every path goes through [`PathNormalizer::normalize`] before it
//! is used as a key.

use std::path::{Component, Path, PathBuf};

/// Turns raw script paths into canonical bundle keys.
#[derive(Debug, Clone)]
pub struct PathNormalizer {
    home: Option<PathBuf>,
    cwd: Option<PathBuf>,
    resolve_symlinks: bool,
}

impl Default for PathNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PathNormalizer {
    /// Normalizer for the current user and working directory.
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
            cwd: std::env::current_dir().ok(),
            resolve_symlinks: true,
        }
    }

    /// Normalizer with an explicit home directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
            ..Self::new()
        }
    }

    /// Skips the filesystem lookup, normalizing purely lexically.
    pub fn without_symlink_resolution(mut self) -> Self {
        self.resolve_symlinks = false;
        self
    }

    /// Canonical form of `raw`: home shorthand expanded, absolute, symlinks
    /// resolved when the file exists, `.`/`..` folded, lowercased on Windows.
    ///
    /// Idempotent: normalizing a normalized path returns it unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use headlights_menu::path::PathNormalizer;
    ///
    /// let normalizer = PathNormalizer::with_home("/home/u").without_symlink_resolution();
    /// assert_eq!(normalizer.normalize("~/.vim/plugin/../vimrc"), "/home/u/.vim/vimrc");
    /// assert_eq!(normalizer.normalize("/home/u/.vim/vimrc"), "/home/u/.vim/vimrc");
    /// ```
    pub fn normalize(&self, raw: &str) -> String {
        let expanded = self.expand_home(raw.trim());
        let absolute = match (&self.cwd, expanded.is_absolute()) {
            (Some(cwd), false) => cwd.join(&expanded),
            _ => expanded,
        };

        let resolved = if self.resolve_symlinks {
            std::fs::canonicalize(&absolute).unwrap_or_else(|_| lexical_clean(&absolute))
        } else {
            lexical_clean(&absolute)
        };

        let text = resolved.to_string_lossy().into_owned();
        if cfg!(windows) {
            text.to_lowercase()
        } else {
            text
        }
    }

    fn expand_home(&self, raw: &str) -> PathBuf {
        let Some(home) = &self.home else {
            return PathBuf::from(raw);
        };
        if raw == "~" {
            return home.clone();
        }
        match raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
            Some(rest) => home.join(rest),
            None => PathBuf::from(raw),
        }
    }
}

/// Folds `.` and `..` components without touching the filesystem.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !matches!(
                    cleaned.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    cleaned.pop();
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}
