use crate::StoreError;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config directory (default `~/.dev-env`).
pub const CONFIG_DIR_ENV: &str = "DEV_ENV_DIR";
pub const CONFIG_FILE: &str = "config.json";
const DEFAULT_DIR_NAME: &str = ".dev-env";

/// Directory layout for dev-env's persistent state.
///
/// Everything lives in a single directory holding `config.json`. The
/// directory is created lazily on [`initialize`](Self::initialize).
#[derive(Debug, Clone)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the per-user layout: `$DEV_ENV_DIR` if set, else `$HOME/.dev-env`.
    pub fn user_default() -> Result<Self, StoreError> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(Self::new(expand_tilde(&dir)));
            }
        }
        let home = std::env::var("HOME")
            .map_err(|_| StoreError::NoConfigDir("HOME not set".to_owned()))?;
        Ok(Self::new(PathBuf::from(home).join(DEFAULT_DIR_NAME)))
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        if !self.root.is_dir() {
            tracing::debug!("creating config directory {}", self.root.display());
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}

/// Expand a leading `~/` against `$HOME`. Other paths are returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths_are_correct() {
        let layout = StoreLayout::new("/tmp/dev-env-test");
        assert_eq!(layout.root(), Path::new("/tmp/dev-env-test"));
        assert_eq!(
            layout.config_file(),
            PathBuf::from("/tmp/dev-env-test/config.json")
        );
    }

    #[test]
    fn initialize_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StoreLayout::new(dir.path().join("nested").join(".dev-env"));
        layout.initialize().unwrap();
        assert!(layout.root().is_dir());
    }

    #[test]
    fn initialize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StoreLayout::new(dir.path().join(".dev-env"));
        layout.initialize().unwrap();
        layout.initialize().unwrap();
        assert!(layout.root().is_dir());
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/etc/ssh"), PathBuf::from("/etc/ssh"));
    }

    #[test]
    fn expand_tilde_expands_home_prefix() {
        let expanded = expand_tilde("~/.ssh");
        if std::env::var("HOME").is_ok() {
            assert!(!expanded.starts_with("~"));
            assert!(expanded.ends_with(".ssh"));
        }
    }
}
