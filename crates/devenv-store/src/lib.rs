//! Persistent state for dev-env: the JSON config document and its environment registry.
//!
//! This crate provides the storage layer: `StoreLayout` for locating the config
//! directory, `ConfigStore` for loading and atomically saving the `Config`
//! document, and the `Environment` record kept in the `envs` registry together
//! with name validation and the derived attach hash.

pub mod config;
pub mod layout;
pub mod metadata;

pub use config::{Config, ConfigStore, EngineKind};
pub use layout::{expand_tilde, StoreLayout, CONFIG_DIR_ENV, CONFIG_FILE};
pub use metadata::{env_hash, validate_env_name, Environment};

use std::path::Path;
use thiserror::Error;

/// Fsync a directory so that a preceding `rename()` is durable.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file {path}: {source}")]
    InvalidConfig {
        path: String,
        source: serde_json::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("environment '{0}' not found")]
    EnvNotFound(String),
    #[error("invalid environment name: {0}")]
    InvalidName(String),
    #[error("cannot locate config directory: {0}")]
    NoConfigDir(String),
}
