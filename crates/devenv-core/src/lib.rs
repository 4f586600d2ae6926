//! Core orchestration engine for dev-env environment lifecycle.
//!
//! This crate ties the config registry to a runtime backend: the `Engine`
//! creates, starts, attaches to, stops, and removes named environments,
//! keeping the in-memory registry consistent with what the backend did.

pub mod engine;

pub use engine::{Engine, NewEnv, DEFAULT_IMAGE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("store error: {0}")]
    Store(#[from] devenv_store::StoreError),
    #[error("runtime error: {0}")]
    Runtime(#[from] devenv_runtime::RuntimeError),
    #[error("environment '{0}' not found")]
    EnvNotFound(String),
    #[error("invalid environment name: {0}")]
    InvalidName(String),
    #[error("environment '{0}' already exists")]
    AlreadyExists(String),
    #[error("please run config first")]
    NotConfigured,
    #[error("ssh key not found: {0}")]
    SshKeyNotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
