//! Runtime backends for dev-env environments.
//!
//! This crate implements the execution layer: the pluggable `RuntimeBackend`
//! trait, the docker CLI backend that shells out for volume, run, and stop
//! operations, the editor attach locator, and a recording mock backend used by
//! higher-level tests.

pub mod backend;
pub mod docker;
pub mod editor;
pub mod mock;
mod process;

pub use backend::{select_backend, AttachTarget, BindMount, CloneSpec, RuntimeBackend, RuntimeSpec};
pub use docker::DockerBackend;
pub use mock::{Invocation, MockBackend};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },
    #[error("{action}: {detail}")]
    ExecFailed { action: &'static str, detail: String },
}
