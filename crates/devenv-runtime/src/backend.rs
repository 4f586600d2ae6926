use crate::RuntimeError;
use devenv_store::EngineKind;
use std::path::PathBuf;

/// Mount point of the environment volume inside every container.
pub const WORKSPACE_DIR: &str = "/workspace";
/// Where a configured SSH private key is mounted inside containers.
pub const SSH_KEY_TARGET: &str = "/root/.ssh/id_rsa";

/// A host path bind-mounted into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount {
    pub source: PathBuf,
    pub target: String,
}

impl BindMount {
    pub fn ssh_key(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: SSH_KEY_TARGET.to_owned(),
        }
    }

    /// `-v` argument form: `<source>:<target>`.
    pub fn volume_arg(&self) -> String {
        format!("{}:{}", self.source.display(), self.target)
    }
}

/// One-shot clone of `repo` into the environment volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneSpec {
    pub volume: String,
    pub repo: String,
    /// Clone destination inside the helper container, e.g. `/workspace/<name>`.
    pub dest: String,
    pub ssh_mount: Option<BindMount>,
}

/// A long-running environment container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSpec {
    pub name: String,
    pub image: String,
    pub volume: String,
    pub ssh_mount: Option<BindMount>,
}

/// Editor attach target for a running environment container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachTarget {
    pub name: String,
    pub hash: String,
}

pub trait RuntimeBackend: Send + Sync {
    fn name(&self) -> &str;

    fn create_volume(&self, volume: &str) -> Result<(), RuntimeError>;

    fn remove_volume(&self, volume: &str) -> Result<(), RuntimeError>;

    /// Clone a repository into a volume. Output streams go straight to the
    /// user's terminal so clone progress stays visible.
    fn clone_repo(&self, spec: &CloneSpec) -> Result<(), RuntimeError>;

    fn start(&self, spec: &RuntimeSpec) -> Result<(), RuntimeError>;

    fn stop(&self, name: &str) -> Result<(), RuntimeError>;

    fn attach(&self, target: &AttachTarget) -> Result<(), RuntimeError>;
}

/// Build the backend for the configured engine. An empty `engine_path` means
/// the engine's default binary name resolved from `PATH`.
pub fn select_backend(kind: EngineKind, engine_path: &str) -> Box<dyn RuntimeBackend> {
    match kind {
        EngineKind::Docker => {
            if engine_path.trim().is_empty() {
                Box::new(crate::docker::DockerBackend::new())
            } else {
                Box::new(crate::docker::DockerBackend::with_binary(engine_path))
            }
        }
    }
}
