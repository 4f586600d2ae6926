use crate::backend::{AttachTarget, CloneSpec, RuntimeBackend, RuntimeSpec, WORKSPACE_DIR};
use crate::editor::{attach_arg, resolve_editor};
use crate::process::{run, Streams};
use crate::RuntimeError;

const DEFAULT_BINARY: &str = "docker";
/// Helper image whose entrypoint is `git`.
pub const GIT_IMAGE: &str = "local/git";
/// Shared package-store volume mounted into every environment.
pub const PNPM_VOLUME: &str = "pnpm";
pub const PNPM_STORE_DIR: &str = "/root/.local/share/pnpm/store";
pub const PUBLISHED_PORT: &str = "8080:8080";

/// Backend driving the docker command-line client.
pub struct DockerBackend {
    binary: String,
    editor: String,
}

impl Default for DockerBackend {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_owned(),
            editor: resolve_editor(),
        }
    }
}

impl DockerBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::default()
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn volume_create_args(volume: &str) -> Vec<String> {
        vec!["volume".into(), "create".into(), volume.to_owned()]
    }

    pub fn volume_rm_args(volume: &str) -> Vec<String> {
        vec!["volume".into(), "rm".into(), volume.to_owned()]
    }

    pub fn clone_args(spec: &CloneSpec) -> Vec<String> {
        let mut args = vec![
            "run".to_owned(),
            "--rm".to_owned(),
            "-v".to_owned(),
            format!("{}:{WORKSPACE_DIR}", spec.volume),
        ];
        if let Some(mount) = &spec.ssh_mount {
            args.push("-v".to_owned());
            args.push(mount.volume_arg());
        }
        args.extend([
            GIT_IMAGE.to_owned(),
            "clone".to_owned(),
            spec.repo.clone(),
            spec.dest.clone(),
        ]);
        args
    }

    pub fn run_args(spec: &RuntimeSpec) -> Vec<String> {
        let mut args = vec![
            "run".to_owned(),
            "-d".to_owned(),
            "--rm".to_owned(),
            "--name".to_owned(),
            spec.name.clone(),
            "-p".to_owned(),
            PUBLISHED_PORT.to_owned(),
            "-v".to_owned(),
            format!("{PNPM_VOLUME}:{PNPM_STORE_DIR}"),
            "-v".to_owned(),
            format!("{}:{WORKSPACE_DIR}", spec.volume),
            "-w".to_owned(),
            WORKSPACE_DIR.to_owned(),
        ];
        if let Some(mount) = &spec.ssh_mount {
            args.push("-v".to_owned());
            args.push(mount.volume_arg());
        }
        args.push(spec.image.clone());
        args
    }

    pub fn stop_args(name: &str) -> Vec<String> {
        vec!["stop".into(), name.to_owned()]
    }
}

impl RuntimeBackend for DockerBackend {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn create_volume(&self, volume: &str) -> Result<(), RuntimeError> {
        run(
            &self.binary,
            &Self::volume_create_args(volume),
            Streams::Captured,
            "failed to create volume",
        )
    }

    fn remove_volume(&self, volume: &str) -> Result<(), RuntimeError> {
        run(
            &self.binary,
            &Self::volume_rm_args(volume),
            Streams::Captured,
            "failed to remove volume",
        )
    }

    fn clone_repo(&self, spec: &CloneSpec) -> Result<(), RuntimeError> {
        run(
            &self.binary,
            &Self::clone_args(spec),
            Streams::Inherited,
            "failed to clone repo",
        )
    }

    fn start(&self, spec: &RuntimeSpec) -> Result<(), RuntimeError> {
        run(
            &self.binary,
            &Self::run_args(spec),
            Streams::Captured,
            "failed to start env",
        )
    }

    fn stop(&self, name: &str) -> Result<(), RuntimeError> {
        run(
            &self.binary,
            &Self::stop_args(name),
            Streams::Captured,
            "failed to stop env",
        )
    }

    fn attach(&self, target: &AttachTarget) -> Result<(), RuntimeError> {
        run(
            &self.editor,
            &[attach_arg(target)],
            Streams::Captured,
            "failed to open editor",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BindMount;

    #[test]
    fn volume_args() {
        assert_eq!(
            DockerBackend::volume_create_args("web"),
            ["volume", "create", "web"]
        );
        assert_eq!(DockerBackend::volume_rm_args("web"), ["volume", "rm", "web"]);
        assert_eq!(DockerBackend::stop_args("web"), ["stop", "web"]);
    }

    #[test]
    fn clone_args_without_key() {
        let spec = CloneSpec {
            volume: "web".to_owned(),
            repo: "https://example.com/web.git".to_owned(),
            dest: "/workspace/web".to_owned(),
            ssh_mount: None,
        };
        assert_eq!(
            DockerBackend::clone_args(&spec),
            [
                "run",
                "--rm",
                "-v",
                "web:/workspace",
                "local/git",
                "clone",
                "https://example.com/web.git",
                "/workspace/web",
            ]
        );
    }

    #[test]
    fn clone_args_mount_key_before_image() {
        let spec = CloneSpec {
            volume: "web".to_owned(),
            repo: "git@example.com:web.git".to_owned(),
            dest: "/workspace/web".to_owned(),
            ssh_mount: Some(BindMount::ssh_key("/keys/id_rsa")),
        };
        let args = DockerBackend::clone_args(&spec);
        let key = args
            .iter()
            .position(|a| a == "/keys/id_rsa:/root/.ssh/id_rsa")
            .unwrap();
        let image = args.iter().position(|a| a == GIT_IMAGE).unwrap();
        assert_eq!(args[key - 1], "-v");
        assert!(key < image);
    }

    #[test]
    fn run_args_layout() {
        let spec = RuntimeSpec {
            name: "web".to_owned(),
            image: "local/node".to_owned(),
            volume: "web".to_owned(),
            ssh_mount: None,
        };
        let args = DockerBackend::run_args(&spec);
        assert_eq!(&args[..5], ["run", "-d", "--rm", "--name", "web"]);
        assert!(args.windows(2).any(|w| w == ["-p", "8080:8080"]));
        assert!(args
            .windows(2)
            .any(|w| w[0] == "-v" && w[1].starts_with("pnpm:")));
        assert!(args.windows(2).any(|w| w == ["-v", "web:/workspace"]));
        assert!(args.windows(2).any(|w| w == ["-w", "/workspace"]));
        assert_eq!(args.last().map(String::as_str), Some("local/node"));
    }

    #[test]
    fn run_args_include_ssh_mount() {
        let spec = RuntimeSpec {
            name: "web".to_owned(),
            image: "img".to_owned(),
            volume: "web".to_owned(),
            ssh_mount: Some(BindMount::ssh_key("/keys/k")),
        };
        let args = DockerBackend::run_args(&spec);
        assert!(args.windows(2).any(|w| w == ["-v", "/keys/k:/root/.ssh/id_rsa"]));
        assert_eq!(args.last().map(String::as_str), Some("img"));
    }

    #[test]
    fn custom_binary_is_kept() {
        assert_eq!(DockerBackend::with_binary("/opt/docker").binary(), "/opt/docker");
        assert_eq!(DockerBackend::new().binary(), "docker");
    }

    #[cfg(unix)]
    #[test]
    fn failing_binary_surfaces_action() {
        let backend = DockerBackend::with_binary("false");
        let err = backend.stop("web").unwrap_err();
        assert!(err.to_string().starts_with("failed to stop env"));
    }

    #[cfg(unix)]
    #[test]
    fn succeeding_binary_is_ok() {
        let backend = DockerBackend::with_binary("true");
        backend.create_volume("web").unwrap();
        backend.remove_volume("web").unwrap();
    }
}
