use crate::backend::{AttachTarget, WORKSPACE_DIR};

pub const DEFAULT_EDITOR: &str = "code";
/// Environment variable overriding the editor binary.
pub const EDITOR_ENV: &str = "DEV_ENV_EDITOR";

/// Remote folder locator the editor opens for an attached container:
/// `vscode-remote://attached-container+<hash>/workspace/<name>`.
pub fn attach_uri(target: &AttachTarget) -> String {
    format!(
        "vscode-remote://attached-container+{}{WORKSPACE_DIR}/{}",
        target.hash, target.name
    )
}

/// The single argument passed to the editor.
pub fn attach_arg(target: &AttachTarget) -> String {
    format!("--folder-uri={}", attach_uri(target))
}

pub fn resolve_editor() -> String {
    std::env::var(EDITOR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_owned())
}
