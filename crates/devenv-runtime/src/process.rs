use crate::RuntimeError;
use std::process::{Command, Stdio};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Streams {
    /// Capture stdout/stderr; stderr is folded into the error on failure.
    Captured,
    /// Share the parent's stdin/stdout/stderr.
    Inherited,
}

/// Run `program args...` to completion. `action` is the message reported when
/// the process exits non-zero.
pub(crate) fn run(
    program: &str,
    args: &[String],
    streams: Streams,
    action: &'static str,
) -> Result<(), RuntimeError> {
    debug!("exec: {program} {}", args.join(" "));
    let mut cmd = Command::new(program);
    cmd.args(args);

    let launch_err = |source: std::io::Error| {
        error!("failed to launch {program}: {source}");
        RuntimeError::Launch {
            program: program.to_owned(),
            source,
        }
    };

    match streams {
        Streams::Captured => {
            let output = cmd
                .stdin(Stdio::null())
                .output()
                .map_err(launch_err)?;
            if output.status.success() {
                return Ok(());
            }
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            let detail = if stderr.is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {stderr}", output.status)
            };
            Err(RuntimeError::ExecFailed { action, detail })
        }
        Streams::Inherited => {
            let status = cmd.status().map_err(launch_err)?;
            if status.success() {
                Ok(())
            } else {
                Err(RuntimeError::ExecFailed {
                    action,
                    detail: status.to_string(),
                })
            }
        }
    }
}
