//! Shell command execution with captured output.
//!
//! Every provisioning step that touches the host runs through [`run`]: one
//! command string, executed by the user's shell, stdout and stderr captured
//! as text. Steps are strictly sequential so there is exactly one child
//! process alive at a time.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::{Error, Result};

/// Captured output of one shell invocation.
///
/// Transient by design: the caller consumes it immediately and nothing is
/// persisted.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Raw exit code; -1 when the process was killed by a signal.
    pub exit_code: i32,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout followed by stderr, the text the certbot extractors scan.
    #[must_use]
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    /// True when neither stream carried anything but whitespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stdout.trim().is_empty() && self.stderr.trim().is_empty()
    }
}

/// The user's shell, falling back to `/bin/sh` when `SHELL` is unset or
/// empty.
fn user_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|shell| !shell.is_empty())
        .unwrap_or_else(|| "/bin/sh".to_string())
}

/// Run `command` through the user's shell and capture its output.
///
/// `dir` is the child's working directory; `None` inherits ours. With
/// `strict` a non-zero exit becomes [`Error::CommandFailed`]; without it the
/// captured output is returned as-is and the failure is only logged.
///
/// Stdin stays attached to the terminal: certbot's manual mode prints its
/// continue prompt into the captured pipe and reads the answer from our
/// stdin, so a closed stdin would abort issuance.
///
/// # Errors
///
/// Returns [`Error::Spawn`] when the shell cannot be launched (missing
/// shell, missing working directory) regardless of `strict`, and
/// [`Error::CommandFailed`] for strict non-zero exits.
pub async fn run(command: &str, dir: Option<&Path>, strict: bool) -> Result<CommandOutput> {
    let shell = user_shell();
    tracing::debug!(%command, %shell, "running shell command");

    let mut cmd = Command::new(&shell);
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let output = cmd.output().await.map_err(|source| Error::Spawn {
        command: command.to_string(),
        source,
    })?;

    let result = CommandOutput {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if result.success {
        tracing::debug!(%command, "command succeeded");
        return Ok(result);
    }

    if strict {
        return Err(Error::CommandFailed {
            command: command.to_string(),
            exit_code: result.exit_code,
            stderr: result.stderr,
        });
    }

    tracing::warn!(%command, exit_code = result.exit_code, "command failed; continuing");
    Ok(result)
}
