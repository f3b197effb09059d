// SPDX-License-Identifier: MIT
// ProcessRunner — validated subprocess execution for artisan commands.
//
// Strategy:
//   1. The working directory is validated as a Dusk project before anything
//      is spawned; an invalid directory fails with InvalidProject and the
//      external command never runs.
//   2. `run` executes through the platform shell (the command is a single
//      string with quoted flag values) and captures full stdout/stderr —
//      no incremental streaming.
//   3. A non-zero exit status is an ExecutionError carrying whatever the
//      process wrote. stderr content alone, with exit 0, is passed through.

pub mod command;
pub mod parse;

use crate::error::{Error, Result};
use crate::project;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Captured output of one finished runner invocation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Handle to a detached long-running process (the dev server).
///
/// Today nothing awaits, polls, or kills the child — the handle exists so a
/// future "stop server" tool can be added without redesigning the spawn
/// path. Dropping the handle leaves the process running.
#[derive(Debug)]
pub struct DevServerHandle {
    pub command: String,
    child: Child,
}

impl DevServerHandle {
    /// OS pid of the spawned process, when still known.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }
}

fn shell_command(command: &str) -> Command {
    #[cfg(unix)]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
}

/// Run `command` inside `project`, waiting for exit and capturing all output.
///
/// # Errors
///
/// `Error::InvalidProject` when the directory fails project validation (the
/// command is never spawned); `Error::Execution` when spawning fails or the
/// process exits non-zero.
pub async fn run(command: &str, project: &Path) -> Result<RunOutput> {
    if !project::validate(project).await {
        warn!(path = %project.display(), "refusing to run command in invalid project");
        return Err(Error::InvalidProject(project.to_path_buf()));
    }

    debug!(command, cwd = %project.display(), "spawning runner command");

    let output = shell_command(command)
        .current_dir(project)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::Execution(format!("failed to spawn '{command}': {e}")))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        let code = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        // Failing Dusk runs print their report on stdout, so keep both
        // streams in the message.
        let detail = match (stdout.trim(), stderr.trim()) {
            (out, "") => out.to_string(),
            ("", err) => err.to_string(),
            (out, err) => format!("{out}\n{err}"),
        };
        return Err(Error::Execution(format!(
            "'{command}' exited with status {code}: {detail}"
        )));
    }

    Ok(RunOutput { stdout, stderr })
}

/// Spawn `command` inside `project` without waiting for it.
///
/// Used by the dev-server tool only. The project is validated first, like
/// `run`; output is not captured.
pub async fn spawn_detached(command: &str, project: &Path) -> Result<DevServerHandle> {
    if !project::validate(project).await {
        return Err(Error::InvalidProject(project.to_path_buf()));
    }

    let child = shell_command(command)
        .current_dir(project)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::Execution(format!("failed to spawn '{command}': {e}")))?;

    info!(command, pid = ?child.id(), "detached process started");

    Ok(DevServerHandle {
        command: command.to_string(),
        child,
    })
}
