use std::io::Read;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use crate::foundation::error::{CaptyteError, CaptyteResult};

/// A running `ffmpeg` child whose stderr is drained on a helper thread.
///
/// The child is killed on drop unless [`FfmpegProcess::wait`] reaped it first.
pub(crate) struct FfmpegProcess {
    role: &'static str,
    child: Option<Child>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl FfmpegProcess {
    /// Spawn `ffmpeg` with `args`. `role` names the process in errors ("decoder", "encoder").
    pub(crate) fn spawn<I, S>(
        role: &'static str,
        args: I,
        stdin: Stdio,
        stdout: Stdio,
    ) -> CaptyteResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(stdin)
            .stdout(stdout)
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CaptyteError::media(format!(
                    "failed to spawn ffmpeg {role} (is it installed and on PATH?): {e}"
                ))
            })?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| CaptyteError::media(format!("ffmpeg {role} has no stderr pipe")))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });
        tracing::debug!(role, pid = child.id(), "ffmpeg spawned");
        Ok(Self {
            role,
            child: Some(child),
            stderr_drain: Some(stderr_drain),
        })
    }

    pub(crate) fn take_stdin(&mut self) -> CaptyteResult<ChildStdin> {
        self.child
            .as_mut()
            .and_then(|c| c.stdin.take())
            .ok_or_else(|| CaptyteError::media(format!("ffmpeg {} has no stdin pipe", self.role)))
    }

    pub(crate) fn take_stdout(&mut self) -> CaptyteResult<ChildStdout> {
        self.child
            .as_mut()
            .and_then(|c| c.stdout.take())
            .ok_or_else(|| CaptyteError::media(format!("ffmpeg {} has no stdout pipe", self.role)))
    }

    /// Reap the child. A non-zero exit becomes a media error carrying ffmpeg's stderr.
    pub(crate) fn wait(&mut self) -> CaptyteResult<()> {
        let role = self.role;
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| CaptyteError::media(format!("failed to wait for ffmpeg {role}: {e}")))?;
        let stderr = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| CaptyteError::media(format!("ffmpeg {role} stderr thread panicked")))?
                .map_err(|e| CaptyteError::media(format!("ffmpeg {role} stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() {
            return Err(CaptyteError::media(format!(
                "ffmpeg {role} exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for FfmpegProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegProcess")
            .field("role", &self.role)
            .field("running", &self.child.is_some())
            .finish()
    }
}

impl Drop for FfmpegProcess {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Whether `tool -version` runs successfully from `PATH`.
pub(crate) fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/media/process.rs"]
mod tests;
