//! Bounded child-process execution
//!
//! Spawns a command with piped stdio in its own process group, drains stdout
//! and stderr concurrently with the wait, and kills the whole group when the
//! wall-clock budget expires. Killed children are always reaped.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Everything a bounded child produced before terminating on its own
#[derive(Debug)]
pub struct Captured {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: ExitStatus,
    pub elapsed: Duration,
}

/// Result of waiting on a bounded child
#[derive(Debug)]
pub enum WaitResult {
    /// The child terminated within the budget
    Finished(Captured),

    /// The budget expired; the process group was killed and reaped
    TimedOut {
        /// Wall-clock time spent before the kill
        elapsed: Duration,
    },
}

/// Run a command to completion or until `budget` expires
///
/// The child starts in a fresh process group so a timeout kills everything it
/// spawned, not just the direct child. `stdin` data is piped in when present;
/// absent stdin means the null device, so a read blocks never and sees
/// immediate end-of-input. Output pipes are drained concurrently with the
/// wait, so a child writing more than the pipe buffer cannot deadlock.
pub async fn run_bounded(
    program: &Path,
    args: &[String],
    cwd: &Path,
    stdin: Option<&[u8]>,
    budget: Duration,
) -> std::io::Result<WaitResult> {
    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    unsafe {
        // New process group so a timeout can signal the whole tree
        command.pre_exec(|| {
            if libc::setpgid(0, 0) != 0 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }

    let started = Instant::now();
    let mut child = command.spawn()?;
    let pid = child.id();
    debug!(?pid, program = %program.display(), "spawned bounded child");

    if let Some(data) = stdin {
        let mut handle = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("child stdin not piped"))?;
        let data = data.to_vec();
        tokio::spawn(async move {
            // The child may exit without reading; a broken pipe is fine
            let _ = handle.write_all(&data).await;
            let _ = handle.shutdown().await;
        });
    }

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("child stdout not piped"))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("child stderr not piped"))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf).await;
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        buf
    });

    let status = match tokio::time::timeout(budget, child.wait()).await {
        Ok(status) => status?,
        Err(_) => {
            kill_group(&mut child, pid).await;
            // Killing closed the write ends, so the drains finish promptly
            let _ = stdout_task.await;
            let _ = stderr_task.await;
            return Ok(WaitResult::TimedOut {
                elapsed: started.elapsed(),
            });
        }
    };

    let elapsed = started.elapsed();
    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    Ok(WaitResult::Finished(Captured {
        stdout,
        stderr,
        status,
        elapsed,
    }))
}

/// Kill the child's process group and reap the child
async fn kill_group(child: &mut Child, pid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        // Signal the negative pgid so children of the child die too
        unsafe {
            libc::kill(-(pid as i32), libc::SIGKILL);
        }
    }

    if let Err(e) = child.kill().await {
        warn!(?pid, error = %e, "failed to kill timed-out child");
    }
    let _ = child.wait().await;
    warn!(?pid, "killed process group after budget expiry");
}
