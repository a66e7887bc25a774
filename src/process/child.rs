//! Spawned agent process handle
//!
//! Wraps the child process so the engine can consume stdout one line at a
//! time as lines arrive, while a background task accumulates stderr for
//! consultation after a non-zero exit.

use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, LinesCodec};

use crate::error::{AgentError, Result};

/// Bounded wait for the stderr collector after process exit
const STDERR_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// A running agent CLI process
///
/// One process per execution; never reused.
pub struct AgentProcess {
    child: Child,
    lines: FramedRead<ChildStdout, LinesCodec>,
    stderr_buf: Arc<Mutex<String>>,
    stderr_task: JoinHandle<()>,
}

impl AgentProcess {
    /// Spawn the command and wire up the stdio plumbing
    ///
    /// # Errors
    /// Returns [`AgentError::Spawn`] if the process cannot be started or a
    /// stdio handle is unavailable.
    pub fn spawn(mut cmd: Command) -> Result<Self> {
        let mut child = cmd
            .spawn()
            .map_err(|e| AgentError::spawn(format!("Failed to start Claude CLI: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AgentError::spawn("Failed to get stdout handle"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| AgentError::spawn("Failed to get stderr handle"))?;

        let stderr_buf = Arc::new(Mutex::new(String::new()));
        let buf = Arc::clone(&stderr_buf);
        let stderr_task = tokio::spawn(async move {
            let mut chunk = vec![0u8; 4096];
            loop {
                match stderr.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        buf.lock()
                            .await
                            .push_str(&String::from_utf8_lossy(&chunk[..n]));
                    }
                }
            }
        });

        Ok(Self {
            child,
            lines: FramedRead::new(stdout, LinesCodec::new()),
            stderr_buf,
            stderr_task,
        })
    }

    /// Next stdout line, or `None` on EOF
    ///
    /// Lines are yielded as the child produces them. Codec errors (for
    /// example invalid UTF-8) are logged and skipped.
    pub async fn next_line(&mut self) -> Option<String> {
        loop {
            match self.lines.next().await {
                Some(Ok(line)) => return Some(line),
                Some(Err(e)) => log::warn!("Failed to read stdout line: {e}"),
                None => return None,
            }
        }
    }

    /// Wait for the process to exit naturally
    ///
    /// There is no enforced timeout: the engine waits for the child.
    ///
    /// # Errors
    /// Returns [`AgentError::Io`] if waiting on the child fails.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        self.child.wait().await.map_err(AgentError::Io)
    }

    /// Collect buffered stderr output after the process has terminated
    ///
    /// Waits briefly for the collector task to observe EOF, then returns the
    /// buffer contents. Returns whatever was collected so far if the
    /// collector does not finish within the bound.
    pub async fn drain_stderr(mut self) -> String {
        if tokio::time::timeout(STDERR_DRAIN_TIMEOUT, &mut self.stderr_task)
            .await
            .is_err()
        {
            log::warn!("Timed out draining stderr, returning partial output");
            self.stderr_task.abort();
        }
        let mut buf = self.stderr_buf.lock().await;
        std::mem::take(&mut *buf)
    }
}
