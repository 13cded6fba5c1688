use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::debug;

use crate::config::ClassifierConfig;
use crate::external::classifier_worker::{parse_output, ClassifierWorker, WorkerError};
use crate::models::ClassificationResult;

/// Runs the classifier as a child process per call: `program args... <text>`.
///
/// The child is killed if the call times out or the calling future is dropped.
#[derive(Debug, Clone)]
pub struct ProcessClassifierWorker {
    program: OsString,
    args: Vec<OsString>,
    timeout: Duration,
}

impl ProcessClassifierWorker {
    pub fn new(program: impl Into<OsString>, args: Vec<OsString>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        let args = config
            .script
            .iter()
            .map(|script| script.clone().into_os_string())
            .collect();
        Self::new(config.program.clone(), args, config.timeout)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Largest stdout accepted from the worker; a single JSON object is far smaller.
pub const MAX_STDOUT_BYTES: u64 = 64 * 1024;
/// Stderr beyond this is drained and discarded.
pub const MAX_STDERR_BYTES: u64 = 16 * 1024;

struct CappedOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

#[async_trait]
impl ClassifierWorker for ProcessClassifierWorker {
    async fn run(&self, text: &str) -> Result<ClassificationResult, WorkerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| WorkerError::Spawn(e.to_string()))?;

        debug!(pid = ?child.id(), "Classifier worker started");

        // On timeout or oversized output the child is dropped on return, which kills it.
        let output = match tokio::time::timeout(self.timeout, collect_output(&mut child)).await {
            Ok(result) => result?,
            Err(_) => return Err(WorkerError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            return Err(WorkerError::ExitStatus {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_output(&output.stdout)
    }
}

async fn collect_output(child: &mut Child) -> Result<CappedOutput, WorkerError> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| WorkerError::Io("worker stdout was not captured".into()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| WorkerError::Io("worker stderr was not captured".into()))?;

    let (stdout, stderr) = tokio::try_join!(read_stdout(stdout), read_stderr(stderr))?;
    let status = child.wait().await.map_err(io_error)?;
    Ok(CappedOutput { status, stdout, stderr })
}

async fn read_stdout(stdout: ChildStdout) -> Result<Vec<u8>, WorkerError> {
    let mut buf = Vec::new();
    stdout
        .take(MAX_STDOUT_BYTES + 1)
        .read_to_end(&mut buf)
        .await
        .map_err(io_error)?;
    if buf.len() as u64 > MAX_STDOUT_BYTES {
        return Err(WorkerError::Parse(format!(
            "worker stdout exceeded {} bytes",
            MAX_STDOUT_BYTES
        )));
    }
    Ok(buf)
}

async fn read_stderr(mut stderr: ChildStderr) -> Result<Vec<u8>, WorkerError> {
    let mut buf = Vec::new();
    (&mut stderr)
        .take(MAX_STDERR_BYTES)
        .read_to_end(&mut buf)
        .await
        .map_err(io_error)?;
    tokio::io::copy(&mut stderr, &mut tokio::io::sink())
        .await
        .map_err(io_error)?;
    Ok(buf)
}

fn io_error(e: std::io::Error) -> WorkerError {
    WorkerError::Io(e.to_string())
}
