use crate::error::{Error, Result};
use crate::types::ExitCode;
use std::future::Future;
use std::io;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::instrument;

/// The size of the buffer used to read from the child output streams.
const READ_CHUNK_SIZE: usize = 4096;

/// The terminal state of a child process which ran to completion.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Completion {
    /// The exit code of the child.
    pub code: ExitCode,
    /// Everything the child wrote to standard output.
    pub stdout: String,
    /// Everything the child wrote to standard error.
    pub stderr: String,
    /// The wall clock time from just before spawning until exit.
    pub elapsed: Duration,
}

/// Run an external program to completion.
pub trait Runner {
    /// Run `program` with `args` and capture its output.
    ///
    /// A non-zero exit is a `Completion` like any other.
    ///
    /// # Errors
    ///
    /// - [`Error::SpawnFailed`] if the program could not be started.
    /// - [`Error::CaptureFailed`] if it started but its output or exit status
    ///   could not be collected.
    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> impl Future<Output = Result<Completion>> + Send;
}

/// A `Runner` which spawns a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<Completion> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        capture(cmd).await
    }
}

/// Spawn `cmd` and capture both output streams until it exits.
///
/// Both streams are drained concurrently so a child which fills one pipe
/// cannot block on it while we wait on the other.
///
/// The child is killed if the returned future is dropped or capturing fails.
#[instrument(skip_all, level = "trace")]
pub(crate) async fn capture(mut cmd: Command) -> Result<Completion> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    let start = Instant::now();
    let mut child = cmd.spawn().map_err(Error::SpawnFailed)?;
    tracing::debug!(pid = ?child.id(), "spawned child");
    let streams = tokio::try_join!(
        drain(child.stdout.take(), "stdout"),
        drain(child.stderr.take(), "stderr")
    );
    let (stdout, stderr) = streams.map_err(Error::CaptureFailed)?;
    let status = child.wait().await.map_err(Error::CaptureFailed)?;
    let elapsed = start.elapsed();
    let code = ExitCode::from(status.code());
    tracing::debug!(%code, ?elapsed, "child exited");
    Ok(Completion {
        code,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        elapsed,
    })
}

/// Read `stream` to the end, appending each chunk in arrival order.
async fn drain<R: AsyncRead + Unpin>(stream: Option<R>, name: &'static str) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let Some(mut stream) = stream else {
        return Ok(buf);
    };
    let mut chunk = [0_u8; READ_CHUNK_SIZE];
    loop {
        let bytes = stream.read(&mut chunk).await?;
        if bytes == 0 {
            break;
        }
        tracing::trace!(stream = name, bytes, "read chunk");
        buf.extend_from_slice(&chunk[..bytes]);
    }
    Ok(buf)
}
