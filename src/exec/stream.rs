// src/exec/stream.rs

//! Streaming execution for long-lived processes.
//!
//! Unlike [`ProcessExecutor`](crate::exec::ProcessExecutor), which buffers the
//! whole output, this forwards every stdout/stderr line to `tracing` as it
//! arrives. It is used for the fork node, which normally runs until it is
//! killed.

use std::collections::VecDeque;
use std::process::Stdio;

use regex::Regex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{ForkseedError, Result};
use crate::exec::command::{CommandOutput, CommandSpec};
use crate::types::StderrPolicy;

/// How many trailing stderr lines are kept for error reports.
const STDERR_TAIL: usize = 20;

#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// First stdout line matching this marks the process as ready.
    pub ready_pattern: Option<Regex>,
    pub stderr_policy: StderrPolicy,
}

/// A running streamed process.
///
/// Dropping the handle kills the child.
#[derive(Debug)]
pub struct StreamHandle {
    spec: CommandSpec,
    policy: StderrPolicy,
    child: Child,
    stdout_task: Option<JoinHandle<()>>,
    stderr_task: Option<JoinHandle<VecDeque<String>>>,
    ready_rx: Option<oneshot::Receiver<()>>,
}

/// Spawn `spec` with piped output and start forwarding it to the log.
pub fn spawn_streaming(spec: &CommandSpec, opts: &StreamOptions) -> Result<StreamHandle> {
    let mut cmd = spec.to_command();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| ForkseedError::Spawn {
        command: spec.to_string(),
        source,
    })?;

    info!(command = %spec, pid = child.id(), "process started");

    let (ready_tx, ready_rx) = oneshot::channel();

    let stdout_task = child.stdout.take().map(|out| {
        spawn_stdout_monitor(
            spec.program().to_string(),
            out,
            opts.ready_pattern.clone(),
            ready_tx,
        )
    });

    let stderr_task = child
        .stderr
        .take()
        .map(|err| spawn_stderr_monitor(spec.program().to_string(), err));

    Ok(StreamHandle {
        spec: spec.clone(),
        policy: opts.stderr_policy,
        child,
        stdout_task,
        stderr_task,
        ready_rx: Some(ready_rx),
    })
}

impl StreamHandle {
    /// Resolves once a stdout line matched the ready pattern. The receiver
    /// errors if the process exits first or no pattern was configured.
    pub fn take_ready(&mut self) -> Option<oneshot::Receiver<()>> {
        self.ready_rx.take()
    }

    /// Kill the child and reap it.
    pub async fn kill(&mut self) -> Result<()> {
        self.child.kill().await?;
        Ok(())
    }

    /// Wait for the process to exit and judge the outcome.
    ///
    /// Stdout has already been logged line by line, so the returned
    /// `CommandOutput` carries only the stderr tail.
    pub async fn wait(&mut self) -> Result<CommandOutput> {
        let status = self.child.wait().await?;

        if let Some(task) = self.stdout_task.take() {
            let _ = task.await;
        }
        let tail = match self.stderr_task.take() {
            Some(task) => task.await.unwrap_or_default(),
            None => VecDeque::new(),
        };
        let stderr = tail.into_iter().collect::<Vec<_>>().join("\n");

        info!(
            command = %self.spec,
            exit_code = ?status.code(),
            success = status.success(),
            "process exited"
        );

        crate::exec::backend::judge_output(
            &self.spec,
            self.policy,
            status.success(),
            status.code(),
            String::new(),
            stderr,
        )
    }
}

fn spawn_stdout_monitor(
    name: String,
    stdout: ChildStdout,
    ready_pattern: Option<Regex>,
    ready_tx: oneshot::Sender<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ready_tx = ready_pattern.as_ref().map(|_| ready_tx);

        for_each_line(&name, stdout, |line| {
            info!(process = %name, "{}", line);

            if ready_tx.is_some() && ready_pattern.as_ref().is_some_and(|re| re.is_match(&line)) {
                info!(process = %name, "process reported ready");
                if let Some(tx) = ready_tx.take() {
                    let _ = tx.send(());
                }
            }
        })
        .await;

        debug!(process = %name, "stdout monitor ended");
    })
}

fn spawn_stderr_monitor(name: String, stderr: ChildStderr) -> JoinHandle<VecDeque<String>> {
    tokio::spawn(async move {
        let mut tail = VecDeque::with_capacity(STDERR_TAIL);

        for_each_line(&name, stderr, |line| {
            warn!(process = %name, "stderr: {}", line);
            if tail.len() == STDERR_TAIL {
                tail.pop_front();
            }
            tail.push_back(line);
        })
        .await;

        debug!(process = %name, "stderr monitor ended");
        tail
    })
}

/// Feed every line of `pipe` to `on_line` until EOF.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the read,
/// so the child never sees a closed pipe while it is still writing.
async fn for_each_line<R, F>(name: &str, pipe: R, mut on_line: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(String),
{
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();

    loop {
        match read_lossy_line(&mut reader, &mut buf).await {
            Ok(Some(line)) => on_line(line),
            Ok(None) => break,
            Err(e) => {
                warn!(process = %name, error = %e, "failed to read process output");
                break;
            }
        }
    }
}

async fn read_lossy_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}
