use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use forkseed::errors::{ForkseedError, Result};
use forkseed::exec::{CommandExecutor, CommandOutput, CommandSpec, Invocation};
use forkseed::types::StderrPolicy;
use tokio::time::Instant;
use tracing::debug;

/// One command seen by the [`FakeExecutor`].
#[derive(Debug, Clone)]
pub struct ExecutedCommand {
    pub spec: CommandSpec,
    pub policy: StderrPolicy,
    pub started: Instant,
    pub finished: Instant,
    pub succeeded: bool,
}

type FailRule = Box<dyn Fn(&CommandSpec) -> bool + Send + Sync>;

/// Shared view of everything a [`FakeExecutor`] did. Clone it before handing
/// the executor away.
#[derive(Clone, Default)]
pub struct ExecutionLog {
    commands: Arc<Mutex<Vec<ExecutedCommand>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl ExecutionLog {
    pub fn commands(&self) -> Vec<ExecutedCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// `program args...` for every executed command, in order.
    pub fn argv(&self) -> Vec<Vec<String>> {
        self.commands()
            .into_iter()
            .map(|c| {
                let mut v = vec![c.spec.program().to_string()];
                v.extend(c.spec.get_args().iter().cloned());
                v
            })
            .collect()
    }

    /// Highest number of commands that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// A fake executor that:
/// - records which commands were "run" and when
/// - fails commands matching any registered rule (exit code 1)
/// - optionally takes some (virtual) time per command
/// - otherwise reports success with empty output.
pub struct FakeExecutor {
    log: ExecutionLog,
    fail_rules: Vec<FailRule>,
    latency: Duration,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self {
            log: ExecutionLog::default(),
            fail_rules: Vec::new(),
            latency: Duration::ZERO,
        }
    }

    pub fn log(&self) -> ExecutionLog {
        self.log.clone()
    }

    /// Fail every command for which `rule` returns true.
    pub fn fail_when<F>(mut self, rule: F) -> Self
    where
        F: Fn(&CommandSpec) -> bool + Send + Sync + 'static,
    {
        self.fail_rules.push(Box::new(rule));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl fmt::Debug for FakeExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeExecutor")
            .field("fail_rules", &self.fail_rules.len())
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl Default for FakeExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute(
        &mut self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + '_>> {
        Box::pin(async move {
            let log = &self.log;
            let now_running = log.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            log.max_in_flight.fetch_max(now_running, Ordering::SeqCst);

            let started = Instant::now();
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            let failed = self.fail_rules.iter().any(|rule| rule(&invocation.spec));
            debug!(command = %invocation.spec, failed, "fake executor ran command");

            log.in_flight.fetch_sub(1, Ordering::SeqCst);
            log.commands.lock().unwrap().push(ExecutedCommand {
                spec: invocation.spec.clone(),
                policy: invocation.stderr_policy,
                started,
                finished: Instant::now(),
                succeeded: !failed,
            });

            if failed {
                Err(ForkseedError::CommandFailed {
                    command: invocation.spec.to_string(),
                    code: Some(1),
                    stderr: "scripted failure".to_string(),
                })
            } else {
                Ok(CommandOutput {
                    stdout: "ok\n".to_string(),
                    stderr: String::new(),
                    exit_code: Some(0),
                })
            }
        })
    }
}
