// src/exec/backend.rs

//! Pluggable command executor abstraction.
//!
//! The transfer runner talks to a `CommandExecutor` instead of spawning
//! processes itself. This makes it easy to swap in a fake executor in tests
//! while keeping the production implementation in [`ProcessExecutor`].

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tracing::{debug, warn};

use crate::errors::{ForkseedError, Result};
use crate::exec::command::{CommandOutput, CommandSpec, Invocation};
use crate::types::StderrPolicy;

/// Trait abstracting how a single command is executed.
///
/// Exactly one outcome is produced per call. Callers await each call before
/// issuing the next, so implementations never see overlapping invocations
/// from the same caller.
pub trait CommandExecutor: Send {
    fn execute(
        &mut self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + '_>>;
}

/// Real executor used in production: one OS process per invocation.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(
        &mut self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + '_>> {
        Box::pin(async move {
            let Invocation {
                spec,
                stderr_policy,
            } = invocation;

            debug!(command = %spec, "spawning process");

            let mut cmd = spec.to_command();
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let output = cmd.output().await.map_err(|source| ForkseedError::Spawn {
                command: spec.to_string(),
                source,
            })?;

            judge_output(
                &spec,
                stderr_policy,
                output.status.success(),
                output.status.code(),
                String::from_utf8_lossy(&output.stdout).into_owned(),
                String::from_utf8_lossy(&output.stderr).into_owned(),
            )
        })
    }
}

/// Turn a finished process into a single outcome.
///
/// - non-zero exit (or signal) is always a failure
/// - zero exit with empty stderr is always a success
/// - zero exit with stderr output is decided by `policy`
pub fn judge_output(
    spec: &CommandSpec,
    policy: StderrPolicy,
    success: bool,
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
) -> Result<CommandOutput> {
    if !success {
        return Err(ForkseedError::CommandFailed {
            command: spec.to_string(),
            code: exit_code,
            stderr: stderr.trim_end().to_string(),
        });
    }

    if !stderr.is_empty() {
        match policy {
            StderrPolicy::Fail => {
                return Err(ForkseedError::StderrOutput {
                    command: spec.to_string(),
                    stderr: stderr.trim_end().to_string(),
                });
            }
            StderrPolicy::Log => {
                warn!(command = %spec, stderr = %stderr.trim_end(), "command succeeded with stderr output");
            }
        }
    }

    Ok(CommandOutput {
        stdout,
        stderr,
        exit_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> CommandSpec {
        CommandSpec::new("cast").arg("rpc")
    }

    #[test]
    fn zero_exit_without_stderr_succeeds() {
        let out = judge_output(
            &spec(),
            StderrPolicy::Fail,
            true,
            Some(0),
            "0x1\n".into(),
            String::new(),
        )
        .unwrap();
        assert_eq!(out.stdout, "0x1\n");
    }

    #[test]
    fn stderr_is_fatal_only_under_fail_policy() {
        let failed = judge_output(
            &spec(),
            StderrPolicy::Fail,
            true,
            Some(0),
            String::new(),
            "warning: x\n".into(),
        );
        assert!(matches!(
            failed,
            Err(ForkseedError::StderrOutput { ref stderr, .. }) if stderr == "warning: x"
        ));

        let logged = judge_output(
            &spec(),
            StderrPolicy::Log,
            true,
            Some(0),
            "ok".into(),
            "warning: x\n".into(),
        );
        assert!(logged.is_ok());
    }

    #[test]
    fn non_zero_exit_fails_regardless_of_policy() {
        let res = judge_output(
            &spec(),
            StderrPolicy::Log,
            false,
            Some(3),
            String::new(),
            String::new(),
        );
        assert!(matches!(
            res,
            Err(ForkseedError::CommandFailed { code: Some(3), .. })
        ));
    }
}
