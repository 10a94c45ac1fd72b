// src/transfer/runner.rs

//! Sequential, best-effort execution of transfer jobs.
//!
//! Jobs run strictly in the order given and every command is awaited before
//! the next one is issued. A job stops at its first failing command; the
//! failure is logged and recorded, and the next job starts regardless.

use std::fmt;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::chain::Address;
use crate::config::ConfigFile;
use crate::errors::{ForkseedError, Result};
use crate::exec::{CommandExecutor, CommandSpec, Invocation};
use crate::transfer::commands::CastCommands;
use crate::transfer::job::{Asset, TransferJob};
use crate::types::AssetKind;

/// A single command of a job's plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub label: String,
    pub spec: CommandSpec,
    /// Pause after the command succeeds.
    pub pause: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub name: String,
    pub kind: AssetKind,
    /// Commands that completed successfully.
    pub completed: usize,
    pub planned: usize,
    /// `None` on success, else the rendered error of the failing command.
    pub error: Option<String>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    pub jobs: Vec<JobOutcome>,
}

impl TransferReport {
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|j| j.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.jobs.len() - self.succeeded()
    }
}

impl fmt::Display for TransferReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} job(s): {} succeeded, {} failed",
            self.jobs.len(),
            self.succeeded(),
            self.failed()
        )
    }
}

/// Runs transfer jobs one after another through a [`CommandExecutor`].
#[derive(Debug)]
pub struct AssetTransferrer<E: CommandExecutor> {
    executor: E,
    commands: CastCommands,
    recipient: Address,
}

impl<E: CommandExecutor> AssetTransferrer<E> {
    pub fn new(executor: E, commands: CastCommands, recipient: Address) -> Self {
        Self {
            executor,
            commands,
            recipient,
        }
    }

    /// Build from validated config. Fails when no recipient is configured.
    pub fn from_config(executor: E, cfg: &ConfigFile) -> Result<Self> {
        let recipient = cfg.transfer.recipient.clone().ok_or_else(|| {
            ForkseedError::ConfigError(
                "no recipient: set USER_ADDRESS, pass --recipient or set [transfer].recipient"
                    .to_string(),
            )
        })?;
        let commands = CastCommands::new(&cfg.node.cast, cfg.node.rpc_url());
        Ok(Self::new(executor, commands, recipient))
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    /// The exact commands `job` will issue, in order.
    pub fn plan(&self, job: &TransferJob) -> Vec<PlannedStep> {
        let to = &self.recipient;
        let mut steps = Vec::new();

        if let Some(from) = job.asset.impersonated() {
            steps.push(PlannedStep {
                label: format!("impersonate {from}"),
                spec: self.commands.impersonate(from),
                pause: Duration::ZERO,
            });
        }

        match &job.asset {
            Asset::Erc721 {
                contract,
                from,
                token_ids,
            } => {
                for id in token_ids {
                    steps.push(PlannedStep {
                        label: format!("transfer token {id}"),
                        spec: self.commands.erc721_transfer(contract, from, to, *id),
                        pause: job.delay,
                    });
                }
            }
            Asset::Erc20 {
                contract,
                from,
                amount,
            } => steps.push(PlannedStep {
                label: format!("transfer {amount} units"),
                spec: self.commands.erc20_transfer(contract, from, to, *amount),
                pause: job.delay,
            }),
            Asset::Ether {
                from,
                private_key,
                wei,
            } => steps.push(PlannedStep {
                label: format!("transfer {wei} wei"),
                spec: self.commands.ether_transfer(from, private_key, to, *wei),
                pause: job.delay,
            }),
        }

        steps
    }

    /// Run every job in order. Never fails: per-job errors end up in the
    /// report.
    pub async fn run(&mut self, jobs: &[TransferJob]) -> TransferReport {
        info!(
            jobs = jobs.len(),
            recipient = %self.recipient,
            rpc_url = %self.commands.rpc_url(),
            "starting asset transfers"
        );

        let mut report = TransferReport::default();
        for job in jobs {
            let outcome = self.run_job(job).await;
            report.jobs.push(outcome);
        }

        if report.failed() == 0 {
            info!(%report, "asset transfers finished");
        } else {
            warn!(%report, "asset transfers finished with failures");
        }
        report
    }

    async fn run_job(&mut self, job: &TransferJob) -> JobOutcome {
        let steps = self.plan(job);
        let planned = steps.len();
        let mut completed = 0;

        info!(job = %job.name, kind = %job.kind(), commands = planned, "starting job");

        for step in steps {
            match self.run_step(job, &step).await {
                Ok(()) => completed += 1,
                Err(err) => {
                    error!(
                        job = %job.name,
                        step = %step.label,
                        error = %err,
                        "job failed; continuing with next job"
                    );
                    return JobOutcome {
                        name: job.name.clone(),
                        kind: job.kind(),
                        completed,
                        planned,
                        error: Some(err.to_string()),
                    };
                }
            }
        }

        info!(job = %job.name, commands = completed, "job finished");
        JobOutcome {
            name: job.name.clone(),
            kind: job.kind(),
            completed,
            planned,
            error: None,
        }
    }

    async fn run_step(&mut self, job: &TransferJob, step: &PlannedStep) -> Result<()> {
        info!(job = %job.name, step = %step.label, command = %step.spec, "executing command");

        let invocation = Invocation::new(step.spec.clone(), job.stderr_policy);
        let output = self.executor.execute(invocation).await?;

        info!(
            job = %job.name,
            step = %step.label,
            stdout = %output.stdout.trim_end(),
            "command succeeded"
        );

        if !step.pause.is_zero() {
            sleep(step.pause).await;
        }
        Ok(())
    }
}
