// src/lib.rs

pub mod chain;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fork;
pub mod logging;
pub mod transfer;
pub mod types;

use std::fmt;

use tracing::{debug, info};

use crate::cli::{CliArgs, Command, ForkArgs, TransferArgs};
use crate::config::{ConfigFile, Overrides, load_and_validate};
use crate::errors::Result;
use crate::exec::{CommandExecutor, ProcessExecutor};
use crate::fork::ForkLauncher;
use crate::transfer::{AssetTransferrer, TransferReport};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI/environment overrides)
/// - the selected subcommand (fork launcher or asset transferrer)
/// - the real process executor
pub async fn run(args: CliArgs) -> Result<()> {
    let overrides = match &args.command {
        Command::Fork(f) => fork_overrides(f),
        Command::Transfer(t) => transfer_overrides(t),
    };
    let cfg = load_and_validate(&args.config, &overrides)?;

    match args.command {
        Command::Fork(_) => run_fork(&cfg, args.dry_run).await,
        Command::Transfer(_) => {
            run_transfer(&cfg, args.dry_run).await?;
            Ok(())
        }
    }
}

fn fork_overrides(args: &ForkArgs) -> Overrides {
    Overrides {
        api_key: args.api_key.clone(),
        port: args.port,
        recipient: None,
    }
}

fn transfer_overrides(args: &TransferArgs) -> Overrides {
    Overrides {
        api_key: None,
        port: args.port,
        recipient: args.recipient.clone(),
    }
}

/// Start the fork node; blocks until it exits or Ctrl-C.
pub async fn run_fork(cfg: &ConfigFile, dry_run: bool) -> Result<()> {
    let launcher = ForkLauncher::from_config(cfg)?;

    if dry_run {
        print!("{}", ForkDryRun(&launcher));
        return Ok(());
    }

    launcher.run().await
}

/// Run every configured transfer job. Job failures are reported, not
/// returned; only setup problems are errors.
pub async fn run_transfer(cfg: &ConfigFile, dry_run: bool) -> Result<TransferReport> {
    if cfg.jobs.is_empty() {
        info!("no [[job]] entries configured; nothing to transfer");
        return Ok(TransferReport::default());
    }

    let mut transferrer = AssetTransferrer::from_config(ProcessExecutor::new(), cfg)?;

    if dry_run {
        print!("{}", TransferDryRun { transferrer: &transferrer, cfg });
        debug!("dry-run complete (no execution)");
        return Ok(TransferReport::default());
    }

    Ok(transferrer.run(&cfg.jobs).await)
}

struct ForkDryRun<'a>(&'a ForkLauncher);

impl fmt::Display for ForkDryRun<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "forkseed dry-run (fork)")?;
        writeln!(f, "  endpoint: {}", self.0.endpoint())?;
        writeln!(f, "  {}", self.0.command())
    }
}

struct TransferDryRun<'a, E: CommandExecutor> {
    transferrer: &'a AssetTransferrer<E>,
    cfg: &'a ConfigFile,
}

impl<E: CommandExecutor> fmt::Display for TransferDryRun<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "forkseed dry-run (transfer)")?;
        writeln!(f, "  recipient: {}", self.transferrer.recipient())?;
        writeln!(f, "  rpc: {}", self.cfg.node.rpc_url())?;
        writeln!(f)?;

        writeln!(f, "jobs ({}):", self.cfg.jobs.len())?;
        for job in &self.cfg.jobs {
            writeln!(f, "  - {} ({}, stderr={})", job.name, job.kind(), job.stderr_policy)?;
            for step in self.transferrer.plan(job) {
                writeln!(f, "      {}", step.spec)?;
                if !step.pause.is_zero() {
                    writeln!(f, "      (pause {:?})", step.pause)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfigFile;

    const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn config(toml_src: &str) -> ConfigFile {
        let raw: RawConfigFile = toml::from_str(toml_src).unwrap();
        ConfigFile::from_raw_with_env(raw, |_| None).unwrap()
    }

    #[test]
    fn transfer_dry_run_lists_every_planned_command() {
        let cfg = config(&format!(
            r#"
[node]
cast = "/nonexistent/cast"

[transfer]
recipient = "{RECIPIENT}"

[[job]]
kind = "erc721"
name = "cards"
contract = "0x5726C14663A1EaD4A7D320E8A653c9710b2A2E89"
from = "0xF977814e90dA44bFA03b6295A0616a897441aceC"
token_ids = [1589, 848]

[[job]]
kind = "ether"
from = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
value = "10"
"#
        ));
        let transferrer = AssetTransferrer::from_config(ProcessExecutor::new(), &cfg).unwrap();
        let text = TransferDryRun { transferrer: &transferrer, cfg: &cfg }.to_string();

        assert!(text.contains(&format!("recipient: {RECIPIENT}")));
        assert!(text.contains("rpc: http://127.0.0.1:8545"));
        assert!(text.contains("jobs (2):"));
        assert!(text.contains("- cards (erc721, stderr=fail)"));
        assert!(text.contains("- ether-2 (ether, stderr=fail)"));
        assert_eq!(text.matches("/nonexistent/cast ").count(), 4);
        assert!(text.contains("'safeTransferFrom(address,address,uint256)'"));
        assert_eq!(text.matches("(pause 2s)").count(), 2);
        assert!(text.contains("(pause 5s)"));
        assert!(!text.contains("ac0974"));
    }

    #[test]
    fn fork_dry_run_shows_endpoint_and_command() {
        let cfg = config("[node]\napi_key = \"ABC\"\nport = 9545\n");
        let launcher = ForkLauncher::from_config(&cfg).unwrap();
        let text = ForkDryRun(&launcher).to_string();

        assert!(text.contains("endpoint: http://127.0.0.1:9545"));
        assert!(text.contains("anvil --fork-url https://eth-mainnet.g.alchemy.com/v2/ABC --port 9545"));
    }

    #[tokio::test]
    async fn dry_run_executes_nothing() {
        let cfg = config(&format!(
            r#"
[node]
cast = "/nonexistent/cast"

[transfer]
recipient = "{RECIPIENT}"

[[job]]
kind = "erc20"
contract = "0xdAC17F958D2ee523a2206206994597C13D831ec7"
from = "0xF977814e90dA44bFA03b6295A0616a897441aceC"
amount = 1
"#
        ));

        // A real run would fail to spawn the missing binary.
        let report = run_transfer(&cfg, true).await.unwrap();
        assert!(report.jobs.is_empty());
    }

    #[tokio::test]
    async fn no_jobs_and_no_recipient_is_an_empty_run() {
        let cfg = config("");
        assert!(cfg.transfer.recipient.is_none());

        let report = run_transfer(&cfg, false).await.unwrap();
        assert!(report.jobs.is_empty());
        assert_eq!(report.to_string(), "0 job(s): 0 succeeded, 0 failed");
    }
}
