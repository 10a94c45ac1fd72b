// src/fork/launcher.rs

use std::future::Future;

use tracing::{debug, info, warn};

use crate::config::model::{ConfigFile, DEFAULT_HOST, NodeSettings};
use crate::errors::{ForkseedError, Result};
use crate::exec::{CommandSpec, StreamOptions, spawn_streaming};

/// Starts a forked node and keeps it in the foreground.
#[derive(Debug, Clone)]
pub struct ForkLauncher {
    node: NodeSettings,
    api_key: String,
}

impl ForkLauncher {
    /// Build from validated config. Fails when no API key is configured.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let api_key = cfg.node.api_key.clone().ok_or_else(|| {
            ForkseedError::ConfigError(
                "no provider API key: set ALCHEMY_APIKEY, pass --api-key or set [node].api_key"
                    .to_string(),
            )
        })?;
        Ok(Self {
            node: cfg.node.clone(),
            api_key,
        })
    }

    /// Upstream URL the node forks from.
    pub fn fork_url(&self) -> String {
        format!("{}/{}", self.node.fork_url_base, self.api_key)
    }

    /// Local JSON-RPC endpoint the node will serve.
    pub fn endpoint(&self) -> String {
        self.node.rpc_url()
    }

    /// `anvil --fork-url <url> --port <port> [--host H] [--fork-block-number N] [extra...]`
    pub fn command(&self) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.node.anvil)
            .args(["--fork-url".to_string(), self.fork_url()])
            .args(["--port".to_string(), self.node.port.to_string()]);

        if self.node.host != DEFAULT_HOST {
            spec = spec.args(["--host", self.node.host.as_str()]);
        }
        if let Some(block) = self.node.fork_block_number {
            spec = spec.args(["--fork-block-number".to_string(), block.to_string()]);
        }
        spec.args(self.node.extra_args.iter().cloned())
    }

    /// Run the node until it exits or Ctrl-C is pressed.
    ///
    /// The node normally runs forever, so under normal operation this only
    /// returns on interruption.
    pub async fn run(&self) -> Result<()> {
        self.run_until(ctrl_c()).await
    }

    /// Run the node until it exits or `shutdown` resolves, in which case the
    /// node is killed and `Ok(())` is returned.
    ///
    /// A node that exits on its own is judged like any other command: a
    /// non-zero exit is an error.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(endpoint = %self.endpoint(), "fork node starting");

        let opts = StreamOptions {
            ready_pattern: self.node.ready_pattern.clone(),
            stderr_policy: self.node.stderr_policy,
        };
        let mut handle = spawn_streaming(&self.command(), &opts)?;

        if let Some(ready) = handle.take_ready() {
            let endpoint = self.endpoint();
            tokio::spawn(async move {
                if ready.await.is_ok() {
                    info!(%endpoint, "fork node ready");
                }
            });
        }

        tokio::select! {
            res = handle.wait() => {
                res?;
                info!("fork node exited");
                Ok(())
            }
            _ = shutdown => {
                info!("shutdown requested; stopping fork node");
                if let Err(e) = handle.kill().await {
                    warn!(error = %e, "failed to kill fork node");
                }
                Ok(())
            }
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C; node can only be stopped externally");
        std::future::pending::<()>().await;
    }
    debug!("received Ctrl+C");
}
