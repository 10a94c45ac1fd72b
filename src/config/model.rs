// src/config/model.rs

use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::chain::Address;
use crate::transfer::TransferJob;
use crate::types::StderrPolicy;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8545;
pub const DEFAULT_FORK_URL_BASE: &str = "https://eth-mainnet.g.alchemy.com/v2";
pub const DEFAULT_READY_PATTERN: &str = "Listening on";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [node]
/// port = 8545
///
/// [transfer]
/// recipient = "${USER_ADDRESS}"
///
/// [transfer.delay]
/// erc721 = "2s"
///
/// [[job]]
/// kind = "erc721"
/// contract = "0x5726C14663A1EaD4A7D320E8A653c9710b2A2E89"
/// from = "${USER_ADDRESS}"
/// token_ids = [1589, 1647, 848]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub node: NodeSection,

    #[serde(default)]
    pub transfer: TransferSection,

    /// Transfer jobs from `[[job]]`, executed in file order.
    #[serde(default)]
    pub job: Vec<RawJob>,
}

/// `[node]` section: the fork node and how to reach it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSection {
    /// Fork node binary.
    #[serde(default = "default_anvil")]
    pub anvil: String,

    /// Chain client binary.
    #[serde(default = "default_cast")]
    pub cast: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream provider URL; the API key is appended as the last path
    /// segment.
    #[serde(default = "default_fork_url_base")]
    pub fork_url_base: String,

    /// Usually supplied through `ALCHEMY_APIKEY` rather than the file.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub fork_block_number: Option<u64>,

    /// Regex matched against node stdout to detect readiness. Empty string
    /// disables detection.
    #[serde(default = "default_ready_pattern")]
    pub ready_pattern: String,

    /// Extra arguments appended verbatim to the node command line.
    #[serde(default)]
    pub extra_args: Vec<String>,

    #[serde(default = "default_node_stderr")]
    pub stderr: StderrPolicy,
}

fn default_anvil() -> String {
    "anvil".to_string()
}

fn default_cast() -> String {
    "cast".to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_fork_url_base() -> String {
    DEFAULT_FORK_URL_BASE.to_string()
}

fn default_ready_pattern() -> String {
    DEFAULT_READY_PATTERN.to_string()
}

fn default_node_stderr() -> StderrPolicy {
    StderrPolicy::Log
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            anvil: default_anvil(),
            cast: default_cast(),
            host: default_host(),
            port: default_port(),
            fork_url_base: default_fork_url_base(),
            api_key: None,
            fork_block_number: None,
            ready_pattern: default_ready_pattern(),
            extra_args: Vec::new(),
            stderr: default_node_stderr(),
        }
    }
}

/// `[transfer]` section: defaults shared by every job.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TransferSection {
    /// Address that receives every asset. Supports `${VAR}`.
    #[serde(default)]
    pub recipient: Option<String>,

    #[serde(default)]
    pub stderr: StderrPolicy,

    #[serde(default)]
    pub delay: DelaySection,
}

/// `[transfer.delay]`: pause after each transfer command, per asset kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DelaySection {
    #[serde(default = "default_token_delay")]
    pub erc721: String,

    #[serde(default = "default_token_delay")]
    pub erc20: String,

    #[serde(default = "default_ether_delay")]
    pub ether: String,
}

fn default_token_delay() -> String {
    "2s".to_string()
}

fn default_ether_delay() -> String {
    "5s".to_string()
}

impl Default for DelaySection {
    fn default() -> Self {
        Self {
            erc721: default_token_delay(),
            erc20: default_token_delay(),
            ether: default_ether_delay(),
        }
    }
}

/// One `[[job]]` entry. String fields support `${VAR}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RawJob {
    Erc721 {
        #[serde(default)]
        name: Option<String>,
        contract: String,
        from: String,
        token_ids: Vec<u64>,
        #[serde(default)]
        delay: Option<String>,
        #[serde(default)]
        stderr: Option<StderrPolicy>,
    },
    Erc20 {
        #[serde(default)]
        name: Option<String>,
        contract: String,
        from: String,
        amount: RawAmount,
        #[serde(default)]
        delay: Option<String>,
        #[serde(default)]
        stderr: Option<StderrPolicy>,
    },
    Ether {
        #[serde(default)]
        name: Option<String>,
        from: String,
        private_key: String,
        /// Decimal ether, e.g. `"10"` or `"0.5"`.
        value: String,
        #[serde(default)]
        delay: Option<String>,
        #[serde(default)]
        stderr: Option<StderrPolicy>,
    },
}

/// ERC20 amount in the token's smallest unit. TOML integers stop at
/// `i64::MAX`, so 18-decimal amounts are usually written as strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Integer(u64),
    Text(String),
}

/// Values coming from the command line or environment that take precedence
/// over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub port: Option<u16>,
    pub recipient: Option<String>,
}

impl RawConfigFile {
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(ref key) = overrides.api_key {
            self.node.api_key = Some(key.clone());
        }
        if let Some(port) = overrides.port {
            self.node.port = port;
        }
        if let Some(ref recipient) = overrides.recipient {
            self.transfer.recipient = Some(recipient.clone());
        }
    }
}

/// Validated configuration, produced by `TryFrom<RawConfigFile>` or
/// [`ConfigFile::from_raw_with_env`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub node: NodeSettings,
    pub transfer: TransferSettings,
    pub jobs: Vec<TransferJob>,
}

#[derive(Debug, Clone)]
pub struct NodeSettings {
    pub anvil: String,
    pub cast: String,
    pub host: String,
    pub port: u16,
    pub fork_url_base: String,
    pub api_key: Option<String>,
    pub fork_block_number: Option<u64>,
    pub ready_pattern: Option<Regex>,
    pub extra_args: Vec<String>,
    pub stderr_policy: StderrPolicy,
}

impl NodeSettings {
    /// JSON-RPC endpoint of the local node.
    pub fn rpc_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub recipient: Option<Address>,
    pub stderr_policy: StderrPolicy,
    pub erc721_delay: Duration,
    pub erc20_delay: Duration,
    pub ether_delay: Duration,
}
