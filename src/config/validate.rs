// src/config/validate.rs

use std::time::Duration;

use regex::Regex;

use crate::chain::{Address, PrivateKey, parse_ether, parse_token_amount};
use crate::config::duration::parse_duration;
use crate::config::env::{expand_vars, process_env};
use crate::config::model::{
    ConfigFile, DelaySection, NodeSection, NodeSettings, RawAmount, RawConfigFile, RawJob,
    TransferSection, TransferSettings,
};
use crate::errors::{ForkseedError, Result};
use crate::transfer::{Asset, TransferJob};
use crate::types::AssetKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ForkseedError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ConfigFile::from_raw_with_env(raw, process_env)
    }
}

impl ConfigFile {
    /// Validate `raw`, resolving `${VAR}` references through `lookup`.
    pub fn from_raw_with_env<F>(raw: RawConfigFile, lookup: F) -> Result<ConfigFile>
    where
        F: Fn(&str) -> Option<String>,
    {
        let node = validate_node(raw.node)?;
        let transfer = validate_transfer(raw.transfer, &lookup)?;

        let jobs = raw
            .job
            .into_iter()
            .enumerate()
            .map(|(idx, job)| validate_job(idx, job, &transfer, &lookup))
            .collect::<Result<Vec<_>>>()?;

        if !jobs.is_empty() && transfer.recipient.is_none() {
            return Err(config_err(
                "transfer jobs are configured but no recipient is set: \
                 set USER_ADDRESS, pass --recipient or set [transfer].recipient",
            ));
        }

        Ok(ConfigFile {
            node,
            transfer,
            jobs,
        })
    }
}

fn config_err(msg: impl Into<String>) -> ForkseedError {
    ForkseedError::ConfigError(msg.into())
}

fn validate_node(node: NodeSection) -> Result<NodeSettings> {
    if node.port == 0 {
        return Err(config_err("[node].port must be non-zero"));
    }
    if node.anvil.trim().is_empty() || node.cast.trim().is_empty() {
        return Err(config_err("[node].anvil and [node].cast must not be empty"));
    }
    if node.host.trim().is_empty() {
        return Err(config_err("[node].host must not be empty"));
    }

    let ready_pattern = if node.ready_pattern.is_empty() {
        None
    } else {
        Some(Regex::new(&node.ready_pattern).map_err(|e| {
            config_err(format!(
                "[node].ready_pattern '{}' is not a valid regex: {e}",
                node.ready_pattern
            ))
        })?)
    };

    let api_key = node
        .api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    Ok(NodeSettings {
        anvil: node.anvil,
        cast: node.cast,
        host: node.host,
        port: node.port,
        fork_url_base: node.fork_url_base.trim_end_matches('/').to_string(),
        api_key,
        fork_block_number: node.fork_block_number,
        ready_pattern,
        extra_args: node.extra_args,
        stderr_policy: node.stderr,
    })
}

fn validate_transfer<F>(section: TransferSection, lookup: &F) -> Result<TransferSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let recipient = match section.recipient {
        Some(raw) => {
            let expanded = expand_vars(&raw, lookup)
                .map_err(|e| config_err(format!("[transfer].recipient: {e}")))?;
            Some(
                expanded
                    .parse::<Address>()
                    .map_err(|e| config_err(format!("[transfer].recipient: {e}")))?,
            )
        }
        None => None,
    };

    let DelaySection {
        erc721,
        erc20,
        ether,
    } = section.delay;

    Ok(TransferSettings {
        recipient,
        stderr_policy: section.stderr,
        erc721_delay: delay_field("[transfer.delay].erc721", &erc721)?,
        erc20_delay: delay_field("[transfer.delay].erc20", &erc20)?,
        ether_delay: delay_field("[transfer.delay].ether", &ether)?,
    })
}

fn delay_field(label: &str, value: &str) -> Result<Duration> {
    parse_duration(value).map_err(|e| config_err(format!("{label}: {e}")))
}

fn validate_job<F>(
    idx: usize,
    job: RawJob,
    defaults: &TransferSettings,
    lookup: &F,
) -> Result<TransferJob>
where
    F: Fn(&str) -> Option<String>,
{
    let (name, delay, stderr, kind) = match &job {
        RawJob::Erc721 {
            name, delay, stderr, ..
        } => (name, delay, stderr, AssetKind::Erc721),
        RawJob::Erc20 {
            name, delay, stderr, ..
        } => (name, delay, stderr, AssetKind::Erc20),
        RawJob::Ether {
            name, delay, stderr, ..
        } => (name, delay, stderr, AssetKind::Ether),
    };

    let name = name
        .clone()
        .unwrap_or_else(|| format!("{kind}-{}", idx + 1));
    let label = format!("job '{name}'");

    let delay = match delay {
        Some(d) => delay_field(&format!("{label} delay"), d)?,
        None => match kind {
            AssetKind::Erc721 => defaults.erc721_delay,
            AssetKind::Erc20 => defaults.erc20_delay,
            AssetKind::Ether => defaults.ether_delay,
        },
    };
    let stderr_policy = stderr.unwrap_or(defaults.stderr_policy);

    let text = |field: &str, raw: &str| -> Result<String> {
        expand_vars(raw, lookup).map_err(|e| config_err(format!("{label} `{field}`: {e}")))
    };
    let address = |field: &str, raw: &str| -> Result<Address> {
        text(field, raw)?
            .parse::<Address>()
            .map_err(|e| config_err(format!("{label} `{field}`: {e}")))
    };

    let asset = match job {
        RawJob::Erc721 {
            contract,
            from,
            token_ids,
            ..
        } => {
            if token_ids.is_empty() {
                return Err(config_err(format!(
                    "{label} must list at least one entry in `token_ids`"
                )));
            }
            Asset::Erc721 {
                contract: address("contract", &contract)?,
                from: address("from", &from)?,
                token_ids,
            }
        }
        RawJob::Erc20 {
            contract,
            from,
            amount,
            ..
        } => {
            let amount = match amount {
                RawAmount::Integer(n) => u128::from(n),
                RawAmount::Text(raw) => parse_token_amount(&text("amount", &raw)?)
                    .map_err(|e| config_err(format!("{label} `amount`: {e}")))?,
            };
            Asset::Erc20 {
                contract: address("contract", &contract)?,
                from: address("from", &from)?,
                amount,
            }
        }
        RawJob::Ether {
            from,
            private_key,
            value,
            ..
        } => {
            let private_key = text("private_key", &private_key)?
                .parse::<PrivateKey>()
                .map_err(|e| config_err(format!("{label} `private_key`: {e}")))?;
            let wei = parse_ether(&text("value", &value)?)
                .map_err(|e| config_err(format!("{label} `value`: {e}")))?;
            Asset::Ether {
                from: address("from", &from)?,
                private_key,
                wei,
            }
        }
    };

    Ok(TransferJob {
        name,
        asset,
        delay,
        stderr_policy,
    })
}
