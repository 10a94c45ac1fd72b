// src/transfer/job.rs

use std::time::Duration;

use crate::chain::{Address, PrivateKey};
use crate::types::{AssetKind, StderrPolicy};

/// One validated transfer descriptor.
///
/// Built once from configuration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferJob {
    pub name: String,
    pub asset: Asset,
    /// Pause after every transfer command of this job.
    pub delay: Duration,
    pub stderr_policy: StderrPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    /// Non-fungible tokens moved by id with `safeTransferFrom`, sender
    /// impersonated.
    Erc721 {
        contract: Address,
        from: Address,
        token_ids: Vec<u64>,
    },
    /// Fungible tokens moved with `transfer`, sender impersonated.
    Erc20 {
        contract: Address,
        from: Address,
        amount: u128,
    },
    /// Native value signed with a known key.
    Ether {
        from: Address,
        private_key: PrivateKey,
        wei: u128,
    },
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Erc721 { .. } => AssetKind::Erc721,
            Asset::Erc20 { .. } => AssetKind::Erc20,
            Asset::Ether { .. } => AssetKind::Ether,
        }
    }

    /// Address that must be impersonated before the transfer, if any.
    pub fn impersonated(&self) -> Option<&Address> {
        match self {
            Asset::Erc721 { from, .. } | Asset::Erc20 { from, .. } => Some(from),
            Asset::Ether { .. } => None,
        }
    }
}

impl TransferJob {
    pub fn kind(&self) -> AssetKind {
        self.asset.kind()
    }
}
