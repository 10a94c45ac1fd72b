#![allow(dead_code)]

use std::time::Duration;

use forkseed::chain::{Address, PrivateKey};
use forkseed::transfer::{Asset, CastCommands, TransferJob};
use forkseed::types::StderrPolicy;

pub const RPC_URL: &str = "http://127.0.0.1:8545";
pub const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const HOLDER: &str = "0xF977814e90dA44bFA03b6295A0616a897441aceC";
pub const NFT_CONTRACT: &str = "0x5726C14663A1EaD4A7D320E8A653c9710b2A2E89";
pub const TOKEN_CONTRACT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
pub const DEV_ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn addr(s: &str) -> Address {
    s.parse().expect("valid test address")
}

pub fn cast_commands() -> CastCommands {
    CastCommands::new("cast", RPC_URL)
}

/// Builder for `TransferJob` to simplify test setup.
pub struct JobBuilder {
    job: TransferJob,
}

impl JobBuilder {
    pub fn erc721(name: &str, token_ids: &[u64]) -> Self {
        Self::with_asset(
            name,
            Asset::Erc721 {
                contract: addr(NFT_CONTRACT),
                from: addr(HOLDER),
                token_ids: token_ids.to_vec(),
            },
            Duration::from_secs(2),
        )
    }

    pub fn erc20(name: &str, amount: u128) -> Self {
        Self::with_asset(
            name,
            Asset::Erc20 {
                contract: addr(TOKEN_CONTRACT),
                from: addr(HOLDER),
                amount,
            },
            Duration::from_secs(2),
        )
    }

    pub fn ether(name: &str, wei: u128) -> Self {
        Self::with_asset(
            name,
            Asset::Ether {
                from: addr(DEV_ACCOUNT),
                private_key: DEV_KEY.parse::<PrivateKey>().expect("valid test key"),
                wei,
            },
            Duration::from_secs(5),
        )
    }

    fn with_asset(name: &str, asset: Asset, delay: Duration) -> Self {
        Self {
            job: TransferJob {
                name: name.to_string(),
                asset,
                delay,
                stderr_policy: StderrPolicy::Fail,
            },
        }
    }

    /// Replace the sender (and impersonated account) of token jobs.
    pub fn sender(mut self, from_addr: &str) -> Self {
        match &mut self.job.asset {
            Asset::Erc721 { from, .. } | Asset::Erc20 { from, .. } | Asset::Ether { from, .. } => {
                *from = addr(from_addr);
            }
        }
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.job.delay = delay;
        self
    }

    pub fn stderr_policy(mut self, policy: StderrPolicy) -> Self {
        self.job.stderr_policy = policy;
        self
    }

    pub fn build(self) -> TransferJob {
        self.job
    }
}
