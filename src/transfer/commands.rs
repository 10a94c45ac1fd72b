// src/transfer/commands.rs

//! Builders for the `cast` invocations used by the transferrer.
//!
//! Subcommands, flags and argument order match what the fork node and chain
//! client expect; do not reorder them.

use crate::chain::{Address, PrivateKey};
use crate::exec::CommandSpec;

pub const ERC721_TRANSFER_SIG: &str = "safeTransferFrom(address,address,uint256)";
pub const ERC20_TRANSFER_SIG: &str = "transfer(address,uint256)";
pub const IMPERSONATE_METHOD: &str = "anvil_impersonateAccount";

/// Builds `cast` command lines against one RPC endpoint.
#[derive(Debug, Clone)]
pub struct CastCommands {
    cast: String,
    rpc_url: String,
}

impl CastCommands {
    pub fn new(cast: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self {
            cast: cast.into(),
            rpc_url: rpc_url.into(),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// `cast rpc anvil_impersonateAccount <from> --rpc-url <rpc>`
    pub fn impersonate(&self, from: &Address) -> CommandSpec {
        CommandSpec::new(&self.cast)
            .args(["rpc", IMPERSONATE_METHOD, from.as_str()])
            .args(["--rpc-url", self.rpc_url.as_str()])
    }

    /// `cast send <contract> --from <from> "safeTransferFrom(...)" <from> <to> <id> --rpc-url <rpc> --unlocked`
    pub fn erc721_transfer(
        &self,
        contract: &Address,
        from: &Address,
        to: &Address,
        token_id: u64,
    ) -> CommandSpec {
        CommandSpec::new(&self.cast)
            .args(["send", contract.as_str(), "--from", from.as_str()])
            .arg(ERC721_TRANSFER_SIG)
            .args([from.as_str(), to.as_str()])
            .arg(token_id.to_string())
            .args(["--rpc-url", self.rpc_url.as_str(), "--unlocked"])
    }

    /// `cast send <contract> --from <from> "transfer(address,uint256)" <to> <amount> --rpc-url <rpc> --unlocked`
    pub fn erc20_transfer(
        &self,
        contract: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> CommandSpec {
        CommandSpec::new(&self.cast)
            .args(["send", contract.as_str(), "--from", from.as_str()])
            .arg(ERC20_TRANSFER_SIG)
            .arg(to.as_str())
            .arg(amount.to_string())
            .args(["--rpc-url", self.rpc_url.as_str(), "--unlocked"])
    }

    /// `cast send <to> --value <wei> --from <from> --private-key <key> --rpc-url <rpc>`
    pub fn ether_transfer(
        &self,
        from: &Address,
        private_key: &PrivateKey,
        to: &Address,
        wei: u128,
    ) -> CommandSpec {
        CommandSpec::new(&self.cast)
            .args(["send", to.as_str()])
            .arg("--value")
            .arg(wei.to_string())
            .args(["--from", from.as_str()])
            .args(["--private-key", private_key.expose()])
            .args(["--rpc-url", self.rpc_url.as_str()])
    }
}
