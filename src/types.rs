use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// What a successful (exit code zero) command means when it also wrote to
/// stderr.
///
/// - `Fail`: treat any stderr output as a failure of the command.
/// - `Log`: log stderr at `warn` and keep the successful result. Most CLI
///   tools print diagnostics there even when they succeed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StderrPolicy {
    #[default]
    Fail,
    Log,
}

impl FromStr for StderrPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Ok(StderrPolicy::Fail),
            "log" => Ok(StderrPolicy::Log),
            other => Err(format!(
                "invalid stderr policy: {other} (expected \"fail\" or \"log\")"
            )),
        }
    }
}

impl fmt::Display for StderrPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StderrPolicy::Fail => f.write_str("fail"),
            StderrPolicy::Log => f.write_str("log"),
        }
    }
}

/// Kind of asset a transfer job moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Erc721,
    Erc20,
    Ether,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Erc721 => f.write_str("erc721"),
            AssetKind::Erc20 => f.write_str("erc20"),
            AssetKind::Ether => f.write_str("ether"),
        }
    }
}
