// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `forkseed`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "forkseed",
    version,
    about = "Run a local mainnet fork and seed a test wallet with assets.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Forkseed.toml` in the current working directory. A missing
    /// default file means built-in defaults with no transfer jobs.
    #[arg(long, global = true, value_name = "PATH", default_value = "Forkseed.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FORKSEED_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the commands that would run, execute nothing.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start a fork node and stream its output until it exits.
    Fork(ForkArgs),
    /// Impersonate holders and move assets to the recipient, then exit.
    Transfer(TransferArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ForkArgs {
    /// Provider API key appended to the fork URL.
    #[arg(long, env = "ALCHEMY_APIKEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Local port the node listens on.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Args)]
pub struct TransferArgs {
    /// Address receiving every asset.
    #[arg(long, env = "USER_ADDRESS")]
    pub recipient: Option<String>,

    /// Port of the running fork node.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcommands_parse_with_flags() {
        let args = CliArgs::try_parse_from([
            "forkseed",
            "--dry-run",
            "transfer",
            "--recipient",
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "--port",
            "9545",
        ])
        .unwrap();

        assert!(args.dry_run);
        match args.command {
            Command::Transfer(t) => {
                assert_eq!(t.port, Some(9545));
                assert!(t.recipient.unwrap().starts_with("0x7099"));
            }
            other => panic!("expected transfer, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args =
            CliArgs::try_parse_from(["forkseed", "fork", "--api-key", "ABC", "--log-level", "debug"])
                .unwrap();
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(matches!(args.command, Command::Fork(ref f) if f.api_key.as_deref() == Some("ABC")));
    }
}
