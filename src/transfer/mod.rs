// src/transfer/mod.rs

//! Asset transfers on a running fork.
//!
//! - [`job`] holds the validated transfer descriptors.
//! - [`commands`] builds the `cast` invocations for each kind of transfer.
//! - [`runner`] executes jobs sequentially through a `CommandExecutor`.

pub mod commands;
pub mod job;
pub mod runner;

pub use commands::CastCommands;
pub use job::{Asset, TransferJob};
pub use runner::{AssetTransferrer, JobOutcome, PlannedStep, TransferReport};
