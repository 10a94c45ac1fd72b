// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] defines structured invocations (`CommandSpec`) and their
//!   captured output.
//! - [`backend`] provides the `CommandExecutor` trait and the concrete
//!   `ProcessExecutor` used in production, which tests replace with a fake.
//! - [`stream`] runs long-lived processes while forwarding their output to
//!   the log line by line.

pub mod backend;
pub mod command;
pub mod stream;

pub use backend::{CommandExecutor, ProcessExecutor, judge_output};
pub use command::{CommandOutput, CommandSpec, Invocation};
pub use stream::{StreamHandle, StreamOptions, spawn_streaming};
