// src/config/mod.rs

//! Configuration loading and validation for forkseed.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and the `.env` file (`loader.rs`).
//! - Expand `${VAR}` references (`env.rs`) and parse durations
//!   (`duration.rs`).
//! - Validate everything into a `ConfigFile` (`validate.rs`).

pub mod duration;
pub mod env;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_config_path, load_and_validate, load_dotenv, load_env_file, load_from_path,
    report_dotenv,
};
pub use model::{
    ConfigFile, DelaySection, NodeSection, NodeSettings, Overrides, RawAmount, RawConfigFile,
    RawJob, TransferSection, TransferSettings,
};
