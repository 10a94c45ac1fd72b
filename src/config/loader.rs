// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::model::{ConfigFile, Overrides, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate
/// addresses, durations or expand `${VAR}` references. Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load, apply command-line/environment overrides, and validate.
///
/// A missing file at the default location is not an error: the built-in
/// defaults (no jobs) are used instead. A missing file at any other path is.
pub fn load_and_validate(path: impl AsRef<Path>, overrides: &Overrides) -> Result<ConfigFile> {
    let path = path.as_ref();

    let mut raw = if !path.exists() && path == default_config_path() {
        warn!(path = %path.display(), "config file not found; using built-in defaults");
        RawConfigFile::default()
    } else {
        debug!(path = %path.display(), "loading config file");
        load_from_path(path)?
    };

    raw.apply_overrides(overrides);
    ConfigFile::try_from(raw)
}

/// `Forkseed.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Forkseed.toml")
}

/// Load `.env` from the working directory into the process environment.
///
/// Runs before logging is set up, so nothing is logged here; hand the result
/// to [`report_dotenv`] once the subscriber exists.
pub fn load_dotenv() -> std::result::Result<Option<PathBuf>, dotenvy::Error> {
    load_env_file(".env")
}

/// Load `path` into the process environment. Variables already set are left
/// untouched. A missing file is `Ok(None)`.
pub fn load_env_file(
    path: impl AsRef<Path>,
) -> std::result::Result<Option<PathBuf>, dotenvy::Error> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn report_dotenv(result: &std::result::Result<Option<PathBuf>, dotenvy::Error>) {
    match result {
        Ok(Some(path)) => debug!(path = %path.display(), "loaded environment file"),
        Ok(None) => debug!("no .env file found"),
        Err(e) => warn!(error = %e, "failed to load .env file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_env_file(dir.path().join(".env")), Ok(None)));
    }

    #[test]
    fn malformed_env_file_is_returned_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "THIS LINE IS NOT AN ASSIGNMENT\n").unwrap();

        let res = load_env_file(&path);
        assert!(res.is_err(), "{res:?}");
        report_dotenv(&res);
    }

    #[test]
    fn env_file_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "FORKSEED_LOADER_TEST_VALUE=from-file\n").unwrap();

        let loaded = load_env_file(&path).unwrap();
        assert_eq!(loaded.as_deref(), Some(path.as_path()));
        assert_eq!(
            std::env::var("FORKSEED_LOADER_TEST_VALUE").as_deref(),
            Ok("from-file")
        );
    }
}
