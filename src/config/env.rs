// src/config/env.rs

//! `${VAR}` expansion for configuration strings.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid variable regex")
});

/// Replace every `${NAME}` in `input` with `lookup(NAME)`.
///
/// Fails on the first variable `lookup` cannot resolve. Text without
/// references is returned unchanged.
pub fn expand_vars<F>(input: &str, lookup: F) -> Result<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing: Option<String> = None;

    let expanded = VAR_RE.replace_all(input, |caps: &Captures<'_>| {
        let name = &caps[1];
        match lookup(name) {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(format!("environment variable '{name}' is not set")),
        None => Ok(expanded.into_owned()),
    }
}

/// Lookup backed by the process environment. Empty values count as unset.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "USER_ADDRESS" => Some("0xabc".to_string()),
            "PORT" => Some("8545".to_string()),
            _ => None,
        }
    }

    #[test]
    fn expands_known_variables() {
        assert_eq!(expand_vars("${USER_ADDRESS}", lookup).unwrap(), "0xabc");
        assert_eq!(
            expand_vars("http://127.0.0.1:${PORT}/", lookup).unwrap(),
            "http://127.0.0.1:8545/"
        );
        assert_eq!(expand_vars("plain $PORT", lookup).unwrap(), "plain $PORT");
    }

    #[test]
    fn reports_first_missing_variable() {
        let err = expand_vars("${NOPE}-${ALSO_NOPE}", lookup).unwrap_err();
        assert!(err.contains("'NOPE'"), "{err}");
    }
}
