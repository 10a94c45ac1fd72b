// src/exec/command.rs

//! Structured command invocations.
//!
//! A [`CommandSpec`] is a program plus an explicit argument vector. It is
//! handed straight to `tokio::process::Command` and never goes through a
//! shell, so addresses, keys and URLs cannot be interpreted as shell syntax.

use std::fmt;

use tokio::process::Command;

use crate::types::StderrPolicy;

/// Flags whose *following* argument must not appear in logs.
const SECRET_FLAGS: &[&str] = &["--private-key"];

const REDACTED: &str = "REDACTED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Value following `flag`, if the flag is present.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// Build the tokio command. Stdio configuration is left to the caller.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// Renders `program arg arg ...` with secrets masked. Arguments that a POSIX
/// shell would not take literally are single-quoted, so the rendering can be
/// pasted into a shell.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_shell_word(f, &self.program)?;
        let mut hide_next = false;
        for arg in &self.args {
            f.write_str(" ")?;
            if hide_next {
                f.write_str(REDACTED)?;
                hide_next = false;
                continue;
            }
            write_shell_word(f, arg)?;
            hide_next = SECRET_FLAGS.contains(&arg.as_str());
        }
        Ok(())
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | ',' | '@' | '%' | '+')
}

fn write_shell_word(f: &mut fmt::Formatter<'_>, word: &str) -> fmt::Result {
    if !word.is_empty() && word.chars().all(is_shell_safe) {
        return f.write_str(word);
    }
    f.write_str("'")?;
    f.write_str(&word.replace('\'', r"'\''"))?;
    f.write_str("'")
}

/// A command together with how its stderr should be judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub spec: CommandSpec,
    pub stderr_policy: StderrPolicy,
}

impl Invocation {
    pub fn new(spec: CommandSpec, stderr_policy: StderrPolicy) -> Self {
        Self { spec, stderr_policy }
    }
}

/// Captured output of a command that was judged successful.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_masks_private_key_and_quotes_signatures() {
        let spec = CommandSpec::new("cast")
            .args(["send", "0xabc", "--private-key", "0xdeadbeef"])
            .arg("transfer(address, uint256)");

        let rendered = spec.to_string();
        assert_eq!(
            rendered,
            "cast send 0xabc --private-key REDACTED 'transfer(address, uint256)'"
        );
        assert!(!rendered.contains("deadbeef"));
    }

    #[test]
    fn display_quotes_shell_metacharacters_only() {
        let spec = CommandSpec::new("cast").args([
            "safeTransferFrom(address,address,uint256)",
            "--rpc-url",
            "http://127.0.0.1:8545",
            "",
            "it's",
            "$HOME",
        ]);
        assert_eq!(
            spec.to_string(),
            r"cast 'safeTransferFrom(address,address,uint256)' --rpc-url http://127.0.0.1:8545 '' 'it'\''s' '$HOME'"
        );
    }

    #[test]
    fn flag_value_reads_following_argument() {
        let spec = CommandSpec::new("anvil").args(["--port", "8545", "--fork-url"]);
        assert_eq!(spec.flag_value("--port"), Some("8545"));
        assert_eq!(spec.flag_value("--fork-url"), None);
        assert_eq!(spec.flag_value("--host"), None);
    }
}
