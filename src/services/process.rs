//! Child-process plumbing shared by the dispatch handlers.

use crate::error::DispatchError;

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// A fully constructed collaborator invocation: program, arguments, and an
/// environment overlay applied on top of the inherited environment.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<String>,
    env_overlay: Vec<(String, String)>,
}

impl CommandSpec {
    /// Starts a specification for `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), env_overlay: Vec::new() }
    }

    /// Appends arguments in order.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds one variable to the child's copy of the environment. The
    /// dispatcher's own environment is left untouched.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_overlay.push((key.into(), value.into()));
        self
    }

    /// Program the child will execute.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments in order.
    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.args
    }

    /// Environment overlay entries in order.
    #[must_use]
    pub fn env_overlay(&self) -> &[(String, String)] {
        &self.env_overlay
    }

    /// The xtrace form of this invocation: `+ KEY=VALUE prog arg ...`.
    #[must_use]
    pub fn trace_line(&self) -> String {
        let mut line = String::from("+");
        for (key, value) in &self.env_overlay {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            line.push_str(&shell_word(value));
        }
        line.push(' ');
        line.push_str(&shell_word(&self.program.display().to_string()));
        for arg in &self.args {
            line.push(' ');
            line.push_str(&shell_word(arg));
        }
        line
    }

    /// Echoes the trace line to stderr, spawns the child with inherited
    /// stdio, and blocks until it exits.
    ///
    /// # Result
    /// The code this process should exit with: the child's own exit code, or
    /// `128 + signal` when the child died by a signal.
    ///
    /// # Errors
    /// Returns [`DispatchError::Launch`] when the program cannot be spawned
    /// at all; a child that runs and fails is reported through the returned
    /// code instead.
    pub fn status(self) -> Result<i32, DispatchError> {
        eprintln!("{}", self.trace_line());

        let status = Command::new(&self.program)
            .args(&self.args)
            .envs(self.env_overlay.iter().map(|(key, value)| (key, value)))
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| DispatchError::Launch {
                command: self.program.display().to_string(),
                source,
            })?;

        let code = exit_code(status);
        tracing::debug!(command = %self.program.display(), code, "collaborator finished");
        Ok(code)
    }
}

/// Maps a wait status to a process exit code: the child's own code, or the
/// shell convention `128 + signal` for a signal death on Unix.
fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(1)
}

/// Quotes a word for the trace line when a shell would split or expand it.
/// The fixed argv words of both branches stay unquoted.
fn shell_word(word: &str) -> Cow<'_, str> {
    let needs_quoting = word.is_empty()
        || word.chars().any(|c| {
            c.is_whitespace()
                || matches!(
                    c,
                    '\'' | '"' | '$' | '`' | '\\' | '!' | '*' | '?' | '&' | '|' | ';' | '<' | '>'
                        | '(' | ')' | '#' | '~'
                )
        });

    if !needs_quoting {
        return Cow::Borrowed(word);
    }

    let mut quoted = String::with_capacity(word.len() + 2);
    quoted.push('\'');
    for c in word.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    Cow::Owned(quoted)
}
