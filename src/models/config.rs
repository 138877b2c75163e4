//! The run configuration: one ephemeral value, constructed from the process
//! environment at start, consumed by the single dispatch decision.

use crate::error::DispatchError;
use crate::models::args::Cli;

use std::env;
use std::path::PathBuf;

/// Environment variable selecting the run kind.
pub const KIND_VAR: &str = "KIND";

/// Environment variable overriding the collaborator launcher.
pub const CARGO_VAR: &str = "CARGO";

/// Run kinds, derived once at the boundary from the raw string. Anything
/// that is not an exact match falls through as `Unrecognized` and dispatches
/// to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Build,
    Integration,
    Unrecognized,
}

impl RunKind {
    /// Exact, case-sensitive mapping; the empty string is `Unrecognized`.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "build" => Self::Build,
            "integration" => Self::Integration,
            _ => Self::Unrecognized,
        }
    }
}

/// Process-scoped run configuration, passed by value into dispatch. Never
/// mutated and never shared across invocations.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Dispatch branch selector.
    pub kind: RunKind,
    /// The kind value as provided, kept for the skip notice. `None` only
    /// when `KIND` was absent under `--lenient`.
    pub raw_kind: Option<String>,
    /// Program used to launch both collaborators.
    pub cargo: PathBuf,
}

impl RunConfig {
    /// Builds the configuration from the parsed CLI and the process
    /// environment. `--kind` wins over `KIND`; the launcher honors `CARGO`
    /// and falls back to `cargo` on PATH.
    ///
    /// # Errors
    /// Returns [`DispatchError::MissingKind`] when no kind is available and
    /// the CLI did not ask for lenient resolution.
    pub fn resolve(cli: &Cli) -> Result<Self, DispatchError> {
        // A non-UTF-8 KIND degrades lossily: it can never equal a recognized
        // kind, so it takes the no-op branch rather than the missing branch.
        let env_kind = env::var_os(KIND_VAR).map(|raw| raw.to_string_lossy().into_owned());
        let cargo = env::var_os(CARGO_VAR).map_or_else(|| PathBuf::from("cargo"), PathBuf::from);

        Self::from_parts(cli.kind.clone(), env_kind, cli.lenient, cargo)
    }

    /// Environment-free core of [`RunConfig::resolve`].
    fn from_parts(
        cli_kind: Option<String>,
        env_kind: Option<String>,
        lenient: bool,
        cargo: PathBuf,
    ) -> Result<Self, DispatchError> {
        let raw_kind = cli_kind.or(env_kind);
        let kind = match &raw_kind {
            Some(raw) => RunKind::from_raw(raw),
            None if lenient => RunKind::Unrecognized,
            None => return Err(DispatchError::MissingKind),
        };

        Ok(Self { kind, raw_kind, cargo })
    }
}
