use std::io;
use thiserror::Error;

/// Failures of the dispatcher itself.
///
/// A collaborator that runs and exits non-zero is not represented here: its
/// code is the normal result of dispatch and is propagated verbatim. These
/// variants cover what can go wrong before, or instead of, a collaborator
/// run.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// `KIND` was neither exported nor passed via `--kind` while strict
    /// resolution was in effect.
    #[error("required variable KIND is not set (export KIND, pass --kind, or run with --lenient)")]
    MissingKind,

    /// The collaborator launcher could not be spawned at all.
    #[error("failed to launch `{command}`: {source}")]
    Launch { command: String, source: io::Error },
}

impl DispatchError {
    /// The process exit code carrying this error, following shell
    /// conventions: 2 for configuration misuse, 127 for a launcher that is
    /// missing, 126 for one that is not executable.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingKind => 2,
            Self::Launch { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => 127,
                io::ErrorKind::PermissionDenied => 126,
                _ => 1,
            },
        }
    }
}
