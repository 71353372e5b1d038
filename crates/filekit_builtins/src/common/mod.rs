pub mod logging;

use std::io;
use std::path::PathBuf;

/// Result type for built-in commands
pub type BuiltinResult<T> = Result<T, BuiltinError>;

/// Error type for built-in command execution
#[derive(Debug, thiserror::Error)]
pub enum BuiltinError {
    #[error("cannot access '{}': {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open directory '{}': Not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot open directory '{}': {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot access '{}': {source}", path.display())]
    EntryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot dereference '{}': {source}", path.display())]
    BrokenLink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// How far a failure reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// One entry or one subdirectory was skipped.
    Minor,
    /// A whole operand could not be listed.
    Serious,
    /// Output could not be written; the call stopped.
    Fatal,
}

impl BuiltinError {
    pub fn severity(&self) -> Severity {
        match self {
            BuiltinError::RootUnreadable { .. } | BuiltinError::NotADirectory(_) => Severity::Serious,
            BuiltinError::DirectoryUnreadable { .. }
            | BuiltinError::EntryUnavailable { .. }
            | BuiltinError::BrokenLink { .. } => Severity::Minor,
            BuiltinError::Io(_) => Severity::Fatal,
        }
    }

    /// Path the failure is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            BuiltinError::RootUnreadable { path, .. }
            | BuiltinError::DirectoryUnreadable { path, .. }
            | BuiltinError::EntryUnavailable { path, .. }
            | BuiltinError::BrokenLink { path, .. } => Some(path),
            BuiltinError::NotADirectory(path) => Some(path),
            BuiltinError::Io(_) => None,
        }
    }
}
