//! Error types for suite-core

use std::path::PathBuf;

/// Result type for suite-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in suite-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A context with this name is already in the suite
    #[error("Context already in suite: {name:?}")]
    DuplicateName { name: String },

    /// No context with this name is in the suite
    #[error("No such context: {name:?}")]
    UnknownContext { name: String },

    /// The context did not resolve successfully
    #[error("Context is not resolved: {name:?}")]
    UnresolvedContext { name: String },

    /// Directory exists but has no suite metadata
    #[error("Not a suite: {path}")]
    NotASuite { path: PathBuf },

    /// Suite metadata exists but cannot be used
    #[error("Failed loading suite at {path}: {message}")]
    CorruptSuite { path: PathBuf, message: String },

    /// Name cannot be used as a context name, alias, prefix or suffix
    #[error("Invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A file that should be a dispatch stub is not one
    #[error("Invalid dispatch stub at {path}: {message}")]
    InvalidStub { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from suite-fs
    #[error(transparent)]
    Fs(#[from] suite_fs::Error),

    /// Load, save or execution failure from a context
    #[error(transparent)]
    Context(#[from] suite_context::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode stub record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn unknown_context(name: &str) -> Self {
        Self::UnknownContext {
            name: name.to_string(),
        }
    }

    /// Map an identifier validation failure onto [`Error::InvalidName`].
    pub(crate) fn from_identifier(err: suite_fs::Error) -> Self {
        match err {
            suite_fs::Error::InvalidIdentifier { value, reason } => Self::InvalidName {
                name: value,
                reason,
            },
            other => Self::Fs(other),
        }
    }
}
