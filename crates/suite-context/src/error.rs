//! Error types for context operations

use std::path::PathBuf;

/// Errors that can occur while loading, saving or executing a context
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem error while reading or writing a snapshot
    #[error(transparent)]
    Fs(#[from] suite_fs::Error),

    /// Snapshot could not be serialized
    #[error("Failed to serialize context: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The requested shell could not be located
    #[error("Shell not found: {shell}")]
    ShellNotFound {
        /// The shell name or path that was searched for
        shell: String,
    },

    /// The shell process could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        /// Resolved path of the shell executable
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The context's environment cannot be applied
    #[error("Invalid environment: {message}")]
    InvalidEnvironment {
        /// What was wrong with it
        message: String,
    },
}

/// Result type alias for context operations
pub type Result<T> = std::result::Result<T, Error>;
