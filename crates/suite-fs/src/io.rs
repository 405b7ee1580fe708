//! Atomic I/O operations with file locking

use backoff::{ExponentialBackoff, retry};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::{Error, Result};

/// Retry policy for operations that can fail transiently, such as a rename
/// racing with a virus scanner or a directory removal racing with an indexer.
#[derive(Debug, Clone, Copy)]
pub struct RobustnessConfig {
    /// Total time to keep retrying before giving up.
    pub max_elapsed: Duration,
    /// Delay before the first retry.
    pub initial_interval: Duration,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            max_elapsed: Duration::from_secs(2),
            initial_interval: Duration::from_millis(20),
        }
    }
}

impl RobustnessConfig {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_elapsed: Duration::ZERO,
            initial_interval: Duration::from_millis(1),
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_interval,
            max_elapsed_time: Some(self.max_elapsed),
            ..ExponentialBackoff::default()
        }
    }

    fn retry<T>(&self, mut op: impl FnMut() -> std::io::Result<T>) -> std::io::Result<T> {
        retry(self.backoff(), || {
            op().map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::InvalidInput => {
                    backoff::Error::permanent(e)
                }
                _ => backoff::Error::transient(e),
            })
        })
        .map_err(|e| match e {
            backoff::Error::Permanent(e) => e,
            backoff::Error::Transient { err, .. } => err,
        })
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial file.
pub fn write_atomic(path: &Path, content: &[u8], robustness: RobustnessConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    drop(temp_file);

    robustness
        .retry(|| fs::rename(&temp_path, path))
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Error::io(path, e)
        })?;

    Ok(())
}

/// Write content atomically and mark the result executable (0755 on Unix).
pub fn write_executable(path: &Path, content: &str, robustness: RobustnessConfig) -> Result<()> {
    write_atomic(path, content.as_bytes(), robustness)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .map_err(|e| Error::io(path, e))?;
    }

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Remove a file or directory tree if present. Missing paths are not an error.
pub fn remove_tree(path: &Path, robustness: RobustnessConfig) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io(path, e)),
    };

    tracing::debug!(path = %path.display(), "Removing existing content");

    let result = if metadata.is_dir() {
        robustness.retry(|| fs::remove_dir_all(path))
    } else {
        robustness.retry(|| fs::remove_file(path))
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}
