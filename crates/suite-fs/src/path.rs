//! Name validation and path resolution

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Validate that `value` can be used as a single file name.
///
/// Context names become `contexts/<name>.<ext>` and tool aliases become
/// `bin/<alias>`, so neither may be empty, contain a separator, or
/// traverse out of its directory.
pub fn validate_path_identifier(value: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::InvalidIdentifier {
            value: value.to_string(),
            reason: reason.to_string(),
        })
    };

    if value.is_empty() {
        return invalid("must not be empty");
    }
    if value == "." || value == ".." {
        return invalid("must not be a relative path component");
    }
    if value.contains(['/', '\\']) {
        return invalid("must not contain path separators");
    }
    if value.chars().any(|c| c == '\0' || c.is_control()) {
        return invalid("must not contain control characters");
    }
    Ok(())
}

/// Validate a fragment (prefix or suffix) that is concatenated into a file name.
///
/// Unlike [`validate_path_identifier`], empty fragments are allowed.
pub fn validate_name_fragment(value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    if value.contains(['/', '\\']) || value.chars().any(|c| c == '\0' || c.is_control()) {
        return Err(Error::InvalidIdentifier {
            value: value.to_string(),
            reason: "must not contain path separators or control characters".to_string(),
        });
    }
    Ok(())
}

/// Resolve a path to its real location, following symlinks.
///
/// Uses `dunce` so Windows results stay free of `\\?\` prefixes.
pub fn resolve_real(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(|e| Error::io(path, e))
}
