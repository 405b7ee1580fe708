//! Fixed names inside a suite directory.

use std::path::Path;

/// Standard entries of a suite root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuitePath {
    /// The metadata document (`suite.yaml`)
    Metadata,
    /// Directory holding one snapshot per context (`contexts`)
    ContextsDir,
    /// Directory holding one dispatch stub per exposed tool (`bin`)
    BinDir,
}

impl SuitePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metadata => "suite.yaml",
            Self::ContextsDir => "contexts",
            Self::BinDir => "bin",
        }
    }
}

impl AsRef<Path> for SuitePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SuitePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SuitePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
