//! Directory layout of a saved suite
//!
//! ```text
//! <root>/
//!   suite.yaml
//!   contexts/<name>.<ext>
//!   bin/<alias>
//! ```

use std::path::{Path, PathBuf};

use crate::SuitePath;

/// Paths inside a suite root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteLayout {
    root: PathBuf,
}

impl SuiteLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Derive the layout from a stub path (`<root>/bin/<alias>`).
    ///
    /// Returns `None` when the stub is not inside a `bin` directory.
    pub fn from_stub(stub: &Path) -> Option<Self> {
        let bin = stub.parent()?;
        if bin.file_name()? != SuitePath::BinDir.as_str() {
            return None;
        }
        bin.parent().map(Self::new)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(SuitePath::Metadata)
    }

    pub fn contexts_dir(&self) -> PathBuf {
        self.root.join(SuitePath::ContextsDir)
    }

    /// Snapshot path for a context, e.g. `contexts/maya.json`.
    pub fn context_path(&self, name: &str, extension: &str) -> PathBuf {
        self.contexts_dir().join(format!("{name}.{extension}"))
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(SuitePath::BinDir)
    }

    pub fn stub_path(&self, alias: &str) -> PathBuf {
        self.bin_dir().join(alias)
    }

    /// Whether the metadata document is present.
    pub fn is_suite(&self) -> bool {
        self.metadata_path().is_file()
    }
}
