//! The `Context` trait and the types that cross it

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::Result;

/// A package build that provides tools. Opaque apart from its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variant {
    /// Package name
    pub name: String,
    /// Package version, if the package is versioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Variant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// `name-version`, or just `name` for unversioned packages.
    pub fn qualified_name(&self) -> String {
        match &self.version {
            Some(version) => format!("{}-{}", self.name, version),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// Tools provided by one variant of a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolListing {
    pub variant: Variant,
    pub tools: BTreeSet<String>,
}

impl ToolListing {
    pub fn new<I, S>(variant: Variant, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variant,
            tools: tools.into_iter().map(Into::into).collect(),
        }
    }
}

/// What to run inside the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Command-line text interpreted by the shell as typed (`+c echo $HOME`)
    Script(String),
    /// A program and its arguments, each passed through verbatim
    Argv(Vec<String>),
}

/// Everything a context needs to start its shell.
///
/// With no `command` the shell reads commands from stdin (`stdin = true`) or
/// runs interactively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellRequest {
    pub command: Option<ShellCommand>,
    pub stdin: bool,
    pub rcfile: Option<PathBuf>,
    pub norc: bool,
    /// Prompt for interactive shells
    pub prompt: Option<String>,
    /// Shell to use instead of the context's default
    pub shell: Option<String>,
    /// Directories dropped from `PATH`, such as the suite's own stub directory
    pub hidden_path: Vec<PathBuf>,
}

/// An already-resolved environment.
pub trait Context: Sized {
    /// Extension of snapshot files written by [`Context::save`].
    const EXTENSION: &'static str;

    /// Load a snapshot from disk.
    fn load(path: &Path) -> Result<Self>;

    /// Write a snapshot to disk.
    fn save(&self, path: &Path) -> Result<()>;

    /// Whether resolution succeeded. Unresolved contexts cannot join a suite.
    fn is_resolved(&self) -> bool;

    /// Tools exposed by this context, grouped by the variant providing them.
    ///
    /// With `request_only`, only packages explicitly requested by the
    /// environment are listed, not ones pulled in as dependencies.
    fn tools(&self, request_only: bool) -> Vec<ToolListing>;

    /// Run a shell inside this context and block until it exits.
    ///
    /// Returns the shell's exit code.
    fn execute_shell(&self, request: &ShellRequest) -> Result<i32>;
}
