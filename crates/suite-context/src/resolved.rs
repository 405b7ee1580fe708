//! File-backed resolved environments
//!
//! A snapshot looks like:
//!
//! ```json
//! {
//!   "status": "solved",
//!   "packages": [
//!     { "name": "maya", "version": "2024.1", "requested": true, "tools": ["maya", "mayapy"] },
//!     { "name": "python", "version": "3.11", "requested": false, "tools": ["python"] }
//!   ],
//!   "environ": { "MAYA_LOCATION": "/opt/maya2024" },
//!   "path": ["/opt/maya2024/bin"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use suite_fs::{ConfigStore, Format, RobustnessConfig, io, resolve_real};

use crate::{Context, Error, Result, ShellInvocation, ShellRequest, ToolListing, Variant};

/// Outcome of the resolve that produced a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveStatus {
    #[default]
    Solved,
    Failed,
}

/// One package in a resolved environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPackage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Explicitly requested, as opposed to pulled in as a dependency
    #[serde(default = "default_requested")]
    pub requested: bool,
    #[serde(default)]
    pub tools: Vec<String>,
}

fn default_requested() -> bool {
    true
}

impl ResolvedPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            requested: true,
            tools: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Mark as a dependency rather than a requested package.
    pub fn implicit(mut self) -> Self {
        self.requested = false;
        self
    }

    pub fn variant(&self) -> Variant {
        Variant {
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }
}

/// A resolved environment read from a JSON snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedContext {
    #[serde(default)]
    pub status: ResolveStatus,
    #[serde(default)]
    pub packages: Vec<ResolvedPackage>,
    /// Variables set on top of the caller's environment
    #[serde(default)]
    pub environ: BTreeMap<String, String>,
    /// Entries prepended to `PATH`
    #[serde(default)]
    pub path: Vec<PathBuf>,
}

impl ResolvedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, package: ResolvedPackage) -> Self {
        self.packages.push(package);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environ.insert(key.into(), value.into());
        self
    }

    pub fn with_path(mut self, entry: impl Into<PathBuf>) -> Self {
        self.path.push(entry.into());
        self
    }

    /// Value for `PATH` with this context's entries in front of `base`,
    /// minus any entry that resolves to one of `hidden`.
    fn search_path(&self, base: Option<OsString>, hidden: &[PathBuf]) -> Result<Option<OsString>> {
        if self.path.is_empty() && (hidden.is_empty() || base.is_none()) {
            return Ok(base);
        }
        let hidden: Vec<_> = hidden.iter().map(|p| real_or_same(p)).collect();
        let mut entries = self.path.clone();
        if let Some(base) = base {
            entries.extend(std::env::split_paths(&base));
        }
        entries.retain(|entry| !hidden.contains(&real_or_same(entry)));

        std::env::join_paths(entries)
            .map(Some)
            .map_err(|e| Error::InvalidEnvironment {
                message: e.to_string(),
            })
    }

    fn apply_environment(&self, cmd: &mut Command, hidden: &[PathBuf]) -> Result<()> {
        cmd.envs(&self.environ);

        let base = self
            .environ
            .get("PATH")
            .map(OsString::from)
            .or_else(|| std::env::var_os("PATH"));
        if let Some(path) = self.search_path(base, hidden)? {
            cmd.env("PATH", path);
        }
        Ok(())
    }

    fn default_shell() -> String {
        std::env::var("SHELL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "sh".to_string())
    }
}

impl Context for ResolvedContext {
    const EXTENSION: &'static str = "json";

    fn load(path: &Path) -> Result<Self> {
        // Snapshots are JSON whatever the file is called
        let content = io::read_text(path)?;
        let context = ConfigStore::new().parse(path, Format::Json, &content)?;
        tracing::debug!(path = %path.display(), "Loaded context snapshot");
        Ok(context)
    }

    fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        io::write_atomic(path, content.as_bytes(), RobustnessConfig::default())?;
        Ok(())
    }

    fn is_resolved(&self) -> bool {
        self.status == ResolveStatus::Solved
    }

    fn tools(&self, request_only: bool) -> Vec<ToolListing> {
        self.packages
            .iter()
            .filter(|p| p.requested || !request_only)
            .filter(|p| !p.tools.is_empty())
            .map(|p| ToolListing::new(p.variant(), p.tools.iter().cloned()))
            .collect()
    }

    fn execute_shell(&self, request: &ShellRequest) -> Result<i32> {
        let shell = request.shell.clone().unwrap_or_else(Self::default_shell);
        let program = which::which(&shell).map_err(|_| Error::ShellNotFound {
            shell: shell.clone(),
        })?;

        let invocation = ShellInvocation::build(program, request);
        tracing::debug!(
            program = %invocation.program.display(),
            args = ?invocation.args,
            "Starting shell"
        );

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        self.apply_environment(&mut cmd, &request.hidden_path)?;
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }
        for key in &invocation.env_remove {
            cmd.env_remove(key);
        }

        let status = cmd.status().map_err(|source| Error::Spawn {
            program: invocation.program.clone(),
            source,
        })?;
        Ok(exit_code(status))
    }
}

fn real_or_same(path: &Path) -> PathBuf {
    resolve_real(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Exit code of a finished child, using the shell convention of
/// `128 + signal` for signal deaths.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ResolvedContext {
        ResolvedContext::new()
            .with_package(
                ResolvedPackage::new("maya")
                    .version("2024.1")
                    .tools(["maya", "mayapy"]),
            )
            .with_package(ResolvedPackage::new("python").version("3.11").tools(["python"]).implicit())
            .with_package(ResolvedPackage::new("license"))
    }

    #[test]
    fn test_tools_request_only() {
        let listings = sample().tools(true);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].variant.qualified_name(), "maya-2024.1");
        assert!(listings[0].tools.contains("mayapy"));
    }

    #[test]
    fn test_tools_including_dependencies() {
        let names: Vec<_> = sample()
            .tools(false)
            .into_iter()
            .map(|l| l.variant.name)
            .collect();
        assert_eq!(names, vec!["maya", "python"]);
    }

    #[test]
    fn test_failed_status_is_unresolved() {
        let context = ResolvedContext {
            status: ResolveStatus::Failed,
            ..sample()
        };
        assert!(!context.is_resolved());
        assert!(sample().is_resolved());
    }

    #[test]
    fn test_minimal_snapshot_defaults() {
        let context: ResolvedContext =
            serde_json::from_str(r#"{"packages": [{"name": "nuke", "tools": ["nuke"]}]}"#).unwrap();
        assert!(context.is_resolved());
        assert!(context.packages[0].requested);
        assert!(context.environ.is_empty());
    }

    #[test]
    fn test_search_path_prepends_entries() {
        let context = ResolvedContext::new().with_path("/opt/maya/bin");
        let base = std::env::join_paths(["/usr/bin", "/bin"]).unwrap();

        let path = context.search_path(Some(base), &[]).unwrap().unwrap();
        let entries: Vec<_> = std::env::split_paths(&path).collect();
        assert_eq!(
            entries,
            vec![
                PathBuf::from("/opt/maya/bin"),
                PathBuf::from("/usr/bin"),
                PathBuf::from("/bin")
            ]
        );
    }

    #[test]
    fn test_search_path_untouched_without_entries() {
        let base = OsString::from("/usr/bin");
        let path = ResolvedContext::new().search_path(Some(base.clone()), &[]).unwrap();
        assert_eq!(path, Some(base));
    }

    #[test]
    fn test_search_path_drops_hidden_entries() {
        let stubs = tempfile::tempdir().unwrap();
        let context = ResolvedContext::new();
        let base = std::env::join_paths([stubs.path(), Path::new("/usr/bin")]).unwrap();

        let path = context
            .search_path(Some(base), &[stubs.path().to_path_buf()])
            .unwrap()
            .unwrap();
        let entries: Vec<_> = std::env::split_paths(&path).collect();
        assert_eq!(entries, vec![PathBuf::from("/usr/bin")]);
    }
}
