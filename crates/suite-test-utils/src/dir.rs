//! [`TestDir`] for suite scenarios on disk.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use suite_context::{ResolvedContext, ResolvedPackage};

/// A temporary directory with helpers for context snapshots and saved suites.
///
/// # Example
///
/// ```rust,no_run
/// use suite_test_utils::TestDir;
///
/// let dir = TestDir::new();
/// let maya = dir.write_snapshot("maya.json", &TestDir::snapshot("maya", &["maya", "mayapy"]));
/// dir.assert_file_exists("maya.json");
/// ```
pub struct TestDir {
    temp_dir: TempDir,
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// A solved context with one requested package providing `tools`.
    pub fn snapshot(package: &str, tools: &[&str]) -> ResolvedContext {
        ResolvedContext::new().with_package(ResolvedPackage::new(package).tools(tools.iter().copied()))
    }

    /// Write `context` as JSON at `relative` and return its full path.
    pub fn write_snapshot(&self, relative: &str, context: &ResolvedContext) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, serde_json::to_string_pretty(context).unwrap()).unwrap();
        path
    }

    /// Names of the stubs in `<suite>/bin`, sorted.
    pub fn stub_names(&self, suite: &str) -> Vec<String> {
        let bin = self.path(suite).join("bin");
        let mut names: Vec<String> = fs::read_dir(&bin)
            .unwrap_or_else(|_| panic!("Could not read {}", bin.display()))
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to the root) contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.path(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
