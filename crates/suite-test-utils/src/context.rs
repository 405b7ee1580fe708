//! [`FakeContext`] for exercising suites without real environments.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use suite_context::{Context, Error, Result, ShellRequest, ToolListing, Variant};
use suite_fs::{RobustnessConfig, io};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FakeListing {
    variant: Variant,
    tools: Vec<String>,
}

/// A context whose tools and shell behaviour are set by the test.
///
/// Clones share the listing counter and the request log, so a test can keep
/// a handle after moving the context into a suite.
///
/// ```rust,no_run
/// use suite_test_utils::FakeContext;
///
/// let maya = FakeContext::new().with_tools("maya", ["maya", "mayapy"]);
/// let calls = maya.listing_counter();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FakeContext {
    #[serde(default = "resolved_default")]
    resolved: bool,
    #[serde(default)]
    listings: Vec<FakeListing>,
    #[serde(default)]
    exit_code: i32,
    #[serde(default)]
    fail_shell: bool,
    #[serde(skip)]
    listing_calls: Rc<Cell<usize>>,
    #[serde(skip)]
    requests: Rc<RefCell<Vec<ShellRequest>>>,
}

fn resolved_default() -> bool {
    true
}

impl Default for FakeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeContext {
    /// A resolved context with no tools whose shell exits 0.
    pub fn new() -> Self {
        Self {
            resolved: true,
            listings: Vec::new(),
            exit_code: 0,
            fail_shell: false,
            listing_calls: Rc::default(),
            requests: Rc::default(),
        }
    }

    /// Add an unversioned package providing `tools`.
    pub fn with_tools<I, S>(self, package: &str, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_listing(Variant::new(package), tools)
    }

    pub fn with_listing<I, S>(mut self, variant: Variant, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.listings.push(FakeListing {
            variant,
            tools: tools.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Mark the context as a failed resolve.
    pub fn unresolved(mut self) -> Self {
        self.resolved = false;
        self
    }

    /// Exit code returned by every shell run.
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Make every shell run fail to start.
    pub fn failing_shell(mut self) -> Self {
        self.fail_shell = true;
        self
    }

    /// Shared count of [`Context::tools`] calls.
    pub fn listing_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.listing_calls)
    }

    /// Shell requests received so far.
    pub fn requests(&self) -> Vec<ShellRequest> {
        self.requests.borrow().clone()
    }
}

impl Context for FakeContext {
    const EXTENSION: &'static str = "json";

    fn load(path: &Path) -> Result<Self> {
        let content = io::read_text(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        io::write_atomic(path, content.as_bytes(), RobustnessConfig::none())?;
        Ok(())
    }

    fn is_resolved(&self) -> bool {
        self.resolved
    }

    fn tools(&self, _request_only: bool) -> Vec<ToolListing> {
        self.listing_calls.set(self.listing_calls.get() + 1);
        self.listings
            .iter()
            .map(|l| ToolListing::new(l.variant.clone(), l.tools.iter().cloned()))
            .collect()
    }

    fn execute_shell(&self, request: &ShellRequest) -> Result<i32> {
        self.requests.borrow_mut().push(request.clone());
        if self.fail_shell {
            return Err(Error::ShellNotFound {
                shell: request.shell.clone().unwrap_or_else(|| "fake".to_string()),
            });
        }
        Ok(self.exit_code)
    }
}
