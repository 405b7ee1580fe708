//! Stub entry point

use std::path::Path;

use suite_context::ResolvedContext;
use suite_core::SuiteConfig;

use crate::error::Result;

/// Run the dispatch command and return the tool's exit code.
///
/// Writes nothing to stdout itself; that belongs to the tool.
pub fn run_dispatch(stub: &Path, args: &[String], config: &SuiteConfig) -> Result<i32> {
    let code = suite_core::dispatch::<ResolvedContext, _>(stub, args, config.invoke_options())?;
    tracing::debug!(stub = %stub.display(), code, "Tool exited");
    Ok(code)
}
