//! Exposed tool listing

use std::path::Path;

use suite_core::Suite;

use crate::error::Result;

/// Run the tools command
///
/// Prints one exposed alias per line, or the full tool records as JSON.
pub fn run_tools(path: &Path, json: bool) -> Result<()> {
    let mut suite: Suite = Suite::load(path)?;
    let tools = suite.tools()?;

    if json {
        let records: Vec<_> = tools.values().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for alias in tools.keys() {
            println!("{alias}");
        }
    }
    Ok(())
}
