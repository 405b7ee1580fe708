//! Suite creation and editing commands
//!
//! Every edit loads the suite, applies one change and saves it back, which
//! regenerates all dispatch stubs.

use std::path::Path;

use colored::Colorize;

use suite_context::{Context, ResolvedContext};
use suite_core::{Suite, SuiteConfig};
use suite_fs::SuiteLayout;

use crate::error::{CliError, Result};

/// Run the init command
///
/// Refuses to touch an existing directory, since saving replaces its content.
pub fn run_init(path: &Path, config: &SuiteConfig) -> Result<()> {
    if SuiteLayout::new(path).is_suite() {
        return Err(CliError::user(format!(
            "{} is already a suite",
            path.display()
        )));
    }
    if path.exists() {
        return Err(CliError::user(format!(
            "{} already exists",
            path.display()
        )));
    }

    let mut suite: Suite = Suite::new();
    suite.save(path, &config.stub_generator()?)?;
    println!(
        "{} Created empty suite at {}",
        "OK".green().bold(),
        path.display().to_string().cyan()
    );
    Ok(())
}

/// Run the add command
///
/// Creates the suite when `path` does not exist yet.
pub fn run_add(
    path: &Path,
    context_file: &Path,
    name: &str,
    description: Option<&str>,
    config: &SuiteConfig,
) -> Result<()> {
    println!("{} Adding context: {}", "=>".blue().bold(), name.cyan());

    let mut suite = if path.exists() {
        Suite::load(path)?
    } else {
        tracing::debug!(path = %path.display(), "Creating new suite");
        Suite::new()
    };

    let context = ResolvedContext::load(context_file)?;
    suite.add_context(name, context, description)?;
    save(&mut suite, path, config)?;

    let exposed = suite.tool_table()?.for_context(name).len();
    println!(
        "{} Context {} added ({} tools exposed).",
        "OK".green().bold(),
        name.cyan(),
        exposed
    );
    Ok(())
}

/// Load the suite at `path`, apply `edit` and save it back.
pub fn run_edit<F>(path: &Path, config: &SuiteConfig, action: &str, edit: F) -> Result<()>
where
    F: FnOnce(&mut Suite) -> suite_core::Result<()>,
{
    let mut suite = Suite::load(path)?;
    edit(&mut suite)?;
    save(&mut suite, path, config)?;

    println!("{} {}", "OK".green().bold(), action);
    Ok(())
}

fn save(suite: &mut Suite, path: &Path, config: &SuiteConfig) -> Result<()> {
    suite.save(path, &config.stub_generator()?)?;
    let conflicts = suite.conflicting_aliases()?;
    if !conflicts.is_empty() {
        eprintln!(
            "{} {} shadowed by higher-priority contexts: {}",
            "warning:".yellow().bold(),
            if conflicts.len() == 1 { "tool" } else { "tools" },
            conflicts.join(", ")
        );
    }
    Ok(())
}
