//! Tool namespace resolution
//!
//! Given every context in a suite, decide which context provides each exposed
//! alias. Contexts are visited from highest to lowest priority; the first to
//! claim an alias wins it and every later claimant is recorded as a conflict.
//! Resolution only looks at final alias strings, so an explicit alias in one
//! context can collide with a prefixed name from another.

use serde::Serialize;
use std::collections::BTreeMap;

use suite_context::{Context, Variant};
use suite_fs::validate_path_identifier;

use crate::suite::ContextMeta;

/// A tool as exposed by the suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteTool {
    /// Name of the tool inside its context
    pub tool_name: String,
    /// Name the suite exposes it under
    pub tool_alias: String,
    /// Context providing the tool
    pub context_name: String,
    /// Package providing the tool
    pub variant: Variant,
}

/// Result of one resolution pass: winners and shadowed claimants per alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolTable {
    tools: BTreeMap<String, SuiteTool>,
    conflicts: BTreeMap<String, Vec<SuiteTool>>,
}

impl ToolTable {
    /// Resolve the namespace for a set of contexts.
    pub fn resolve<'a, C, I>(entries: I) -> Self
    where
        C: Context + 'a,
        I: IntoIterator<Item = (&'a ContextMeta, &'a C)>,
    {
        let mut entries: Vec<_> = entries.into_iter().collect();
        // Priorities are unique within a suite; the name only matters for
        // hand-edited metadata that repeats a priority.
        entries.sort_by(|(a, _), (b, _)| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut table = Self::default();
        for (meta, context) in entries {
            for listing in context.tools(true) {
                for tool_name in &listing.tools {
                    if meta.hidden_tools.contains(tool_name) {
                        continue;
                    }
                    let tool_alias = meta.alias_for(tool_name);
                    // The alias names a file in bin/
                    if let Err(e) = validate_path_identifier(&tool_alias) {
                        tracing::warn!(
                            context = %meta.name,
                            tool = %tool_name,
                            error = %e,
                            "Skipping tool with unusable name"
                        );
                        continue;
                    }
                    let tool = SuiteTool {
                        tool_name: tool_name.clone(),
                        tool_alias,
                        context_name: meta.name.clone(),
                        variant: listing.variant.clone(),
                    };
                    table.claim(tool);
                }
            }
        }

        tracing::debug!(
            tools = table.tools.len(),
            conflicts = table.conflicts.len(),
            "Resolved suite tools"
        );
        table
    }

    fn claim(&mut self, tool: SuiteTool) {
        if self.tools.contains_key(&tool.tool_alias) {
            self.conflicts
                .entry(tool.tool_alias.clone())
                .or_default()
                .push(tool);
        } else {
            self.tools.insert(tool.tool_alias.clone(), tool);
        }
    }

    /// Winning tools keyed by alias.
    pub fn tools(&self) -> &BTreeMap<String, SuiteTool> {
        &self.tools
    }

    pub fn get(&self, alias: &str) -> Option<&SuiteTool> {
        self.tools.get(alias)
    }

    /// Tools shadowed under `alias`, most nearly winning first.
    ///
    /// Empty when the alias has no conflicts or is not exposed at all.
    pub fn conflicts(&self, alias: &str) -> &[SuiteTool] {
        self.conflicts.get(alias).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Aliases claimed by more than one context, sorted.
    pub fn conflicting_aliases(&self) -> Vec<&str> {
        self.conflicts.keys().map(String::as_str).collect()
    }

    /// Winning tools provided by one context, sorted by alias.
    pub fn for_context(&self, context_name: &str) -> Vec<&SuiteTool> {
        self.tools
            .values()
            .filter(|t| t.context_name == context_name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
