//! The suite registry
//!
//! A [`Suite`] owns a set of named contexts together with the override
//! metadata that shapes their tools into a single namespace. Contexts read
//! from disk stay unloaded until something needs them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use suite_context::{Context, ResolvedContext};
use suite_fs::{validate_name_fragment, validate_path_identifier};

use crate::tools::{SuiteTool, ToolTable};
use crate::{Error, Result};

/// Override metadata for one context in a suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Higher wins alias conflicts
    pub priority: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Original tool names left out of the namespace
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub hidden_tools: BTreeSet<String>,
    /// Original tool name to exposed name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tool_aliases: BTreeMap<String, String>,
}

impl ContextMeta {
    pub fn new(name: impl Into<String>, description: Option<String>, priority: u64) -> Self {
        Self {
            name: name.into(),
            description,
            priority,
            prefix: None,
            suffix: None,
            hidden_tools: BTreeSet::new(),
            tool_aliases: BTreeMap::new(),
        }
    }

    /// Name `tool_name` is exposed under.
    ///
    /// An explicit alias always beats prefix and suffix.
    pub fn alias_for(&self, tool_name: &str) -> String {
        if let Some(alias) = self.tool_aliases.get(tool_name) {
            return alias.clone();
        }
        format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or_default(),
            tool_name,
            self.suffix.as_deref().unwrap_or_default()
        )
    }
}

/// A context that may not have been read from disk yet.
#[derive(Debug)]
pub(crate) enum ContextSlot<C> {
    Unloaded(PathBuf),
    Loaded(C),
}

impl<C: Context> ContextSlot<C> {
    /// Load on first use.
    pub(crate) fn get(&mut self) -> Result<&C> {
        match self {
            Self::Loaded(context) => Ok(context),
            Self::Unloaded(path) => {
                tracing::debug!(path = %path.display(), "Loading context");
                *self = Self::Loaded(C::load(path)?);
                self.get()
            }
        }
    }

    pub(crate) fn loaded(&self) -> Option<&C> {
        match self {
            Self::Loaded(context) => Some(context),
            Self::Unloaded(_) => None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ContextEntry<C> {
    pub(crate) meta: ContextMeta,
    pub(crate) slot: ContextSlot<C>,
}

/// A set of contexts merged into one tool namespace.
#[derive(Debug)]
pub struct Suite<C: Context = ResolvedContext> {
    pub(crate) load_path: Option<PathBuf>,
    pub(crate) contexts: BTreeMap<String, ContextEntry<C>>,
    pub(crate) next_priority: u64,
    tools: Option<ToolTable>,
}

impl<C: Context> Default for Suite<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Context> Suite<C> {
    pub fn new() -> Self {
        Self {
            load_path: None,
            contexts: BTreeMap::new(),
            next_priority: 1,
            tools: None,
        }
    }

    /// Build a suite from stored entries. Used when loading from disk.
    pub(crate) fn from_entries(
        load_path: PathBuf,
        contexts: BTreeMap<String, ContextEntry<C>>,
    ) -> Self {
        let next_priority = contexts
            .values()
            .map(|e| e.meta.priority)
            .max()
            .map_or(1, |p| p + 1);
        Self {
            load_path: Some(load_path),
            contexts,
            next_priority,
            tools: None,
        }
    }

    /// Directory this suite was loaded from, if any.
    pub fn load_path(&self) -> Option<&Path> {
        self.load_path.as_deref()
    }

    /// Drop the cached tool table. Every successful mutation goes through here.
    fn commit(&mut self) {
        self.tools = None;
    }

    fn take_priority(&mut self) -> u64 {
        let priority = self.next_priority;
        self.next_priority += 1;
        priority
    }

    /// Add a context under `name` with the highest priority so far.
    pub fn add_context(&mut self, name: &str, context: C, description: Option<&str>) -> Result<()> {
        if self.contexts.contains_key(name) {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }
        validate_path_identifier(name).map_err(Error::from_identifier)?;
        if !context.is_resolved() {
            return Err(Error::UnresolvedContext {
                name: name.to_string(),
            });
        }

        let priority = self.take_priority();
        let meta = ContextMeta::new(name, description.map(str::to_string), priority);
        tracing::debug!(context = name, priority, "Adding context");
        self.contexts.insert(
            name.to_string(),
            ContextEntry {
                meta,
                slot: ContextSlot::Loaded(context),
            },
        );
        self.commit();
        Ok(())
    }

    pub fn remove_context(&mut self, name: &str) -> Result<()> {
        self.contexts
            .remove(name)
            .ok_or_else(|| Error::unknown_context(name))?;
        tracing::debug!(context = name, "Removed context");
        self.commit();
        Ok(())
    }

    /// Prefix every non-aliased tool of a context. Also bumps its priority.
    pub fn set_context_prefix(&mut self, name: &str, prefix: &str) -> Result<()> {
        validate_name_fragment(prefix).map_err(Error::from_identifier)?;
        let prefix = non_empty(prefix);
        self.edit(name, true, |meta| {
            meta.prefix = prefix;
            true
        })
    }

    /// Suffix every non-aliased tool of a context. Also bumps its priority.
    pub fn set_context_suffix(&mut self, name: &str, suffix: &str) -> Result<()> {
        validate_name_fragment(suffix).map_err(Error::from_identifier)?;
        let suffix = non_empty(suffix);
        self.edit(name, true, |meta| {
            meta.suffix = suffix;
            true
        })
    }

    /// Give a context the highest priority in the suite.
    pub fn bump_context(&mut self, name: &str) -> Result<()> {
        self.edit(name, true, |_| false)
    }

    pub fn hide_tool(&mut self, context_name: &str, tool_name: &str) -> Result<()> {
        self.edit(context_name, false, |meta| {
            meta.hidden_tools.insert(tool_name.to_string())
        })
    }

    pub fn unhide_tool(&mut self, context_name: &str, tool_name: &str) -> Result<()> {
        self.edit(context_name, false, |meta| meta.hidden_tools.remove(tool_name))
    }

    /// Expose `tool_name` as `alias`.
    ///
    /// Does nothing if the tool already has an alias; remove it with
    /// [`Suite::dealias_tool`] first.
    pub fn alias_tool(&mut self, context_name: &str, tool_name: &str, alias: &str) -> Result<()> {
        validate_path_identifier(alias).map_err(Error::from_identifier)?;
        self.edit(context_name, false, |meta| {
            if meta.tool_aliases.contains_key(tool_name) {
                return false;
            }
            meta.tool_aliases
                .insert(tool_name.to_string(), alias.to_string());
            true
        })
    }

    pub fn dealias_tool(&mut self, context_name: &str, tool_name: &str) -> Result<()> {
        self.edit(context_name, false, |meta| {
            meta.tool_aliases.remove(tool_name).is_some()
        })
    }

    /// Apply `f` to a context's metadata, optionally moving it to the top
    /// priority. `f` reports whether it changed anything.
    fn edit<F>(&mut self, name: &str, bump: bool, f: F) -> Result<()>
    where
        F: FnOnce(&mut ContextMeta) -> bool,
    {
        let entry = self
            .contexts
            .get_mut(name)
            .ok_or_else(|| Error::unknown_context(name))?;

        let mut changed = f(&mut entry.meta);
        if bump {
            entry.meta.priority = self.next_priority;
            self.next_priority += 1;
            tracing::debug!(context = name, priority = entry.meta.priority, "Bumped context");
            changed = true;
        }
        if changed {
            self.commit();
        }
        Ok(())
    }

    /// The context called `name`, loading it if needed.
    pub fn context(&mut self, name: &str) -> Result<&C> {
        self.contexts
            .get_mut(name)
            .ok_or_else(|| Error::unknown_context(name))?
            .slot
            .get()
    }

    pub fn context_meta(&self, name: &str) -> Option<&ContextMeta> {
        self.contexts.get(name).map(|e| &e.meta)
    }

    /// Context names, sorted.
    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.keys().map(String::as_str).collect()
    }

    /// Context metadata in ascending priority order.
    pub fn sorted_contexts(&self) -> Vec<&ContextMeta> {
        let mut metas: Vec<_> = self.contexts.values().map(|e| &e.meta).collect();
        metas.sort_by_key(|m| m.priority);
        metas
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Current resolution, recomputed if anything changed since the last call.
    pub fn tool_table(&mut self) -> Result<&ToolTable> {
        let table = match self.tools.take() {
            Some(table) => table,
            None => self.resolve_tools()?,
        };
        Ok(self.tools.insert(table))
    }

    /// Winning tools keyed by alias.
    pub fn tools(&mut self) -> Result<&BTreeMap<String, SuiteTool>> {
        Ok(self.tool_table()?.tools())
    }

    /// Aliases claimed by more than one context.
    pub fn conflicting_aliases(&mut self) -> Result<Vec<String>> {
        Ok(self
            .tool_table()?
            .conflicting_aliases()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Tools shadowed under `alias`, in descending priority.
    pub fn alias_conflicts(&mut self, alias: &str) -> Result<&[SuiteTool]> {
        Ok(self.tool_table()?.conflicts(alias))
    }

    fn resolve_tools(&mut self) -> Result<ToolTable> {
        self.load_all()?;
        Ok(ToolTable::resolve(self.contexts.values().filter_map(|e| {
            e.slot.loaded().map(|context| (&e.meta, context))
        })))
    }

    /// Read every unloaded context from disk.
    pub(crate) fn load_all(&mut self) -> Result<()> {
        for entry in self.contexts.values_mut() {
            entry.slot.get()?;
        }
        Ok(())
    }
}

impl<C: Context> fmt::Display for Suite<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Suite({})", self.context_names().join(" "))
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use suite_test_utils::FakeContext;

    fn suite() -> Suite<FakeContext> {
        let mut suite = Suite::new();
        suite
            .add_context("maya", FakeContext::new().with_tools("maya", ["maya", "mayapy"]), None)
            .unwrap();
        suite
            .add_context("nuke", FakeContext::new().with_tools("nuke", ["nuke"]), Some("compositing"))
            .unwrap();
        suite
    }

    #[test]
    fn test_priorities_follow_add_order() {
        let suite = suite();
        let order: Vec<_> = suite
            .sorted_contexts()
            .iter()
            .map(|m| (m.name.as_str(), m.priority))
            .collect();
        assert_eq!(order, vec![("maya", 1), ("nuke", 2)]);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut suite = suite();
        let err = suite
            .add_context("maya", FakeContext::new(), None)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateName { name } if name == "maya"));
    }

    #[test]
    fn test_add_unresolved_rejected() {
        let mut suite = suite();
        let err = suite
            .add_context("broken", FakeContext::new().unresolved(), None)
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedContext { .. }));
        assert_eq!(suite.len(), 2);
    }

    #[test]
    fn test_add_invalid_name_rejected() {
        let mut suite: Suite<FakeContext> = Suite::new();
        let err = suite
            .add_context("../escape", FakeContext::new(), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert!(suite.is_empty());
    }

    #[test]
    fn test_unknown_context_operations() {
        let mut suite = suite();
        assert!(matches!(suite.remove_context("houdini"), Err(Error::UnknownContext { .. })));
        assert!(matches!(suite.bump_context("houdini"), Err(Error::UnknownContext { .. })));
        assert!(matches!(suite.hide_tool("houdini", "x"), Err(Error::UnknownContext { .. })));
        assert!(matches!(suite.context("houdini"), Err(Error::UnknownContext { .. })));
    }

    #[test]
    fn test_prefix_with_separator_leaves_state_alone() {
        let mut suite = suite();
        let err = suite.set_context_prefix("maya", "bad/").unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        let meta = suite.context_meta("maya").unwrap();
        assert_eq!(meta.prefix, None);
        assert_eq!(meta.priority, 1);
    }

    #[test]
    fn test_empty_prefix_clears() {
        let mut suite = suite();
        suite.set_context_prefix("maya", "fx_").unwrap();
        suite.set_context_prefix("maya", "").unwrap();
        assert_eq!(suite.context_meta("maya").unwrap().prefix, None);
    }

    #[test]
    fn test_alias_beats_prefix() {
        let mut meta = ContextMeta::new("maya", None, 1);
        meta.prefix = Some("fx_".into());
        meta.suffix = Some("_24".into());
        meta.tool_aliases.insert("maya".into(), "dcc".into());
        assert_eq!(meta.alias_for("maya"), "dcc");
        assert_eq!(meta.alias_for("mayapy"), "fx_mayapy_24");
    }

    #[test]
    fn test_existing_alias_is_kept() {
        let mut suite = suite();
        suite.alias_tool("maya", "maya", "m").unwrap();
        suite.alias_tool("maya", "maya", "other").unwrap();
        assert_eq!(
            suite.context_meta("maya").unwrap().tool_aliases.get("maya"),
            Some(&"m".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(suite().to_string(), "Suite(maya nuke)");
        assert_eq!(Suite::<FakeContext>::new().to_string(), "Suite()");
    }

    #[test]
    fn test_cached_until_mutation() {
        let mut suite = suite();
        let counter = suite.context("maya").unwrap().listing_counter();

        suite.tools().unwrap();
        suite.tools().unwrap();
        assert_eq!(counter.get(), 1);

        suite.bump_context("maya").unwrap();
        suite.tools().unwrap();
        assert_eq!(counter.get(), 2);
    }
}
