//! Saving suites to disk and loading them back
//!
//! The metadata document is the last thing written, so a save that fails
//! part way leaves a directory that does not load as a suite.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use suite_context::Context;
use suite_fs::{ConfigStore, RobustnessConfig, SuiteLayout, io, validate_path_identifier};

use crate::stub::StubGenerator;
use crate::suite::{ContextEntry, ContextMeta, ContextSlot, Suite};
use crate::{Error, Result};

/// Current metadata format version
pub const SUITE_FORMAT_VERSION: u32 = 1;

/// Contents of `suite.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteDocument {
    pub version: u32,
    #[serde(default)]
    pub contexts: BTreeMap<String, ContextMeta>,
}

impl<C: Context> Suite<C> {
    /// Write the suite to `path`, replacing whatever is there.
    ///
    /// Writes context snapshots, then one dispatch stub per exposed alias,
    /// then the metadata document.
    pub fn save(&mut self, path: &Path, stubs: &StubGenerator) -> Result<()> {
        // Contexts may live under `path` itself
        self.load_all()?;
        let table = self.tool_table()?.clone();

        let layout = SuiteLayout::new(path);
        let robustness = RobustnessConfig::default();
        io::remove_tree(path, robustness)?;
        fs::create_dir_all(layout.contexts_dir())
            .map_err(|e| suite_fs::Error::io(layout.contexts_dir(), e))?;
        fs::create_dir_all(layout.bin_dir()).map_err(|e| suite_fs::Error::io(layout.bin_dir(), e))?;

        tracing::info!(path = %path.display(), contexts = self.contexts.len(), "Writing contexts");
        for (name, entry) in &self.contexts {
            if let Some(context) = entry.slot.loaded() {
                context.save(&layout.context_path(name, C::EXTENSION))?;
            }
        }

        tracing::info!(tools = table.len(), "Writing dispatch stubs");
        stubs.write_all(&layout, &table)?;

        let document = SuiteDocument {
            version: SUITE_FORMAT_VERSION,
            contexts: self
                .contexts
                .iter()
                .map(|(name, entry)| (name.clone(), entry.meta.clone()))
                .collect(),
        };
        ConfigStore::with_robustness(robustness).save(&layout.metadata_path(), &document)?;
        tracing::info!(path = %path.display(), "Saved suite");
        Ok(())
    }

    /// Read a suite saved with [`Suite::save`]. Contexts load on first use.
    pub fn load(path: &Path) -> Result<Self> {
        fs::metadata(path)?;
        let layout = SuiteLayout::new(path);
        if !layout.is_suite() {
            return Err(Error::NotASuite {
                path: path.to_path_buf(),
            });
        }

        let corrupt = |message: String| Error::CorruptSuite {
            path: path.to_path_buf(),
            message,
        };

        let document: SuiteDocument = match ConfigStore::new().load(&layout.metadata_path()) {
            Ok(document) => document,
            Err(e) if e.is_parse_error() => return Err(corrupt(e.to_string())),
            Err(e) => return Err(e.into()),
        };
        if document.version > SUITE_FORMAT_VERSION {
            return Err(corrupt(format!(
                "unsupported format version {}",
                document.version
            )));
        }

        let mut contexts = BTreeMap::new();
        for (name, meta) in document.contexts {
            if meta.name != name {
                return Err(corrupt(format!(
                    "context {name:?} is recorded as {:?}",
                    meta.name
                )));
            }
            validate_path_identifier(&name).map_err(|e| corrupt(e.to_string()))?;
            let slot = ContextSlot::Unloaded(layout.context_path(&name, C::EXTENSION));
            contexts.insert(name, ContextEntry { meta, slot });
        }

        tracing::debug!(path = %path.display(), contexts = contexts.len(), "Loaded suite");
        Ok(Self::from_entries(path.to_path_buf(), contexts))
    }
}
