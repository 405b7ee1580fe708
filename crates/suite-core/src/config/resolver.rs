//! Configuration resolution with layered overrides

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use suite_fs::ConfigStore;

use crate::Result;
use crate::alias::{DEFAULT_PROMPT, InvokeOptions};
use crate::stub::StubGenerator;

const APP_DIR: &str = "toolsuite";
const CONFIG_FILE: &str = "config.toml";

pub const ENV_LAUNCHER: &str = "TOOLSUITE_LAUNCHER";
pub const ENV_SHELL: &str = "TOOLSUITE_SHELL";
pub const ENV_PROMPT: &str = "TOOLSUITE_PROMPT";

/// Effective configuration after all layers are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteConfig {
    /// Program stubs call back into. Defaults to the running executable.
    pub launcher: Option<PathBuf>,
    /// Shell for running tools. Defaults to the context's choice.
    pub shell: Option<String>,
    /// Interactive prompt template
    pub prompt: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            launcher: None,
            shell: None,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl SuiteConfig {
    fn apply(&mut self, layer: ConfigLayer) {
        if let Some(launcher) = layer.launcher {
            self.launcher = Some(launcher);
        }
        if let Some(shell) = layer.shell {
            self.shell = Some(shell);
        }
        if let Some(prompt) = layer.prompt {
            self.prompt = prompt;
        }
    }

    pub fn invoke_options(&self) -> InvokeOptions {
        InvokeOptions {
            shell: self.shell.clone(),
            prompt: self.prompt.clone(),
        }
    }

    /// Stub generator for the configured launcher.
    pub fn stub_generator(&self) -> Result<StubGenerator> {
        match &self.launcher {
            Some(launcher) => Ok(StubGenerator::new(launcher)),
            None => StubGenerator::from_current_exe(),
        }
    }
}

/// One source of settings. Unset fields leave earlier layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigLayer {
    #[serde(default)]
    pub launcher: Option<PathBuf>,
    #[serde(default)]
    pub shell: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Resolves [`SuiteConfig`] from defaults, the global config file and the
/// environment.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    /// Override for the global config directory (used for testing).
    global_config_dir_override: Option<PathBuf>,
    /// Fixed environment instead of the process environment (used for testing).
    env_override: Option<BTreeMap<String, String>>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the global config from `dir` instead of the platform config directory.
    pub fn with_global_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_config_dir_override = Some(dir.into());
        self
    }

    /// Read environment overrides from `vars` instead of the process environment.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_override = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.global_config_dir_override {
            return Some(dir.clone());
        }
        dirs::config_dir().map(|d| d.join(APP_DIR))
    }

    fn env_var(&self, key: &str) -> Option<String> {
        let value = match &self.env_override {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Merge all layers. A missing config file is skipped; an invalid one is
    /// an error.
    pub fn resolve(&self) -> Result<SuiteConfig> {
        let mut config = SuiteConfig::default();

        if let Some(dir) = self.global_config_dir() {
            let path = dir.join(CONFIG_FILE);
            if path.is_file() {
                tracing::debug!(?path, "Loading global config");
                let layer: ConfigLayer = ConfigStore::new().load(&path)?;
                config.apply(layer);
            } else {
                tracing::debug!(?path, "No global config found");
            }
        }

        config.apply(ConfigLayer {
            launcher: self.env_var(ENV_LAUNCHER).map(PathBuf::from),
            shell: self.env_var(ENV_SHELL),
            prompt: self.env_var(ENV_PROMPT),
        });

        Ok(config)
    }
}
