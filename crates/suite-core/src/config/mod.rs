//! User configuration
//!
//! Settings are merged from these sources, later ones overriding earlier:
//!
//! 1. **Defaults**
//! 2. **Global config** - `<config_dir>/toolsuite/config.toml`
//! 3. **Environment** - `TOOLSUITE_LAUNCHER`, `TOOLSUITE_SHELL`, `TOOLSUITE_PROMPT`
//!
//! ```toml
//! launcher = "/usr/local/bin/suite"
//! shell = "bash"
//! prompt = "({context}) $"
//! ```

mod resolver;

pub use resolver::{ConfigLayer, ConfigResolver, SuiteConfig};
