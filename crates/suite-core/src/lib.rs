//! Suites of tool contexts
//!
//! A suite merges the tools of several independently resolved contexts into
//! one namespace:
//!
//! - **Registry**: [`Suite`] holds named contexts with priorities and per-context
//!   overrides (prefix, suffix, hidden tools, explicit aliases)
//! - **Resolution**: [`ToolTable`] picks one provider per exposed name and
//!   records the shadowed ones as conflicts
//! - **Persistence**: [`Suite::save`] and [`Suite::load`] use a directory of
//!   metadata, context snapshots and dispatch stubs
//! - **Invocation**: stubs call [`dispatch`], which runs the tool through an
//!   [`Alias`] with `+`-prefixed suite options
//!
//! # Architecture
//!
//! ```text
//!                    suite-cli
//!                        |
//!                   suite-core
//!                        |
//!              +---------+---------+
//!              |                   |
//!          suite-fs          suite-context
//! ```
//!
//! # Example
//!
//! ```ignore
//! use suite_core::{Suite, config::ConfigResolver};
//! use suite_context::{Context, ResolvedContext};
//!
//! let config = ConfigResolver::new().resolve()?;
//! let mut suite = Suite::<ResolvedContext>::new();
//! suite.add_context("maya", ResolvedContext::load("maya.json".as_ref())?, None)?;
//! suite.save("/opt/suites/dcc".as_ref(), &config.stub_generator()?)?;
//! ```

pub mod alias;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod store;
pub mod stub;
pub mod suite;
pub mod tools;

pub use alias::{Alias, AliasArgs, AliasArgsError, InvokeOptions, USAGE, stdin_has_input};
pub use config::{ConfigResolver, SuiteConfig};
pub use dispatch::dispatch;
pub use error::{Error, Result};
pub use store::{SUITE_FORMAT_VERSION, SuiteDocument};
pub use stub::{StubGenerator, StubRecord};
pub use suite::{ContextMeta, Suite};
pub use tools::{SuiteTool, ToolTable};
