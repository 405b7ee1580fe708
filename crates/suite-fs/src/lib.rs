//! Filesystem layer for toolsuite
//!
//! Provides atomic writes, a format-agnostic document store and the on-disk
//! layout of a suite directory.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use config::{ConfigStore, Format};
pub use constants::SuitePath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use layout::SuiteLayout;
pub use path::{resolve_real, validate_name_fragment, validate_path_identifier};
