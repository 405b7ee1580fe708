//! Command implementations for suite-cli

pub mod dispatch;
pub mod info;
pub mod suite;
pub mod tools;

pub use dispatch::run_dispatch;
pub use info::run_info;
pub use suite::{run_add, run_edit, run_init};
pub use tools::run_tools;
