//! Context interface for toolsuite
//!
//! A *context* is an already-resolved software environment: it can list the
//! tools its packages provide and run a command or shell inside itself. Suites
//! only ever talk to contexts through the [`Context`] trait.
//!
//! [`ResolvedContext`] is the file-backed implementation used by the `suite`
//! binary. It reads a JSON snapshot of a resolved environment (packages,
//! tools, environment variables) and runs commands through the host shell. It
//! does not solve dependencies; something upstream produced the snapshot.

pub mod context;
pub mod error;
pub mod resolved;
pub mod shell;

pub use context::{Context, ShellCommand, ShellRequest, ToolListing, Variant};
pub use error::{Error, Result};
pub use resolved::{ResolveStatus, ResolvedContext, ResolvedPackage};
pub use shell::{ShellInvocation, ShellKind, shell_escape};
