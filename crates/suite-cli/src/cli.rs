//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Suite - Merge the tools of several resolved contexts into one namespace
#[derive(Parser, Debug)]
#[command(name = "suite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create an empty suite
    Init {
        /// Suite directory (must not exist yet)
        suite: PathBuf,
    },

    /// Add a context to a suite, creating the suite if needed
    ///
    /// Examples:
    ///   suite add ./dcc maya.json --name maya
    ///   suite add ./dcc nuke.json -n nuke -d "Compositing"
    Add {
        /// Suite directory
        suite: PathBuf,

        /// Resolved context snapshot (JSON)
        context_file: PathBuf,

        /// Name of the context inside the suite
        #[arg(short, long)]
        name: String,

        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Remove a context from a suite
    Remove {
        suite: PathBuf,
        /// Context name
        name: String,
    },

    /// Prefix the tools of a context (also bumps its priority)
    Prefix {
        suite: PathBuf,
        /// Context name
        name: String,
        /// Prefix; an empty string removes it
        #[arg(allow_hyphen_values = true)]
        prefix: String,
    },

    /// Suffix the tools of a context (also bumps its priority)
    Suffix {
        suite: PathBuf,
        /// Context name
        name: String,
        /// Suffix; an empty string removes it
        #[arg(allow_hyphen_values = true)]
        suffix: String,
    },

    /// Give a context the highest priority
    Bump {
        suite: PathBuf,
        /// Context name
        name: String,
    },

    /// Hide a tool of a context
    Hide {
        suite: PathBuf,
        /// Context name
        name: String,
        /// Tool name as provided by the context
        tool: String,
    },

    /// Unhide a previously hidden tool
    Unhide {
        suite: PathBuf,
        /// Context name
        name: String,
        /// Tool name as provided by the context
        tool: String,
    },

    /// Expose a tool under a different name
    Alias {
        suite: PathBuf,
        /// Context name
        name: String,
        /// Tool name as provided by the context
        tool: String,
        /// Name to expose it as
        alias: String,
    },

    /// Remove a tool's alias
    Unalias {
        suite: PathBuf,
        /// Context name
        name: String,
        /// Tool name as provided by the context
        tool: String,
    },

    /// Show contexts and tools of a suite
    Info {
        suite: PathBuf,

        /// Also list tools hidden by conflicts
        #[arg(long)]
        verbose_tools: bool,
    },

    /// List the tools a suite exposes
    Tools {
        suite: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Run a tool through its dispatch stub (used by generated stubs)
    #[command(hide = true)]
    Dispatch {
        /// Path of the stub that was run
        stub: PathBuf,

        /// Arguments given to the stub
        #[arg(last = true)]
        args: Vec<String>,
    },
}
