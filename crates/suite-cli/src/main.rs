//! Suite CLI
//!
//! The command-line interface for building tool suites and running their tools.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;
use suite_core::{ConfigResolver, SuiteConfig};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to set up logging: {}", "warning".yellow().bold(), e);
    }

    match run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Execute a command and return the process exit code.
fn run(cmd: Commands) -> Result<i32> {
    let config = ConfigResolver::new().resolve()?;
    tracing::debug!(?config, "Resolved configuration");

    execute_command(cmd, &config)
}

fn execute_command(cmd: Commands, config: &SuiteConfig) -> Result<i32> {
    let outcome = match cmd {
        // The tool's exit code becomes ours
        Commands::Dispatch { stub, args } => return commands::run_dispatch(&stub, &args, config),
        Commands::Init { suite } => commands::run_init(&suite, config),
        Commands::Add {
            suite,
            context_file,
            name,
            description,
        } => commands::run_add(&suite, &context_file, &name, description.as_deref(), config),
        Commands::Remove { suite, name } => {
            commands::run_edit(&suite, config, &format!("Removed context {name}"), |s| {
                s.remove_context(&name)
            })
        }
        Commands::Prefix { suite, name, prefix } => commands::run_edit(
            &suite,
            config,
            &format!("Set prefix of {name} to {prefix:?}"),
            |s| s.set_context_prefix(&name, &prefix),
        ),
        Commands::Suffix { suite, name, suffix } => commands::run_edit(
            &suite,
            config,
            &format!("Set suffix of {name} to {suffix:?}"),
            |s| s.set_context_suffix(&name, &suffix),
        ),
        Commands::Bump { suite, name } => {
            commands::run_edit(&suite, config, &format!("Bumped context {name}"), |s| {
                s.bump_context(&name)
            })
        }
        Commands::Hide { suite, name, tool } => commands::run_edit(
            &suite,
            config,
            &format!("Hid tool {tool} of {name}"),
            |s| s.hide_tool(&name, &tool),
        ),
        Commands::Unhide { suite, name, tool } => commands::run_edit(
            &suite,
            config,
            &format!("Unhid tool {tool} of {name}"),
            |s| s.unhide_tool(&name, &tool),
        ),
        Commands::Alias {
            suite,
            name,
            tool,
            alias,
        } => commands::run_edit(
            &suite,
            config,
            &format!("Aliased tool {tool} of {name} as {alias}"),
            |s| s.alias_tool(&name, &tool, &alias),
        ),
        Commands::Unalias { suite, name, tool } => commands::run_edit(
            &suite,
            config,
            &format!("Removed alias of tool {tool} of {name}"),
            |s| s.dealias_tool(&name, &tool),
        ),
        Commands::Info {
            suite,
            verbose_tools,
        } => commands::run_info(&suite, verbose_tools),
        Commands::Tools { suite, json } => commands::run_tools(&suite, json),
    };
    outcome.map(|()| 0)
}
