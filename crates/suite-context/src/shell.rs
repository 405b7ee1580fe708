//! Shell command-line construction
//!
//! Building the invocation is kept separate from spawning it so the argument
//! rules for each shell family can be tested without running anything.

use std::path::{Path, PathBuf};

use crate::{ShellCommand, ShellRequest};

/// Shell families with different startup-file flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    Bash,
    Zsh,
    /// `sh`, `dash`, `ksh` and anything else following POSIX `$ENV` rules
    Posix,
}

impl ShellKind {
    /// Detect the family from the shell executable's file name.
    pub fn detect(program: &Path) -> Self {
        let stem = program
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        match stem {
            "bash" => Self::Bash,
            "zsh" => Self::Zsh,
            _ => Self::Posix,
        }
    }
}

/// A fully-described shell process, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Variables to set on top of the context environment
    pub env: Vec<(String, String)>,
    /// Variables to remove from the environment
    pub env_remove: Vec<String>,
}

impl ShellInvocation {
    pub fn build(program: PathBuf, request: &ShellRequest) -> Self {
        let kind = ShellKind::detect(&program);
        let mut invocation = Self {
            program,
            args: Vec::new(),
            env: Vec::new(),
            env_remove: Vec::new(),
        };

        match &request.command {
            Some(command) => {
                let mut script = match command {
                    ShellCommand::Script(text) => text.clone(),
                    ShellCommand::Argv(argv) => join_command(argv),
                };
                // Non-interactive shells skip startup files, so source it explicitly
                if let Some(rcfile) = request.rcfile.as_ref().filter(|_| !request.norc) {
                    script = format!(
                        ". {} && {}",
                        shell_escape(&rcfile.to_string_lossy()),
                        script
                    );
                }
                invocation.args.push("-c".into());
                invocation.args.push(script);
            }
            None => {
                invocation.push_startup_flags(kind, request);
                if request.stdin {
                    invocation.args.push("-s".into());
                } else {
                    invocation.args.push("-i".into());
                }
            }
        }

        if let Some(prompt) = &request.prompt {
            invocation.env.push(("PS1".into(), format!("{prompt} ")));
        }

        invocation
    }

    fn push_startup_flags(&mut self, kind: ShellKind, request: &ShellRequest) {
        match kind {
            // Long options must precede single-letter ones for bash
            ShellKind::Bash => {
                if request.norc {
                    self.args.push("--norc".into());
                } else if let Some(rcfile) = &request.rcfile {
                    self.args.push("--rcfile".into());
                    self.args.push(rcfile.to_string_lossy().into_owned());
                }
            }
            ShellKind::Zsh => {
                if request.norc {
                    self.args.push("-f".into());
                } else if request.rcfile.is_some() {
                    tracing::warn!("zsh has no rcfile override; using its standard startup files");
                }
            }
            ShellKind::Posix => {
                if request.norc {
                    self.env_remove.push("ENV".into());
                } else if let Some(rcfile) = &request.rcfile {
                    self.env
                        .push(("ENV".into(), rcfile.to_string_lossy().into_owned()));
                }
            }
        }
    }
}

/// Shell-escape a string by wrapping in single quotes.
///
/// Single quotes inside the string use the `'\''` idiom.
pub fn shell_escape(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '+' | ','))
    {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Join argv into a command line that the shell splits back into the same words.
pub fn join_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| shell_escape(arg))
        .collect::<Vec<_>>()
        .join(" ")
}
