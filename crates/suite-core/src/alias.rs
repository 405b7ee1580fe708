//! Running a suite tool
//!
//! Arguments to a stub are read in two phases. Options of the `+` dialect are
//! taken from the front in any order; the first token that is not one of them
//! ends option parsing and everything from there on goes to the tool as is.
//! Tools with their own `-`/`--` options therefore never clash with the suite.
//!
//! ```text
//! maya +i                      # interactive shell inside maya's context
//! maya ++command echo $HOME    # run a command instead of the tool
//! maya +i +s < script.sh       # feed a script to the context's shell
//! maya -batch scene.ma         # run maya with these arguments
//! ```

use std::path::PathBuf;

use suite_context::{Context, ShellCommand, ShellRequest};

/// Printed for `+h` and after parse errors.
pub const USAGE: &str = "\
usage: TOOL [+i] [+c COMMAND...] [++rcfile PATH] [++norc] [+s] [+h] [ARGS...]

Suite options:
  +i, ++interactive    Start an interactive shell in the tool's context
  +c, ++command ARGS   Run ARGS in the tool's context instead of the tool
  ++rcfile PATH        Source PATH on shell startup
  ++norc               Skip shell startup files
  +s, ++stdin          Read commands from standard input
  +h, ++help           Show this help

All other arguments are passed to the tool.
";

/// Errors from reading `+` dialect options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AliasArgsError {
    #[error("option {option} expects a value")]
    MissingValue { option: String },
}

/// Dialect options split from the tool's own arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasArgs {
    pub interactive: bool,
    /// Words of an inline command, if one was given
    pub command: Option<Vec<String>>,
    pub rcfile: Option<PathBuf>,
    pub norc: bool,
    pub stdin: bool,
    pub help: bool,
    /// Arguments for the tool
    pub passthrough: Vec<String>,
}

impl AliasArgs {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, AliasArgsError> {
        let mut parsed = Self::default();
        let mut rest = args.iter().map(AsRef::as_ref).peekable();

        while let Some(&token) = rest.peek() {
            if !is_dialect(token) {
                break;
            }
            rest.next();

            match token {
                "+i" | "++interactive" => parsed.interactive = true,
                "++norc" => parsed.norc = true,
                "+s" | "++stdin" => parsed.stdin = true,
                "+h" | "++help" => parsed.help = true,
                "+c" | "++command" => {
                    let mut words = Vec::new();
                    while let Some(word) = rest.next_if(|t| !is_dialect(t)) {
                        words.push(word.to_string());
                    }
                    if words.is_empty() {
                        return Err(missing(token));
                    }
                    parsed.command = Some(words);
                }
                "++rcfile" => {
                    let path = rest.next().ok_or_else(|| missing(token))?;
                    parsed.rcfile = Some(PathBuf::from(path));
                }
                _ => {
                    // Only `++rcfile=PATH` is left
                    let path = token.strip_prefix("++rcfile=").unwrap_or_default();
                    if path.is_empty() {
                        return Err(missing("++rcfile"));
                    }
                    parsed.rcfile = Some(PathBuf::from(path));
                }
            }
        }

        parsed.passthrough = rest.map(str::to_string).collect();
        Ok(parsed)
    }
}

fn is_dialect(token: &str) -> bool {
    matches!(
        token,
        "+i" | "++interactive"
            | "+c"
            | "++command"
            | "++rcfile"
            | "++norc"
            | "+s"
            | "++stdin"
            | "+h"
            | "++help"
    ) || token.starts_with("++rcfile=")
}

fn missing(option: &str) -> AliasArgsError {
    AliasArgsError::MissingValue {
        option: option.to_string(),
    }
}

/// Settings that apply to every tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeOptions {
    /// Shell to use instead of the context's default
    pub shell: Option<String>,
    /// Interactive prompt; `{context}` is replaced by the context name
    pub prompt: String,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            shell: None,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

pub const DEFAULT_PROMPT: &str = "{context}>";

/// A tool bound to the context that provides it.
pub struct Alias<'a, C> {
    context_name: &'a str,
    context: &'a C,
    tool_name: &'a str,
    options: InvokeOptions,
    hidden_path: Vec<PathBuf>,
    stdin_ready: fn() -> bool,
}

impl<'a, C: Context> Alias<'a, C> {
    pub fn new(context_name: &'a str, context: &'a C, tool_name: &'a str) -> Self {
        Self {
            context_name,
            context,
            tool_name,
            options: InvokeOptions::default(),
            hidden_path: Vec::new(),
            stdin_ready: stdin_has_input,
        }
    }

    pub fn with_options(mut self, options: InvokeOptions) -> Self {
        self.options = options;
        self
    }

    /// Keep `dir` off the tool's `PATH`.
    ///
    /// Stubs pass their own `bin/` so a tool the context does not actually
    /// provide is not found as the stub again.
    pub fn with_hidden_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.hidden_path.push(dir.into());
        self
    }

    /// Replace the check used to decide whether `+s` has anything to read.
    pub fn with_stdin_check(mut self, check: fn() -> bool) -> Self {
        self.stdin_ready = check;
        self
    }

    /// Run the tool with stub arguments and return the exit code.
    ///
    /// Parse errors return 2 and a shell that fails to start returns 1,
    /// both with a message on stderr.
    pub fn run<S: AsRef<str>>(&self, args: &[S]) -> i32 {
        let mut parsed = match AliasArgs::parse(args) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("{}: error: {e}\n\n{USAGE}", self.tool_name);
                return 2;
            }
        };
        if parsed.help {
            print!("{USAGE}");
            return 0;
        }
        if parsed.stdin && !(self.stdin_ready)() {
            tracing::debug!(tool = self.tool_name, "Nothing to read on stdin; ignoring +s");
            parsed.stdin = false;
        }

        let request = self.shell_request(&parsed);
        tracing::debug!(
            context = self.context_name,
            tool = self.tool_name,
            ?request,
            "Running tool"
        );
        match self.context.execute_shell(&request) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{}: failed to start shell: {e}", self.tool_name);
                1
            }
        }
    }

    /// Shell request for already-parsed options.
    ///
    /// An inline command wins over `+i`, which wins over running the tool.
    pub fn shell_request(&self, args: &AliasArgs) -> ShellRequest {
        let mut request = ShellRequest {
            stdin: args.stdin,
            rcfile: args.rcfile.clone(),
            norc: args.norc,
            shell: self.options.shell.clone(),
            hidden_path: self.hidden_path.clone(),
            ..ShellRequest::default()
        };

        if let Some(words) = &args.command {
            request.command = Some(ShellCommand::Script(words.join(" ")));
        } else if args.interactive {
            request.prompt = Some(self.options.prompt.replace("{context}", self.context_name));
        } else {
            let mut argv = Vec::with_capacity(args.passthrough.len() + 1);
            argv.push(self.tool_name.to_string());
            argv.extend(args.passthrough.iter().cloned());
            request.command = Some(ShellCommand::Argv(argv));
        }
        request
    }
}

/// Whether stdin can be read right now without blocking.
#[cfg(unix)]
pub fn stdin_has_input() -> bool {
    let mut fd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    // SAFETY: `fd` is a valid pollfd for the duration of the call
    let ready = unsafe { libc::poll(&mut fd, 1, 0) };
    ready > 0 && fd.revents & (libc::POLLIN | libc::POLLHUP) != 0
}

/// Whether stdin can be read right now without blocking.
#[cfg(not(unix))]
pub fn stdin_has_input() -> bool {
    use std::io::IsTerminal;
    !std::io::stdin().is_terminal()
}
