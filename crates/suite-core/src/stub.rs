//! Dispatch stubs
//!
//! Every exposed alias gets a small POSIX shell script in `bin/`. The script
//! carries the `(context, tool)` pair it stands for on a marker line and
//! hands control to the launcher, which reads the pair back:
//!
//! ```text
//! #!/bin/sh
//! # Generated by toolsuite. Changes are lost when the suite is saved.
//! # suite-dispatch: {"context_name":"nuke","tool_name":"maya"}
//! exec '/usr/local/bin/suite' dispatch "$0" -- "$@"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use suite_context::shell_escape;
use suite_fs::{RobustnessConfig, SuiteLayout, io};

use crate::tools::{SuiteTool, ToolTable};
use crate::{Error, Result};

const RECORD_MARKER: &str = "# suite-dispatch: ";

/// What a stub dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubRecord {
    pub context_name: String,
    pub tool_name: String,
}

impl StubRecord {
    pub fn new(context_name: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            context_name: context_name.into(),
            tool_name: tool_name.into(),
        }
    }

    /// Full stub script invoking `launcher`.
    pub fn render(&self, launcher: &Path) -> Result<String> {
        let record = serde_json::to_string(self)?;
        let launcher = shell_escape(&launcher.to_string_lossy());
        Ok(format!(
            "#!/bin/sh\n\
             # Generated by toolsuite. Changes are lost when the suite is saved.\n\
             {RECORD_MARKER}{record}\n\
             exec {launcher} dispatch \"$0\" -- \"$@\"\n"
        ))
    }

    /// Extract the record from stub text. `path` is only used for errors.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let invalid = |message: String| Error::InvalidStub {
            path: path.to_path_buf(),
            message,
        };

        let line = content
            .lines()
            .find_map(|line| line.strip_prefix(RECORD_MARKER))
            .ok_or_else(|| invalid("no dispatch record".to_string()))?;
        serde_json::from_str(line.trim()).map_err(|e| invalid(e.to_string()))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = io::read_text(path)?;
        Self::parse(path, &content)
    }
}

/// Writes stubs that call back into `launcher`.
#[derive(Debug, Clone)]
pub struct StubGenerator {
    launcher: PathBuf,
    robustness: RobustnessConfig,
}

impl StubGenerator {
    pub fn new(launcher: impl Into<PathBuf>) -> Self {
        Self {
            launcher: launcher.into(),
            robustness: RobustnessConfig::default(),
        }
    }

    /// Stubs that call the running executable.
    pub fn from_current_exe() -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    pub fn launcher(&self) -> &Path {
        &self.launcher
    }

    /// Write one stub per winning alias. Shadowed tools get none.
    pub fn write_all(&self, layout: &SuiteLayout, table: &ToolTable) -> Result<Vec<PathBuf>> {
        table
            .tools()
            .values()
            .map(|tool| self.write(layout, tool))
            .collect()
    }

    pub fn write(&self, layout: &SuiteLayout, tool: &SuiteTool) -> Result<PathBuf> {
        let path = layout.stub_path(&tool.tool_alias);
        let script = StubRecord::new(&tool.context_name, &tool.tool_name).render(&self.launcher)?;
        io::write_executable(&path, &script, self.robustness)?;
        tracing::debug!(alias = %tool.tool_alias, path = %path.display(), "Wrote dispatch stub");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_parse() {
        let record = StubRecord::new("nuke", "maya");
        let script = record.render(Path::new("/opt/tool suite/bin/suite")).unwrap();

        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("exec '/opt/tool suite/bin/suite' dispatch \"$0\" -- \"$@\""));
        assert_eq!(StubRecord::parse(Path::new("bin/maya"), &script).unwrap(), record);
    }

    #[test]
    fn test_parse_without_marker() {
        let err = StubRecord::parse(Path::new("bin/maya"), "#!/bin/sh\nexec maya \"$@\"\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStub { .. }));
    }

    #[test]
    fn test_parse_bad_record() {
        let err = StubRecord::parse(Path::new("bin/maya"), "# suite-dispatch: {nope\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStub { .. }));
    }
}
