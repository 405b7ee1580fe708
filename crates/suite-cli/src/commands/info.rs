//! Suite info listing

use std::path::Path;

use colored::Colorize;

use suite_context::Context;
use suite_core::{Suite, SuiteTool};

use crate::error::Result;

const NOT_VISIBLE: &str = "(not visible)";

/// Run the info command
pub fn run_info(path: &Path, verbose_tools: bool) -> Result<()> {
    let mut suite: Suite = Suite::load(path)?;
    print!("{}", format_info(&mut suite, verbose_tools)?);
    Ok(())
}

/// Contexts in ascending priority, then their exposed tools.
///
/// With `verbose_tools`, tools shadowed by a conflict are listed under the
/// tool that shadows them.
pub fn format_info<C: Context>(suite: &mut Suite<C>, verbose_tools: bool) -> Result<String> {
    let metas: Vec<_> = suite.sorted_contexts().into_iter().cloned().collect();
    let mut out = String::new();

    if metas.is_empty() {
        out.push_str("Suite is empty.\n");
        return Ok(out);
    }

    out.push_str(&format!("{}\n", "Contexts".bold()));
    let name_width = metas.iter().map(|m| m.name.len()).max().unwrap_or(0);
    for meta in &metas {
        let name = format!("{:<name_width$}", meta.name);
        let line = format!(
            "  {}  {}",
            name.cyan(),
            meta.description.as_deref().unwrap_or_default()
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push('\n');

    let table = suite.tool_table()?;
    let mut rows = Vec::new();
    for meta in &metas {
        for tool in table.for_context(&meta.name) {
            rows.push(Row::new(tool, false));
            if verbose_tools {
                rows.extend(table.conflicts(&tool.tool_alias).iter().map(|t| Row::new(t, true)));
            }
        }
    }

    if rows.is_empty() {
        out.push_str("No tools exposed.\n");
        return Ok(out);
    }

    let header = Row {
        cells: ["TOOL", "ALIASING", "PACKAGE", "CONTEXT"].map(String::from),
        shadowed: false,
    };
    let mut widths = [0usize; 4];
    for row in std::iter::once(&header).chain(&rows) {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.len());
        }
    }

    out.push_str(&format!("{}\n", header.render(&widths).bold()));
    for row in &rows {
        let line = row.render(&widths);
        if row.shadowed {
            out.push_str(&format!("{}\n", format!("{line}  {NOT_VISIBLE}").yellow()));
        } else {
            out.push_str(&line);
            out.push('\n');
        }
    }
    Ok(out)
}

struct Row {
    cells: [String; 4],
    shadowed: bool,
}

impl Row {
    fn new(tool: &SuiteTool, shadowed: bool) -> Self {
        let aliasing = if tool.tool_name == tool.tool_alias {
            "-".to_string()
        } else {
            tool.tool_name.clone()
        };
        Self {
            cells: [
                tool.tool_alias.clone(),
                aliasing,
                tool.variant.qualified_name(),
                tool.context_name.clone(),
            ],
            shadowed,
        }
    }

    fn render(&self, widths: &[usize; 4]) -> String {
        let line = self
            .cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    }
}
