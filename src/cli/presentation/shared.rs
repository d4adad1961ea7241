//! Shared presentation: headings and the root list.

use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Discovered root Makefiles, relative to the workspace.
pub fn format_roots_text(workspace_root: &Path, roots: &[PathBuf]) -> String {
    let mut out = format!(
        "{}\n",
        format_section_heading(&format!("Root Makefiles ({})", roots.len()))
    );
    if roots.is_empty() {
        out.push_str("No root Makefiles found.");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Path"]);
    for (i, root) in roots.iter().enumerate() {
        let label = root.strip_prefix(workspace_root).unwrap_or(root);
        table.add_row(vec![(i + 1).to_string(), label.display().to_string()]);
    }
    out.push_str(&table.to_string());
    out
}
