//! Variable table for the `context` command.

use super::shared::format_section_heading;
use crate::makefile::Context;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

pub fn format_context_text(context: &Context, file: &Path) -> String {
    let mut out = format!(
        "{}\n",
        format_section_heading(&format!(
            "Variables visible in {} ({})",
            file.display(),
            context.len()
        ))
    );
    if context.is_empty() {
        out.push_str("No variables defined.");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Value", "Defined at"]);
    for variable in context.variables() {
        table.add_row(vec![
            variable.name.clone(),
            variable.recipe.clone(),
            format!(
                "{}:{}",
                variable.location.file.display(),
                variable.location.line + 1
            ),
        ]);
    }
    out.push_str(&table.to_string());
    out
}
