//! Hover, resolve and locate formatters.

use super::shared::format_section_heading;
use crate::makefile::EndingContext;
use crate::strategy::{Resolution, ResolutionPlan};
use crate::workspace::HoverReport;
use std::path::Path;

/// One `label : value` line per root, under a heading naming the variable.
pub fn format_hover_text(report: &HoverReport) -> String {
    let heading = if report.standalone {
        format!("{} (no root includes this file)", report.name)
    } else {
        report.name.clone()
    };
    format!("{}\n{}", format_section_heading(&heading), report.render())
}

/// The value alone, or the undefined marker; the defining line when known.
pub fn format_resolution_text(name: &str, resolution: &Resolution) -> String {
    let mut out = resolution.render(name);
    if let Resolution::Value {
        variable: Some(variable),
        ..
    } = resolution
    {
        out.push_str(&format!(
            "\n  defined at {}:{}",
            variable.location.file.display(),
            variable.location.line + 1
        ));
    }
    out
}

/// Where `plan.root` includes the active file, with 1-based lines.
pub fn format_locate_text(plan: Option<&ResolutionPlan>, root: &Path, file: &Path) -> String {
    match plan {
        None => format!(
            "No include path from {} reaches {}",
            root.display(),
            file.display()
        ),
        Some(ResolutionPlan { ending: None, .. }) => {
            format!("{} is the root Makefile itself", file.display())
        }
        Some(ResolutionPlan {
            ending: Some(EndingContext { file_path, line }),
            ..
        }) => format!("{}:{}", file_path.display(), line + 1),
    }
}
