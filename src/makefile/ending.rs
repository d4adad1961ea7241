//! Ending context: where the include chain from a root first reaches the
//! file being inspected.

use super::graph::{IncludeGraph, ScanStack};
use super::line::{classify, LineKind};
use super::path::same_file;
use crate::error::ResolveError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Cutoff point for a scan: when `file_path` is scanned, scanning stops
/// before the 0-based `line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndingContext {
    pub file_path: PathBuf,
    pub line: usize,
}

impl EndingContext {
    pub fn new(file_path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
        }
    }

    /// Whether `file` is the file this cutoff applies to.
    pub fn applies_to(&self, file: &Path) -> bool {
        same_file(&self.file_path, file)
    }
}

/// Find the first include directive, in file scan order, through which the
/// graph rooted at `start` pulls in `active`.
///
/// Returns `None` when no include path reaches `active`. Include targets that
/// do not exist are skipped.
pub fn locate(
    graph: &IncludeGraph<'_>,
    start: &Path,
    active: &Path,
) -> Result<Option<EndingContext>, ResolveError> {
    let mut stack = ScanStack::default();
    let found = locate_in(graph, start, active, &mut stack)?;
    match &found {
        Some(ending) => debug!(
            root = %start.display(),
            file = %ending.file_path.display(),
            line = ending.line,
            "Located ending context"
        ),
        None => debug!(root = %start.display(), active = %active.display(), "No include path reaches active file"),
    }
    Ok(found)
}

fn locate_in(
    graph: &IncludeGraph<'_>,
    file: &Path,
    active: &Path,
    stack: &mut ScanStack,
) -> Result<Option<EndingContext>, ResolveError> {
    stack.enter(file)?;
    let lines = graph.read(file)?;

    for (index, line) in lines.iter().enumerate() {
        let LineKind::Include { argument, .. } = classify(line) else {
            continue;
        };
        let target = graph.resolve(file, &argument);
        if same_file(&target, active) {
            stack.leave();
            return Ok(Some(EndingContext::new(file, index)));
        }
        if graph.source().exists(&target) {
            trace!(from = %file.display(), target = %target.display(), "Searching include");
            if let Some(found) = locate_in(graph, &target, active, stack)? {
                stack.leave();
                return Ok(Some(found));
            }
        }
    }

    stack.leave();
    Ok(None)
}
