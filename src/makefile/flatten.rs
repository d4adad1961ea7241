//! Flattening: concatenate the reachable include graph into one synthetic
//! Makefile ending in an echo target, for evaluation by a real Make.

use super::ending::EndingContext;
use super::graph::{IncludeGraph, ScanStack};
use super::line::{classify, LineKind};
use super::path::parent_dir_string;
use crate::error::ResolveError;
use regex::{NoExpand, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static PWD_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\(PWD\)").unwrap());
static SHELL_PWD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(shell\s+pwd\)").unwrap());

/// Delimiter framing file markers and the clarifier banner
pub const DELIMITER: &str = "###################################";

/// Prefix of the synthesized echo target
pub const TARGET_PREFIX: &str = "makefile-clairifier-";

/// Source of one emitted line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOrigin {
    /// Copied from `file` at 0-based `line`
    Source { file: PathBuf, line: usize },
    /// File marker, banner or target line
    Synthetic,
}

/// One synthetic Makefile
#[derive(Debug, Clone)]
pub struct FlattenedDocument {
    lines: Vec<String>,
    origins: Vec<LineOrigin>,
    target: String,
}

impl FlattenedDocument {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Name of the echo target to ask Make for.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Origin of the 1-based `line_in_context`, as Make reports it.
    pub fn origin(&self, line_in_context: usize) -> Option<&LineOrigin> {
        line_in_context
            .checked_sub(1)
            .and_then(|index| self.origins.get(index))
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Target name for `name`, restricted to characters Make accepts verbatim.
pub fn target_name(name: &str) -> String {
    let suffix: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", TARGET_PREFIX, suffix)
}

/// Replace `$(PWD)` and `$(shell pwd)` with `dir`.
pub fn substitute_pwd(line: &str, dir: &str) -> String {
    let replaced = PWD_PATTERN.replace_all(line, NoExpand(dir));
    SHELL_PWD_PATTERN
        .replace_all(&replaced, NoExpand(dir))
        .into_owned()
}

fn marker(label: &str) -> String {
    format!("{}{}{}", DELIMITER, label, DELIMITER)
}

/// Accumulates the lines of a [`FlattenedDocument`]
pub struct Flattener<'g, 'a> {
    graph: &'g IncludeGraph<'a>,
    lines: Vec<String>,
    origins: Vec<LineOrigin>,
}

impl<'g, 'a> Flattener<'g, 'a> {
    pub fn new(graph: &'g IncludeGraph<'a>) -> Self {
        Self {
            graph,
            lines: Vec::new(),
            origins: Vec::new(),
        }
    }

    /// Lines emitted so far.
    pub fn line_in_context(&self) -> usize {
        self.lines.len()
    }

    /// Emit a marker for `file`, then its reachable content up to `cutoff`.
    pub fn append_file(
        &mut self,
        file: &Path,
        cutoff: Option<&EndingContext>,
    ) -> Result<(), ResolveError> {
        self.emit_synthetic(marker(&file.to_string_lossy()));
        let mut walk = Walk {
            cutoff,
            reached: false,
            stack: ScanStack::default(),
        };
        self.scan(file, &mut walk)
    }

    /// Append the clarifier banner and the echo target for `name`.
    pub fn finish(mut self, name: &str, expression: &str) -> FlattenedDocument {
        let target = target_name(name);
        let root_dir = parent_dir_string(self.graph.root());
        for _ in 0..3 {
            self.emit_synthetic(String::new());
        }
        self.emit_synthetic(marker(" Makefile Clarifier "));
        self.emit_synthetic(String::new());
        self.emit_synthetic(format!("{}:", target));
        self.emit_synthetic(format!("\t@echo {}", substitute_pwd(expression, &root_dir)));
        debug!(target = %target, lines = self.lines.len(), "Flattened include graph");
        FlattenedDocument {
            lines: self.lines,
            origins: self.origins,
            target,
        }
    }

    fn emit_synthetic(&mut self, line: String) {
        self.lines.push(line);
        self.origins.push(LineOrigin::Synthetic);
    }

    fn scan(&mut self, file: &Path, walk: &mut Walk<'_>) -> Result<(), ResolveError> {
        walk.stack.enter(file)?;
        let lines = self.graph.read(file)?;
        let dir = parent_dir_string(file);

        let cutoff_here = walk.cutoff.filter(|c| c.applies_to(file));
        let bound = match cutoff_here {
            Some(cutoff) => cutoff.line.min(lines.len()),
            None => lines.len(),
        };

        for (index, line) in lines[..bound].iter().enumerate() {
            if walk.reached {
                break;
            }
            if let LineKind::Include { argument, optional } = classify(line) {
                match self.graph.include_target(file, index, &argument, optional)? {
                    Some(target) => {
                        self.emit_synthetic(marker(&target.to_string_lossy()));
                        self.scan(&target, walk)?;
                    }
                    None => self.emit_synthetic(format!("# missing optional include: {}", argument)),
                }
                continue;
            }
            self.lines.push(substitute_pwd(line, &dir));
            self.origins.push(LineOrigin::Source {
                file: file.to_path_buf(),
                line: index,
            });
        }

        if cutoff_here.is_some() {
            walk.reached = true;
        }
        walk.stack.leave();
        Ok(())
    }
}

struct Walk<'c> {
    cutoff: Option<&'c EndingContext>,
    reached: bool,
    stack: ScanStack,
}
