//! Context building: an ordered, include-aware scan up to a cutoff.

use super::ending::EndingContext;
use super::expand::expand_text;
use super::graph::{IncludeGraph, ScanStack};
use super::line::{classify, AssignOp, Assignment, LineKind};
use super::variable::{Context, Location, Variable};
use crate::error::ResolveError;
use std::path::Path;
use tracing::{debug, trace};

/// Applies the assignments reachable from one file to a [`Context`].
///
/// The cutoff is global to the walk: once the cutoff file has been scanned up
/// to its cutoff line, every pending file-level loop stops.
pub struct ContextBuilder<'g, 'a> {
    graph: &'g IncludeGraph<'a>,
    cutoff: Option<&'g EndingContext>,
    reached: bool,
    stack: ScanStack,
}

impl<'g, 'a> ContextBuilder<'g, 'a> {
    pub fn new(graph: &'g IncludeGraph<'a>, cutoff: Option<&'g EndingContext>) -> Self {
        Self {
            graph,
            cutoff,
            reached: false,
            stack: ScanStack::default(),
        }
    }

    /// Scan `file` (and everything it includes) into `context`.
    ///
    /// Returns whether the cutoff was reached.
    pub fn build(mut self, file: &Path, context: &mut Context) -> Result<bool, ResolveError> {
        self.scan(file, context)?;
        debug!(
            file = %file.display(),
            variables = context.len(),
            reached_cutoff = self.reached,
            "Built context"
        );
        Ok(self.reached)
    }

    fn scan(&mut self, file: &Path, context: &mut Context) -> Result<(), ResolveError> {
        self.stack.enter(file)?;
        let lines = self.graph.read(file)?;

        let cutoff_here = self.cutoff.filter(|c| c.applies_to(file));
        let bound = match cutoff_here {
            Some(cutoff) => cutoff.line.min(lines.len()),
            None => lines.len(),
        };

        for (index, line) in lines[..bound].iter().enumerate() {
            if self.reached {
                break;
            }
            match classify(line) {
                LineKind::Include { argument, optional } => {
                    let Some(target) =
                        self.graph
                            .include_target(file, index, &argument, optional)?
                    else {
                        continue;
                    };
                    trace!(from = %file.display(), target = %target.display(), "Following include");
                    self.scan(&target, context)?;
                }
                LineKind::Assignment(assignment) => {
                    apply(context, assignment, file, index)?;
                }
                LineKind::Inert => {}
            }
        }

        if cutoff_here.is_some() {
            self.reached = true;
        }
        self.stack.leave();
        Ok(())
    }
}

/// Apply one assignment with its operator's override semantics.
fn apply(
    context: &mut Context,
    assignment: Assignment,
    file: &Path,
    line: usize,
) -> Result<(), ResolveError> {
    let location = Location {
        file: file.to_path_buf(),
        line,
        column_start: assignment.column,
        column_end: assignment.column + assignment.name.len(),
    };

    match assignment.op {
        AssignOp::Conditional => {
            if !context.contains(&assignment.name) {
                context.push(Variable {
                    name: assignment.name,
                    recipe: assignment.value,
                    location,
                });
            }
        }
        AssignOp::Append => match context.get_mut(&assignment.name) {
            Some(existing) => {
                existing.recipe.push(' ');
                existing.recipe.push_str(&assignment.value);
                existing.location = location;
            }
            None => context.push(Variable {
                name: assignment.name,
                recipe: assignment.value,
                location,
            }),
        },
        AssignOp::Immediate => {
            let recipe = expand_text(&assignment.value, context)?;
            context.push(Variable {
                name: assignment.name,
                recipe,
                location,
            });
        }
        AssignOp::Deferred => context.push(Variable {
            name: assignment.name,
            recipe: assignment.value,
            location,
        }),
    }
    Ok(())
}
