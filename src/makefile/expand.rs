//! Reference expansion ("unrolling").
//!
//! `$(NAME)` tokens are replaced left to right. `$(PWD)` is the directory of
//! the context's root Makefile; an unknown name expands to the empty string.
//! Function calls such as `$(shell pwd)` are not references and are left
//! untouched. Each binding is expanded on its own, so text spliced in by
//! one reference never joins the surrounding text to form another.

use super::variable::{Context, Variable};
use crate::error::ResolveError;
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\((\w*)\)").unwrap());

/// Name substituted with the root Makefile's directory
pub const PWD: &str = "PWD";

/// A `$(NAME)` token inside a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    /// Byte offset of `$`
    pub start: usize,
    /// Byte offset one past `)`
    pub end: usize,
}

/// Every `$(NAME)` token in `text`, in order.
pub fn references(text: &str) -> Vec<Reference> {
    REFERENCE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Reference {
                name: caps[1].to_string(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Copy of `variable` with its recipe fully expanded against `context`.
pub fn expand_variable(variable: &Variable, context: &Context) -> Result<Variable, ResolveError> {
    let mut stack = vec![variable.name.clone()];
    let recipe = expand_with(&variable.recipe, context, &mut stack)?;
    Ok(Variable {
        recipe,
        ..variable.clone()
    })
}

/// Expand every reference in `text` against `context`.
pub fn expand_text(text: &str, context: &Context) -> Result<String, ResolveError> {
    expand_with(text, context, &mut Vec::new())
}

fn expand_with(
    text: &str,
    context: &Context,
    stack: &mut Vec<String>,
) -> Result<String, ResolveError> {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for reference in references(text) {
        out.push_str(&text[cursor..reference.start]);
        cursor = reference.end;

        if reference.name == PWD {
            out.push_str(&context.source_dir());
            continue;
        }
        let Some(bound) = context.get(&reference.name) else {
            trace!(name = %reference.name, "Undefined reference expands to empty");
            continue;
        };
        if stack.contains(&reference.name) {
            let mut chain = stack.clone();
            chain.push(reference.name.clone());
            return Err(ResolveError::CyclicReference {
                name: reference.name,
                chain,
            });
        }

        stack.push(reference.name.clone());
        let expanded = expand_with(&bound.recipe, context, stack)?;
        stack.pop();
        out.push_str(&expanded);
    }

    out.push_str(&text[cursor..]);
    Ok(out)
}
