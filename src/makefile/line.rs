//! Line classification
//!
//! One pass per source line produces a [`LineKind`]. Include directives are
//! recognized first, then the assignment operators in a fixed precedence
//! order: `?=`, `+=`, `:=`, `=`. The deferred pattern is a substring of the
//! other three, so the first operator found wins.

use regex::Regex;
use std::sync::LazyLock;

static INCLUDE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(-include|sinclude|include)\s+(.*)$").unwrap());

static OPERATOR_PATTERNS: LazyLock<[(AssignOp, Regex); 4]> = LazyLock::new(|| {
    [
        (AssignOp::Conditional, Regex::new(r"\s*\?=\s*").unwrap()),
        (AssignOp::Append, Regex::new(r"\s*\+=\s*").unwrap()),
        (AssignOp::Immediate, Regex::new(r"\s*:=\s*").unwrap()),
        (AssignOp::Deferred, Regex::new(r"\s*=\s*").unwrap()),
    ]
});

/// Assignment operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `?=`: set only when absent
    Conditional,
    /// `+=`: space-joined append
    Append,
    /// `:=`: expanded at definition time
    Immediate,
    /// `=`: expanded at read time
    Deferred,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Conditional => "?=",
            AssignOp::Append => "+=",
            AssignOp::Immediate => ":=",
            AssignOp::Deferred => "=",
        }
    }
}

/// An assignment extracted from one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: String,
    pub op: AssignOp,
    /// Byte column of `name` within the line
    pub column: usize,
}

/// Classification of a single source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `include path`, `-include path` or `sinclude path`
    Include { argument: String, optional: bool },
    Assignment(Assignment),
    Inert,
}

/// Classify one raw line.
pub fn classify(line: &str) -> LineKind {
    // Recipe lines and comments never bind variables.
    if line.starts_with('\t') || line.trim_start().starts_with('#') {
        return LineKind::Inert;
    }

    if let Some(caps) = INCLUDE_PATTERN.captures(line) {
        let argument = caps[2].trim().to_string();
        if !argument.is_empty() {
            return LineKind::Include {
                argument,
                optional: &caps[1] != "include",
            };
        }
    }

    for (op, pattern) in OPERATOR_PATTERNS.iter() {
        let Some(found) = pattern.find(line) else {
            continue;
        };
        let before = &line[..found.start()];
        let name = before.trim();
        if name.is_empty() {
            return LineKind::Inert;
        }
        let column = before.len() - before.trim_start().len();
        return LineKind::Assignment(Assignment {
            name: name.to_string(),
            value: line[found.end()..].to_string(),
            op: *op,
            column,
        });
    }

    LineKind::Inert
}
