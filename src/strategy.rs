//! Resolution strategies
//!
//! Two ways to answer "what is NAME at this point of the include graph":
//! the textual engine (fast, approximate) and the flattened document
//! evaluated by a real Make (slow, authoritative). Both sit behind
//! [`ResolutionStrategy`] and consume the same [`ResolutionPlan`].

use crate::error::{ApiError, EvaluatorError, ResolveError};
use crate::evaluator::{MakeInvocation, MakeRunner, ScratchArena};
use crate::makefile::flatten::LineOrigin;
use crate::makefile::{
    expand_text, expand_variable, locate, ContextBuilder, Context, EndingContext,
    FlattenedDocument, Flattener, IncludeBase, IncludeGraph, SourceReader, Variable,
};
use crate::makefile::expand::PWD;
use crate::makefile::path::same_file;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Marker appended to a name that is not bound at the requested point
pub const UNDEFINED_MARKER: &str = "IS UNDEFINED IN THIS CONTEXT";

/// Which strategy answers a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    Textual,
    Evaluated,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Textual => write!(f, "textual"),
            StrategyKind::Evaluated => write!(f, "evaluated"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "textual" => Ok(StrategyKind::Textual),
            "evaluated" => Ok(StrategyKind::Evaluated),
            other => Err(ApiError::InvalidArgument(format!(
                "Unknown strategy: {} (must be 'textual' or 'evaluated')",
                other
            ))),
        }
    }
}

/// The variable being asked about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableQuery {
    pub name: String,
    /// Text to evaluate; `$(name)` unless overridden
    pub expression: String,
}

impl VariableQuery {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let expression = format!("$({})", name);
        Self { name, expression }
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = expression.into();
        self
    }

    fn is_plain_reference(&self) -> bool {
        self.expression == format!("$({})", self.name)
    }
}

/// Outcome of resolving one query against one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Value {
        value: String,
        /// The binding, when the textual engine found one
        #[serde(skip_serializing_if = "Option::is_none")]
        variable: Option<Variable>,
    },
    Undefined,
}

impl Resolution {
    pub fn value(&self) -> Option<&str> {
        match self {
            Resolution::Value { value, .. } => Some(value),
            Resolution::Undefined => None,
        }
    }

    /// Display form: the value, or `<NAME> IS UNDEFINED IN THIS CONTEXT`.
    pub fn render(&self, name: &str) -> String {
        match self {
            Resolution::Value { value, .. } => value.clone(),
            Resolution::Undefined => format!("{} {}", name, UNDEFINED_MARKER),
        }
    }
}

/// What to scan for one root: the root up to its ending context, then the
/// active file up to the cursor line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionPlan {
    pub root: PathBuf,
    /// `None` when the root is the active file itself
    pub ending: Option<EndingContext>,
    pub active_file: PathBuf,
    /// 0-based cursor line; scanning stops before it
    pub line: usize,
}

impl ResolutionPlan {
    /// Plan resolution from `graph`'s root, or `None` if the root never
    /// includes `active_file`.
    pub fn for_root(
        graph: &IncludeGraph<'_>,
        active_file: &Path,
        line: usize,
    ) -> Result<Option<Self>, ResolveError> {
        let root = graph.root();
        if same_file(root, active_file) {
            return Ok(Some(Self::standalone(active_file, line)));
        }
        Ok(locate(graph, root, active_file)?.map(|ending| Self {
            root: root.to_path_buf(),
            ending: Some(ending),
            active_file: active_file.to_path_buf(),
            line,
        }))
    }

    /// Treat `active_file` as its own root.
    pub fn standalone(active_file: &Path, line: usize) -> Self {
        Self {
            root: active_file.to_path_buf(),
            ending: None,
            active_file: active_file.to_path_buf(),
            line,
        }
    }

    /// Cutoff at the cursor within the active file.
    pub fn cursor(&self) -> EndingContext {
        EndingContext::new(&self.active_file, self.line)
    }
}

/// Build the context visible at `plan`'s cursor.
pub fn build_context(graph: &IncludeGraph<'_>, plan: &ResolutionPlan) -> Result<Context, ResolveError> {
    let mut context = Context::new(plan.root.clone());
    if let Some(ending) = &plan.ending {
        ContextBuilder::new(graph, Some(ending)).build(&plan.root, &mut context)?;
    }
    let cursor = plan.cursor();
    ContextBuilder::new(graph, Some(&cursor)).build(&plan.active_file, &mut context)?;
    Ok(context)
}

/// Flatten everything visible at `plan`'s cursor, ending in an echo target.
pub fn flatten_plan(
    graph: &IncludeGraph<'_>,
    plan: &ResolutionPlan,
    query: &VariableQuery,
) -> Result<FlattenedDocument, ResolveError> {
    let mut flattener = Flattener::new(graph);
    if let Some(ending) = &plan.ending {
        flattener.append_file(&plan.root, Some(ending))?;
    }
    let cursor = plan.cursor();
    flattener.append_file(&plan.active_file, Some(&cursor))?;
    Ok(flattener.finish(&query.name, &query.expression))
}

/// Answers variable queries for a plan
#[async_trait]
pub trait ResolutionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn resolve(
        &self,
        plan: &ResolutionPlan,
        query: &VariableQuery,
    ) -> Result<Resolution, ApiError>;
}

/// The in-process engine: build the context, then expand.
pub struct TextualStrategy {
    source: Arc<dyn SourceReader>,
    base: IncludeBase,
}

impl TextualStrategy {
    pub fn new(source: Arc<dyn SourceReader>, base: IncludeBase) -> Self {
        Self { source, base }
    }

    /// Synchronous form of [`ResolutionStrategy::resolve`].
    pub fn resolve_now(
        &self,
        plan: &ResolutionPlan,
        query: &VariableQuery,
    ) -> Result<Resolution, ResolveError> {
        let graph = IncludeGraph::new(self.source.as_ref(), &plan.root, self.base);
        let context = build_context(&graph, plan)?;

        if !query.is_plain_reference() {
            let value = expand_text(&query.expression, &context)?;
            return Ok(Resolution::Value {
                value,
                variable: None,
            });
        }

        if query.name == PWD {
            return Ok(Resolution::Value {
                value: context.source_dir(),
                variable: None,
            });
        }

        match context.get(&query.name) {
            Some(variable) => {
                let expanded = expand_variable(variable, &context)?;
                debug!(name = %query.name, value = %expanded.recipe, "Resolved textually");
                Ok(Resolution::Value {
                    value: expanded.recipe.clone(),
                    variable: Some(expanded),
                })
            }
            None => Ok(Resolution::Undefined),
        }
    }
}

#[async_trait]
impl ResolutionStrategy for TextualStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Textual
    }

    async fn resolve(
        &self,
        plan: &ResolutionPlan,
        query: &VariableQuery,
    ) -> Result<Resolution, ApiError> {
        Ok(self.resolve_now(plan, query)?)
    }
}

/// Flatten, stage into the scratch arena, and ask Make to echo the value.
pub struct EvaluatedStrategy {
    source: Arc<dyn SourceReader>,
    base: IncludeBase,
    scratch: Arc<ScratchArena>,
    runner: Arc<dyn MakeRunner>,
}

impl EvaluatedStrategy {
    pub fn new(
        source: Arc<dyn SourceReader>,
        base: IncludeBase,
        scratch: Arc<ScratchArena>,
        runner: Arc<dyn MakeRunner>,
    ) -> Self {
        Self {
            source,
            base,
            scratch,
            runner,
        }
    }
}

#[async_trait]
impl ResolutionStrategy for EvaluatedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Evaluated
    }

    async fn resolve(
        &self,
        plan: &ResolutionPlan,
        query: &VariableQuery,
    ) -> Result<Resolution, ApiError> {
        let document = {
            let graph = IncludeGraph::new(self.source.as_ref(), &plan.root, self.base);
            flatten_plan(&graph, plan, query)?
        };
        let generation = self.scratch.current()?;
        let staged = generation.stage(&document)?;

        let invocation = MakeInvocation {
            makefile: staged.path().to_path_buf(),
            target: document.target().to_string(),
            working_directory: plan
                .root
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("/")),
        };

        match self.runner.run(&invocation).await {
            Ok(output) => {
                let value = output.stdout.trim_end_matches(['\n', '\r']).to_string();
                debug!(name = %query.name, duration_ms = output.duration_ms, "Resolved through make");
                Ok(Resolution::Value {
                    value,
                    variable: None,
                })
            }
            Err(EvaluatorError::Failed { status, stderr }) => {
                warn!(name = %query.name, status, "make rejected synthetic makefile");
                Err(EvaluatorError::Failed {
                    status,
                    stderr: annotate_stderr(&stderr, staged.path(), &document),
                }
                .into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Append the originating source location to Make diagnostics that point
/// into the synthetic file.
fn annotate_stderr(stderr: &str, makefile: &Path, document: &FlattenedDocument) -> String {
    let file_name = makefile
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Ok(pattern) = Regex::new(&format!(r"{}:(\d+):", regex::escape(&file_name))) else {
        return stderr.to_string();
    };

    stderr
        .lines()
        .map(|line| {
            let origin = pattern
                .captures(line)
                .and_then(|caps| caps[1].parse::<usize>().ok())
                .and_then(|n| document.origin(n));
            match origin {
                Some(LineOrigin::Source { file, line: src }) => {
                    format!("{} (at {}:{})", line, file.display(), src + 1)
                }
                _ => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
