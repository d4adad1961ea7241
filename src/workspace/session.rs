//! Workspace session: discovered roots, scratch arena and hover.
//!
//! A hover resolves one variable against every root Makefile whose include
//! graph reaches the active file. Roots are resolved concurrently and each
//! reports its own outcome; when no root reaches the file, the file is
//! treated as its own root.

use super::discovery::RootDiscovery;
use crate::config::ClarifierConfig;
use crate::error::{ApiError, ResolveError};
use crate::evaluator::{workspace_scratch_dir, MakeRunner, ProcessMakeRunner, ScratchArena};
use crate::makefile::{FsSource, IncludeGraph, SourceReader};
use crate::strategy::{
    EvaluatedStrategy, Resolution, ResolutionPlan, ResolutionStrategy, StrategyKind,
    TextualStrategy, VariableQuery, UNDEFINED_MARKER,
};
use futures::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One hover request
#[derive(Debug, Clone)]
pub struct HoverRequest {
    pub active_file: PathBuf,
    /// 0-based line; scanning stops before it
    pub line: usize,
    pub query: VariableQuery,
    pub strategy: StrategyKind,
}

/// Per-root outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HoverOutcome {
    Value { value: String },
    Undefined,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverEntry {
    pub root: PathBuf,
    /// Root path relative to the workspace
    pub label: String,
    pub outcome: HoverOutcome,
}

impl HoverEntry {
    pub fn render(&self, name: &str) -> String {
        match &self.outcome {
            HoverOutcome::Value { value } => format!("{} : {}", self.label, value),
            HoverOutcome::Undefined => {
                format!("{} : {} {}", self.label, name, UNDEFINED_MARKER)
            }
            HoverOutcome::Failed { message } => format!("{} : error: {}", self.label, message),
        }
    }
}

/// All per-root outcomes for one hover
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverReport {
    pub name: String,
    pub active_file: PathBuf,
    /// True when no root reached the active file
    pub standalone: bool,
    pub entries: Vec<HoverEntry>,
}

impl HoverReport {
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.render(&self.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Per-workspace state shared by every request
pub struct WorkspaceSession {
    workspace_root: PathBuf,
    config: ClarifierConfig,
    source: Arc<dyn SourceReader>,
    runner: Arc<dyn MakeRunner>,
    scratch: Arc<ScratchArena>,
    roots: RwLock<Option<Vec<PathBuf>>>,
}

impl WorkspaceSession {
    pub fn new(workspace_root: impl Into<PathBuf>, config: ClarifierConfig) -> Self {
        let workspace_root = workspace_root.into();
        let workspace_root = dunce::canonicalize(&workspace_root).unwrap_or(workspace_root);
        let scratch_root = workspace_scratch_dir(&config.evaluator.scratch_base(), &workspace_root);
        let runner = ProcessMakeRunner::new(
            config.evaluator.make_program.clone(),
            config.evaluator.timeout(),
        );
        Self {
            workspace_root,
            source: Arc::new(FsSource),
            runner: Arc::new(runner),
            scratch: Arc::new(ScratchArena::new(scratch_root)),
            roots: RwLock::new(None),
            config,
        }
    }

    /// Replace the text host, e.g. with unsaved editor buffers.
    pub fn with_source(mut self, source: Arc<dyn SourceReader>) -> Self {
        self.source = source;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn MakeRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &ClarifierConfig {
        &self.config
    }

    pub fn scratch(&self) -> &ScratchArena {
        &self.scratch
    }

    /// Rediscover root Makefiles and open a fresh scratch generation.
    pub fn refresh(&self) -> Result<Vec<PathBuf>, ApiError> {
        let roots = RootDiscovery::new(&self.workspace_root, &self.config.discovery).discover()?;
        let generation = self.scratch.refresh()?;
        info!(
            workspace = %self.workspace_root.display(),
            roots = roots.len(),
            generation = generation.id(),
            "Refreshed workspace"
        );
        *self.roots.write() = Some(roots.clone());
        Ok(roots)
    }

    /// Known roots, discovering them on first use.
    pub fn roots(&self) -> Result<Vec<PathBuf>, ApiError> {
        if let Some(roots) = self.roots.read().as_ref() {
            return Ok(roots.clone());
        }
        self.refresh()
    }

    pub fn graph(&self, root: &Path) -> IncludeGraph<'_> {
        IncludeGraph::new(self.source.as_ref(), root, self.config.resolver.include_base)
    }

    pub fn source(&self) -> &dyn SourceReader {
        self.source.as_ref()
    }

    /// Plan resolution of `active_file` from `root`.
    pub fn plan(
        &self,
        root: &Path,
        active_file: &Path,
        line: usize,
    ) -> Result<Option<ResolutionPlan>, ResolveError> {
        ResolutionPlan::for_root(&self.graph(root), active_file, line)
    }

    pub fn strategy(&self, kind: StrategyKind) -> Arc<dyn ResolutionStrategy> {
        let base = self.config.resolver.include_base;
        match kind {
            StrategyKind::Textual => Arc::new(TextualStrategy::new(Arc::clone(&self.source), base)),
            StrategyKind::Evaluated => Arc::new(EvaluatedStrategy::new(
                Arc::clone(&self.source),
                base,
                Arc::clone(&self.scratch),
                Arc::clone(&self.runner),
            )),
        }
    }

    /// Resolve against a single plan. Errors propagate unchanged.
    pub async fn resolve(
        &self,
        plan: &ResolutionPlan,
        query: &VariableQuery,
        kind: StrategyKind,
    ) -> Result<Resolution, ApiError> {
        self.strategy(kind).resolve(plan, query).await
    }

    /// Resolve against every root that reaches the active file.
    pub async fn hover(&self, request: &HoverRequest) -> Result<HoverReport, ApiError> {
        let roots = self.roots()?;
        let mut plans = Vec::new();
        let mut failures = Vec::new();

        for root in &roots {
            match self.plan(root, &request.active_file, request.line) {
                Ok(Some(plan)) => plans.push(plan),
                Ok(None) => {}
                Err(e) => {
                    warn!(root = %root.display(), "Failed to plan root: {}", e);
                    failures.push(HoverEntry {
                        root: root.clone(),
                        label: self.label(root),
                        outcome: HoverOutcome::Failed {
                            message: e.to_string(),
                        },
                    });
                }
            }
        }

        // A root that failed to plan still reaches the file.
        let standalone = plans.is_empty() && failures.is_empty();
        if standalone {
            debug!(file = %request.active_file.display(), "No root reaches file, using it as its own root");
            plans.push(ResolutionPlan::standalone(&request.active_file, request.line));
        }

        let strategy = self.strategy(request.strategy);
        let outcomes = join_all(
            plans
                .iter()
                .map(|plan| strategy.resolve(plan, &request.query)),
        )
        .await;

        let mut entries: Vec<HoverEntry> = plans
            .iter()
            .zip(outcomes)
            .map(|(plan, outcome)| HoverEntry {
                root: plan.root.clone(),
                label: self.label(&plan.root),
                outcome: match outcome {
                    Ok(Resolution::Value { value, .. }) => HoverOutcome::Value { value },
                    Ok(Resolution::Undefined) => HoverOutcome::Undefined,
                    Err(e) => HoverOutcome::Failed {
                        message: e.to_string(),
                    },
                },
            })
            .collect();
        entries.extend(failures);
        entries.sort_by(|a, b| a.root.cmp(&b.root));

        Ok(HoverReport {
            name: request.query.name.clone(),
            active_file: request.active_file.clone(),
            standalone,
            entries,
        })
    }

    /// `root` relative to the workspace, for display.
    pub fn label(&self, root: &Path) -> String {
        root.strip_prefix(&self.workspace_root)
            .unwrap_or(root)
            .to_string_lossy()
            .into_owned()
    }
}
