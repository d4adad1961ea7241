//! CLI route: single route table and run context. Dispatches to the
//! workspace session and presentation.

use crate::cli::output::to_json;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_context_text, format_hover_text, format_locate_text, format_resolution_text,
    format_roots_text,
};
use crate::cli::{command_name, output_format};
use crate::config::{ClarifierConfig, ConfigLoader};
use crate::error::ApiError;
use crate::strategy::{build_context, flatten_plan, ResolutionPlan, StrategyKind, VariableQuery};
use crate::workspace::{HoverRequest, WorkspaceSession};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// Runtime context for CLI execution: the workspace session and the async
/// runtime that drives it. Built from workspace path and optional config path.
pub struct RunContext {
    session: WorkspaceSession,
    runtime: Runtime,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config)
    }

    /// Create run context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: ClarifierConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to start async runtime: {}", e)))?;

        Ok(Self {
            session: WorkspaceSession::new(workspace_root, config),
            runtime,
        })
    }

    pub fn session(&self) -> &WorkspaceSession {
        &self.session
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        if let Some(format) = output_format(command) {
            if format != "text" && format != "json" {
                return Err(ApiError::InvalidArgument(format!(
                    "Invalid format: {} (must be 'text' or 'json')",
                    format
                )));
            }
        }

        let started = Instant::now();
        let result = self.execute_inner(command);
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Hover {
                file,
                name,
                line,
                strategy,
                expression,
                format,
            } => {
                let request = HoverRequest {
                    active_file: absolute_path(file)?,
                    line: cursor_line(*line)?,
                    query: query(name, expression.as_deref()),
                    strategy: self.strategy_kind(strategy.as_deref())?,
                };
                let report = self.runtime.block_on(self.session.hover(&request))?;
                if format == "json" {
                    to_json(&report)
                } else {
                    Ok(format_hover_text(&report))
                }
            }
            Commands::Resolve {
                root,
                file,
                name,
                line,
                strategy,
                expression,
                format,
            } => {
                let plan = self.required_plan(root, file, *line)?;
                let query = query(name, expression.as_deref());
                let kind = self.strategy_kind(strategy.as_deref())?;
                let resolution = self
                    .runtime
                    .block_on(self.session.resolve(&plan, &query, kind))?;
                if format == "json" {
                    to_json(&json!({
                        "root": plan.root,
                        "file": plan.active_file,
                        "name": query.name,
                        "strategy": kind,
                        "resolution": resolution,
                    }))
                } else {
                    Ok(format_resolution_text(&query.name, &resolution))
                }
            }
            Commands::Locate { root, file, format } => {
                let root = absolute_path(root)?;
                let file = absolute_path(file)?;
                let plan = self.session.plan(&root, &file, 0)?;
                if format == "json" {
                    to_json(&json!({
                        "root": root,
                        "file": file,
                        "reachable": plan.is_some(),
                        "ending": plan.as_ref().and_then(|p| p.ending.as_ref()),
                    }))
                } else {
                    Ok(format_locate_text(plan.as_ref(), &root, &file))
                }
            }
            Commands::Context {
                root,
                file,
                line,
                format,
            } => {
                let plan = self.required_plan(root, file, *line)?;
                let context = build_context(&self.session.graph(&plan.root), &plan)?;
                if format == "json" {
                    to_json(&context)
                } else {
                    Ok(format_context_text(&context, &plan.active_file))
                }
            }
            Commands::Flatten {
                root,
                file,
                name,
                line,
                expression,
            } => {
                let plan = self.required_plan(root, file, *line)?;
                let query = query(name, expression.as_deref());
                let document = flatten_plan(&self.session.graph(&plan.root), &plan, &query)?;
                Ok(document.render().trim_end().to_string())
            }
            Commands::Roots { format } => {
                let roots = self.session.refresh()?;
                if format == "json" {
                    to_json(&roots)
                } else {
                    Ok(format_roots_text(self.session.workspace_root(), &roots))
                }
            }
            Commands::Config => self
                .session
                .config()
                .to_toml()
                .map(|s| s.trim_end().to_string())
                .map_err(|e| ApiError::Output(e.to_string())),
        }
    }

    /// Plan from an explicit root; a root that never includes the file is
    /// rejected.
    fn required_plan(
        &self,
        root: &Path,
        file: &Path,
        line: Option<usize>,
    ) -> Result<ResolutionPlan, ApiError> {
        let root = absolute_path(root)?;
        let file = absolute_path(file)?;
        let line = cursor_line(line)?;
        debug!(root = %root.display(), file = %file.display(), line, "Planning resolution");
        self.session.plan(&root, &file, line)?.ok_or_else(|| {
            ApiError::InvalidArgument(format!(
                "{} does not include {}",
                root.display(),
                file.display()
            ))
        })
    }

    fn strategy_kind(&self, flag: Option<&str>) -> Result<StrategyKind, ApiError> {
        match flag {
            Some(value) => value.parse(),
            None => Ok(self.session.config().resolver.strategy),
        }
    }
}

fn query(name: &str, expression: Option<&str>) -> VariableQuery {
    let query = VariableQuery::new(name);
    match expression {
        Some(expression) => query.with_expression(expression),
        None => query,
    }
}

/// Convert the 1-based exclusive `--line` to a 0-based cutoff.
fn cursor_line(line: Option<usize>) -> Result<usize, ApiError> {
    match line {
        None => Ok(usize::MAX),
        Some(0) => Err(ApiError::InvalidArgument(
            "--line is 1-based and must be at least 1".to_string(),
        )),
        Some(n) => Ok(n - 1),
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf, ApiError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| {
                ApiError::InvalidArgument(format!("Cannot resolve {}: {}", path.display(), e))
            })?
            .join(path)
    };
    Ok(dunce::canonicalize(&joined).unwrap_or(joined))
}
