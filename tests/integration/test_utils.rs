//! Shared test utilities for integration tests
//!
//! Workspace fixtures on disk, environment isolation for configuration tests,
//! and detection of a usable `make` for evaluator tests.

use clarifier::config::ClarifierConfig;
use clarifier::strategy::{ResolutionPlan, StrategyKind, VariableQuery};
use clarifier::workspace::WorkspaceSession;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// A workspace of Makefiles in a temporary directory
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `text` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, text).unwrap();
        path
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Default config with the scratch arena kept inside the workspace.
    pub fn config(&self) -> ClarifierConfig {
        let mut config = ClarifierConfig::default();
        config.evaluator.scratch_dir = Some(self.dir.path().join(".clarifier").join("scratch"));
        config
    }

    pub fn session(&self) -> WorkspaceSession {
        WorkspaceSession::new(self.root(), self.config())
    }
}

/// Plan from `root` to `file` at the 0-based `line`, which must exist.
pub fn plan(session: &WorkspaceSession, root: &Path, file: &Path, line: usize) -> ResolutionPlan {
    session
        .plan(root, file, line)
        .unwrap()
        .expect("root should reach the active file")
}

/// Resolve `name` with the textual strategy and render the outcome.
pub async fn textual(session: &WorkspaceSession, plan: &ResolutionPlan, name: &str) -> String {
    session
        .resolve(plan, &VariableQuery::new(name), StrategyKind::Textual)
        .await
        .unwrap()
        .render(name)
}

/// Whether a `make` binary can be spawned.
pub fn make_available() -> bool {
    Command::new("make")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run `f` with the given environment variables set, restoring them after.
pub fn with_env<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
        .collect();

    for (key, value) in vars {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }

    let result = f();

    for (key, value) in saved {
        match value {
            Some(value) => std::env::set_var(&key, value),
            None => std::env::remove_var(&key),
        }
    }
    result
}
