//! Configuration System
//!
//! Layered TOML configuration: built-in defaults, the global file, workspace
//! files, then `CLARIFIER__*` environment variables. Validation collects every
//! problem instead of stopping at the first.

use crate::evaluator::default_scratch_base;
use crate::logging::LoggingConfig;
use crate::makefile::IncludeBase;
use crate::strategy::StrategyKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClarifierConfig {
    /// Root Makefile discovery
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Textual resolver settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// External Make evaluator settings
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which files count as root Makefiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// File names treated as root Makefiles
    #[serde(default = "default_makefile_names")]
    pub makefile_names: Vec<String>,

    /// Path components skipped while walking the workspace
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Stop after this many roots
    #[serde(default = "default_max_roots")]
    pub max_roots: usize,

    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_makefile_names() -> Vec<String> {
    vec!["Makefile".to_string()]
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        ".git".to_string(),
        ".clarifier".to_string(),
        "target".to_string(),
        "node_modules".to_string(),
    ]
}

fn default_max_roots() -> usize {
    1000
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            makefile_names: default_makefile_names(),
            ignore_patterns: default_ignore_patterns(),
            max_roots: default_max_roots(),
            follow_symlinks: false,
        }
    }
}

/// Resolution defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub strategy: StrategyKind,

    #[serde(default)]
    pub include_base: IncludeBase,
}

/// External Make settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    #[serde(default = "default_make_program")]
    pub make_program: String,

    /// Hard limit for one Make run
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Base directory for synthetic Makefiles (platform cache dir if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
}

fn default_make_program() -> String {
    "make".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            make_program: default_make_program(),
            timeout_ms: default_timeout_ms(),
            scratch_dir: None,
        }
    }
}

impl EvaluatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn scratch_base(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(default_scratch_base)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Discovery(String),
    Evaluator(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Discovery(msg) => write!(f, "Discovery: {}", msg),
            ValidationError::Evaluator(msg) => write!(f, "Evaluator: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ClarifierConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.discovery.makefile_names.is_empty() {
            errors.push(ValidationError::Discovery(
                "makefile_names cannot be empty".to_string(),
            ));
        }
        if self
            .discovery
            .makefile_names
            .iter()
            .any(|name| name.trim().is_empty() || name.contains('/'))
        {
            errors.push(ValidationError::Discovery(
                "makefile_names must be plain file names".to_string(),
            ));
        }
        if self.discovery.max_roots == 0 {
            errors.push(ValidationError::Discovery(
                "max_roots must be at least 1".to_string(),
            ));
        }

        if self.evaluator.make_program.trim().is_empty() {
            errors.push(ValidationError::Evaluator(
                "make_program cannot be empty".to_string(),
            ));
        }
        if self.evaluator.timeout_ms == 0 {
            errors.push(ValidationError::Evaluator(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
