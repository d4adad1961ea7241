//! Loader facade tying the configuration sources together.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::ClarifierConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use std::path::{Path, PathBuf};

/// Loads [`ClarifierConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, workspace files, then environment.
    pub fn load(workspace_root: &Path) -> Result<ClarifierConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        Self::finish(builder)
    }

    /// Defaults, `path`, then environment. File discovery is skipped.
    pub fn load_from_file(path: &Path) -> Result<ClarifierConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?.add_source(File::from(path));
        Self::finish(builder)
    }

    /// Built-in defaults only.
    pub fn default() -> ClarifierConfig {
        ClarifierConfig::default()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    pub fn workspace_config_dir(workspace_root: &Path) -> PathBuf {
        workspace_file::workspace_config_dir(workspace_root)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<ClarifierConfig, ConfigError> {
        builder
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

/// `CLARIFIER__SECTION__KEY` variables, comma-separated for lists.
fn environment() -> Environment {
    Environment::with_prefix("CLARIFIER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("discovery.makefile_names")
        .with_list_parse_key("discovery.ignore_patterns")
}
