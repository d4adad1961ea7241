//! Merge rules: defaults first, later sources override earlier ones.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("discovery.makefile_names", vec!["Makefile"])?
        .set_default("discovery.max_roots", 1000_i64)?
        .set_default("discovery.follow_symlinks", false)?
        .set_default("resolver.strategy", "textual")?
        .set_default("resolver.include_base", "including-file")?
        .set_default("evaluator.make_program", "make")?
        .set_default("evaluator.timeout_ms", 5000_i64)?
        .set_default("logging.output", "stderr")
}
