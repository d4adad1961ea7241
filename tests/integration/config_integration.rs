//! Layered configuration: global file, workspace files and environment.

use super::test_utils::{with_env, Workspace};
use clarifier::config::ConfigLoader;
use clarifier::makefile::IncludeBase;
use clarifier::strategy::StrategyKind;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_workspace_file_overrides_global_file() {
    let config_home = TempDir::new().unwrap();
    let global_dir = config_home.path().join("clarifier");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("config.toml"),
        "[evaluator]\nmake_program = \"gmake\"\ntimeout_ms = 100\n",
    )
    .unwrap();

    let ws = Workspace::new();
    ws.write(".clarifier/config.toml", "[evaluator]\ntimeout_ms = 900\n");

    let config = with_env(
        &[
            ("XDG_CONFIG_HOME", config_home.path().to_str()),
            ("CLARIFIER_ENV", None),
        ],
        || ConfigLoader::load(ws.root()).unwrap(),
    );
    assert_eq!(config.evaluator.make_program, "gmake");
    assert_eq!(config.evaluator.timeout_ms, 900);
}

#[test]
fn test_environment_file_layers_on_workspace_file() {
    let empty_home = TempDir::new().unwrap();
    let ws = Workspace::new();
    ws.write(".clarifier/config.toml", "[resolver]\nstrategy = \"evaluated\"\n");
    ws.write(".clarifier/ci.toml", "[resolver]\ninclude_base = \"root\"\n");

    let config = with_env(
        &[
            ("XDG_CONFIG_HOME", empty_home.path().to_str()),
            ("CLARIFIER_ENV", Some("ci")),
        ],
        || ConfigLoader::load(ws.root()).unwrap(),
    );
    assert_eq!(config.resolver.strategy, StrategyKind::Evaluated);
    assert_eq!(config.resolver.include_base, IncludeBase::Root);
}

#[test]
fn test_environment_variables_win() {
    let empty_home = TempDir::new().unwrap();
    let ws = Workspace::new();
    ws.write(".clarifier/config.toml", "[evaluator]\ntimeout_ms = 900\n");

    let config = with_env(
        &[
            ("XDG_CONFIG_HOME", empty_home.path().to_str()),
            ("CLARIFIER_ENV", None),
            ("CLARIFIER__EVALUATOR__TIMEOUT_MS", Some("1234")),
            ("CLARIFIER__DISCOVERY__MAKEFILE_NAMES", Some("Makefile,GNUmakefile")),
        ],
        || ConfigLoader::load(ws.root()).unwrap(),
    );
    assert_eq!(config.evaluator.timeout_ms, 1234);
    assert_eq!(
        config.discovery.makefile_names,
        vec!["Makefile".to_string(), "GNUmakefile".to_string()]
    );
}

#[test]
fn test_explicit_file_skips_discovery() {
    let ws = Workspace::new();
    ws.write(".clarifier/config.toml", "[evaluator]\ntimeout_ms = 900\n");
    let explicit = ws.write("elsewhere.toml", "[discovery]\nmax_roots = 2\n");

    let config = with_env(&[("CLARIFIER__EVALUATOR__TIMEOUT_MS", None)], || {
        ConfigLoader::load_from_file(&explicit).unwrap()
    });
    assert_eq!(config.discovery.max_roots, 2);
    assert_eq!(config.evaluator.timeout_ms, 5000);
}
