//! CLI route table driven through `RunContext`.

use super::test_utils::Workspace;
use clap::Parser;
use clarifier::cli::{Cli, RunContext};
use clarifier::error::ApiError;

fn run(ws: &Workspace, args: &[&str]) -> Result<String, ApiError> {
    let root = ws.root().to_string_lossy().into_owned();
    let mut argv = vec!["clarifier", "--workspace", root.as_str()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let context = RunContext::with_config(cli.workspace.clone(), ws.config()).unwrap();
    context.execute(&cli.command)
}

fn fixture() -> Workspace {
    let ws = Workspace::new();
    ws.write("Makefile", "CC = gcc\ninclude src/build.mk\n");
    ws.write("src/build.mk", "CFLAGS = -O2\nCMD = $(CC) $(CFLAGS)\nLATE = 1\n");
    ws
}

#[test]
fn test_hover_text_output() {
    let ws = fixture();
    let file = ws.path("src/build.mk").to_string_lossy().into_owned();
    let out = run(&ws, &["hover", &file, "CMD", "--line", "3"]).unwrap();
    assert!(out.ends_with("Makefile : gcc -O2"), "got {out}");
}

#[test]
fn test_hover_line_is_exclusive() {
    let ws = fixture();
    let file = ws.path("src/build.mk").to_string_lossy().into_owned();
    let out = run(&ws, &["hover", &file, "CMD", "--line", "2"]).unwrap();
    assert!(out.ends_with("Makefile : CMD IS UNDEFINED IN THIS CONTEXT"), "got {out}");
}

#[test]
fn test_resolve_json_output() {
    let ws = fixture();
    let root = ws.path("Makefile").to_string_lossy().into_owned();
    let file = ws.path("src/build.mk").to_string_lossy().into_owned();
    let out = run(
        &ws,
        &["resolve", "--root", &root, &file, "CMD", "--format", "json"],
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["name"], "CMD");
    assert_eq!(value["strategy"], "textual");
    assert_eq!(value["resolution"]["status"], "value");
    assert_eq!(value["resolution"]["value"], "gcc -O2");
}

#[test]
fn test_locate_reports_one_based_line() {
    let ws = fixture();
    let root = ws.path("Makefile").to_string_lossy().into_owned();
    let file = ws.path("src/build.mk").to_string_lossy().into_owned();
    let out = run(&ws, &["locate", "--root", &root, &file]).unwrap();
    assert!(out.ends_with("Makefile:2"), "got {out}");
}

#[test]
fn test_flatten_prints_synthetic_makefile() {
    let ws = fixture();
    let root = ws.path("Makefile").to_string_lossy().into_owned();
    let file = ws.path("src/build.mk").to_string_lossy().into_owned();
    let out = run(
        &ws,
        &["flatten", "--root", &root, &file, "CMD", "--line", "3"],
    )
    .unwrap();

    assert!(out.contains("CC = gcc"));
    assert!(out.contains("CMD = $(CC) $(CFLAGS)"));
    assert!(!out.contains("LATE"));
    assert!(out.ends_with("makefile-clairifier-CMD:\n\t@echo $(CMD)"));
}

#[test]
fn test_context_json_lists_variables_in_order() {
    let ws = fixture();
    let root = ws.path("Makefile").to_string_lossy().into_owned();
    let file = ws.path("src/build.mk").to_string_lossy().into_owned();
    let out = run(
        &ws,
        &["context", "--root", &root, &file, "--format", "json"],
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let names: Vec<&str> = value["variables"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["CC", "CFLAGS", "CMD", "LATE"]);
}

#[test]
fn test_roots_json() {
    let ws = fixture();
    ws.write("sub/Makefile", "");
    let out = run(&ws, &["roots", "--format", "json"]).unwrap();
    let roots: Vec<String> = serde_json::from_str(&out).unwrap();
    assert_eq!(roots.len(), 2);
    assert!(roots[1].ends_with("sub/Makefile"));
}

#[test]
fn test_config_prints_toml() {
    let ws = fixture();
    let out = run(&ws, &["config"]).unwrap();
    assert!(out.contains("[discovery]"));
    assert!(out.contains("make_program = \"make\""));
}

#[test]
fn test_unrelated_root_is_rejected() {
    let ws = fixture();
    ws.write("other/Makefile", "X = 1\n");
    let root = ws.path("other/Makefile").to_string_lossy().into_owned();
    let file = ws.path("src/build.mk").to_string_lossy().into_owned();
    let err = run(&ws, &["resolve", "--root", &root, &file, "CMD"]).unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[test]
fn test_bad_format_and_strategy_are_rejected() {
    let ws = fixture();
    let file = ws.path("Makefile").to_string_lossy().into_owned();
    assert!(matches!(
        run(&ws, &["hover", &file, "CC", "--format", "yaml"]),
        Err(ApiError::InvalidArgument(_))
    ));
    assert!(matches!(
        run(&ws, &["hover", &file, "CC", "--strategy", "guess"]),
        Err(ApiError::InvalidArgument(_))
    ));
}
