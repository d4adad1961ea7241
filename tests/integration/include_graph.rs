//! Include graph behavior on real files: cycles, diamonds, optional and
//! missing includes, and the include base policy.

use super::test_utils::{plan, textual, Workspace};
use clarifier::error::{ApiError, ResolveError};
use clarifier::makefile::IncludeBase;
use clarifier::strategy::{StrategyKind, VariableQuery};
use clarifier::workspace::WorkspaceSession;

#[test]
fn test_cycle_fails_instead_of_recursing() {
    let ws = Workspace::new();
    let root = ws.write("Makefile", "include a.mk\n");
    ws.write("a.mk", "include b.mk\n");
    ws.write("b.mk", "include a.mk\n");
    let target = ws.path("never.mk");
    let session = ws.session();

    let err = session.plan(&root, &target, 0).unwrap_err();
    match err {
        ResolveError::CyclicInclude { chain } => {
            assert_eq!(chain.len(), 4);
            assert!(chain[3].ends_with("a.mk"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_diamond_is_not_a_cycle() {
    let ws = Workspace::new();
    let root = ws.write("Makefile", "include left.mk\ninclude right.mk\nEND = 1\n");
    ws.write("left.mk", "include common.mk\n");
    ws.write("right.mk", "include common.mk\n");
    ws.write("common.mk", "COUNT += x\n");
    let session = ws.session();

    let plan = plan(&session, &root, &root, 3);
    assert_eq!(textual(&session, &plan, "COUNT").await, "x x");
}

#[tokio::test]
async fn test_optional_includes_are_skipped() {
    let ws = Workspace::new();
    let root = ws.write(
        "Makefile",
        "-include missing.mk\nsinclude also-missing.mk\nA = 1\n",
    );
    let session = ws.session();

    let plan = plan(&session, &root, &root, 3);
    assert_eq!(textual(&session, &plan, "A").await, "1");
}

#[tokio::test]
async fn test_missing_include_propagates() {
    let ws = Workspace::new();
    let root = ws.write("Makefile", "A = 1\ninclude gone.mk\n");
    let session = ws.session();
    let plan = session.plan(&root, &root, usize::MAX).unwrap().unwrap();

    let err = session
        .resolve(&plan, &VariableQuery::new("A"), StrategyKind::Textual)
        .await
        .unwrap_err();
    match err {
        ApiError::Resolve(ResolveError::UnresolvedInclude { path, line, .. }) => {
            assert!(path.ends_with("gone.mk"));
            assert_eq!(line, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_root_include_base() {
    let ws = Workspace::new();
    let root = ws.write("Makefile", "include mk/first.mk\n");
    // Resolved against the root's directory, not mk/.
    ws.write("mk/first.mk", "include mk/second.mk\n");
    let second = ws.write("mk/second.mk", "DEPTH = 2\n");

    let mut config = ws.config();
    config.resolver.include_base = IncludeBase::Root;
    let session = WorkspaceSession::new(ws.root(), config);

    let plan = plan(&session, &root, &second, 1);
    assert_eq!(textual(&session, &plan, "DEPTH").await, "2");

    let default_session = ws.session();
    assert!(default_session.plan(&root, &second, 1).unwrap().is_none());
}

#[tokio::test]
async fn test_first_include_path_wins() {
    let ws = Workspace::new();
    let root = ws.write(
        "Makefile",
        "include via-a.mk\nFROM = root\ninclude shared.mk\n",
    );
    ws.write("via-a.mk", "FROM = a\ninclude shared.mk\n");
    let shared = ws.write("shared.mk", "SEEN = $(FROM)\n");
    let session = ws.session();

    let plan = plan(&session, &root, &shared, 1);
    assert!(plan.ending.as_ref().unwrap().file_path.ends_with("via-a.mk"));
    assert_eq!(textual(&session, &plan, "SEEN").await, "a");
}
