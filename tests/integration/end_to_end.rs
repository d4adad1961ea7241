//! End-to-end resolution through the textual engine on real files.

use super::test_utils::{plan, textual, Workspace};

#[tokio::test]
async fn test_value_from_including_root() {
    let ws = Workspace::new();
    let root = ws.write("Makefile", "A = 1\ninclude sub.mk\n");
    let sub = ws.write("sub.mk", "B = $(A)_x\n\n");
    let session = ws.session();

    let plan = plan(&session, &root, &sub, 1);
    assert_eq!(textual(&session, &plan, "B").await, "1_x");
}

#[tokio::test]
async fn test_append_joins_with_space() {
    let ws = Workspace::new();
    let root = ws.write("Makefile", "X = foo\nX += bar\n");
    let session = ws.session();

    let plan = plan(&session, &root, &root, 2);
    assert_eq!(textual(&session, &plan, "X").await, "foo bar");
}

#[tokio::test]
async fn test_unassigned_name_renders_marker() {
    let ws = Workspace::new();
    let root = ws.write("Makefile", "A = 1\n");
    let session = ws.session();

    let plan = plan(&session, &root, &root, 1);
    assert_eq!(
        textual(&session, &plan, "NOPE").await,
        "NOPE IS UNDEFINED IN THIS CONTEXT"
    );
}

#[tokio::test]
async fn test_nothing_after_cursor_is_visible() {
    let ws = Workspace::new();
    let root = ws.write(
        "Makefile",
        "EARLY = 1\ninclude active.mk\ninclude late.mk\nROOT_LATE = 1\n",
    );
    let active = ws.write("active.mk", "BEFORE = 1\nAFTER = 1\n");
    ws.write("late.mk", "SIBLING = 1\n");
    let session = ws.session();

    let plan = plan(&session, &root, &active, 1);
    assert_eq!(textual(&session, &plan, "EARLY").await, "1");
    assert_eq!(textual(&session, &plan, "BEFORE").await, "1");
    for name in ["AFTER", "SIBLING", "ROOT_LATE"] {
        assert_eq!(
            textual(&session, &plan, name).await,
            format!("{} IS UNDEFINED IN THIS CONTEXT", name)
        );
    }
}

#[tokio::test]
async fn test_operator_semantics_across_files() {
    let ws = Workspace::new();
    let root = ws.write(
        "Makefile",
        "CC = cc\nCFLAGS := -O2\ninclude build/flags.mk\n",
    );
    let flags = ws.write(
        "build/flags.mk",
        "CC ?= clang\nCFLAGS += -Wall\nOPT := $(CFLAGS)\nCFLAGS = -O0\nOUT = $(PWD)/out\n\n",
    );
    let session = ws.session();

    let plan = plan(&session, &root, &flags, 5);
    assert_eq!(textual(&session, &plan, "CC").await, "cc");
    assert_eq!(textual(&session, &plan, "OPT").await, "-O2 -Wall");
    assert_eq!(textual(&session, &plan, "CFLAGS").await, "-O0");
    // $(PWD) is the root Makefile's directory.
    assert_eq!(
        textual(&session, &plan, "OUT").await,
        format!("{}/out", ws.root().display())
    );
}
