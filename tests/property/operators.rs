//! Operator semantics hold for arbitrary names and values.

use clarifier::makefile::{
    expand_text, Context, ContextBuilder, EndingContext, IncludeBase, IncludeGraph, MemorySource,
};
use proptest::prelude::*;
use std::path::{Path, PathBuf};

const ROOT: &str = "/ws/Makefile";

fn name() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,7}".prop_filter("PWD is reserved", |n| n != "PWD")
}

fn value() -> impl Strategy<Value = String> {
    "[a-z0-9.-]{1,8}"
}

fn build(text: &str, cutoff: Option<usize>) -> Context {
    let source = MemorySource::new().with_file(ROOT, text);
    let graph = IncludeGraph::new(&source, ROOT, IncludeBase::IncludingFile);
    let ending = cutoff.map(|line| EndingContext::new(ROOT, line));
    let mut context = Context::new(PathBuf::from(ROOT));
    ContextBuilder::new(&graph, ending.as_ref())
        .build(Path::new(ROOT), &mut context)
        .unwrap();
    context
}

fn resolve(context: &Context, name: &str) -> String {
    expand_text(&format!("$({})", name), context).unwrap()
}

proptest! {
    #[test]
    fn undefined_references_expand_to_empty(defined in name(), missing in name(), v in value()) {
        prop_assume!(defined != missing);
        let context = build(&format!("{} = {}", defined, v), None);
        let text = format!("[$({})]", missing);
        prop_assert_eq!(expand_text(&text, &context).unwrap(), "[]");
    }

    #[test]
    fn conditional_set_keeps_first_value(n in name(), first in value(), later in proptest::collection::vec(value(), 1..5)) {
        let mut text = format!("{} = {}\n", n, first);
        for v in &later {
            text.push_str(&format!("{} ?= {}\n", n, v));
        }
        prop_assert_eq!(resolve(&build(&text, None), &n), first);
    }

    #[test]
    fn append_preserves_order(n in name(), parts in proptest::collection::vec(value(), 1..6)) {
        let mut text = format!("{} = {}\n", n, parts[0]);
        for v in &parts[1..] {
            text.push_str(&format!("{} += {}\n", n, v));
        }
        prop_assert_eq!(resolve(&build(&text, None), &n), parts.join(" "));
    }

    #[test]
    fn last_overwrite_before_cutoff_wins(
        n in name(),
        values in proptest::collection::vec((value(), any::<bool>()), 1..6),
        cut in 1usize..6,
    ) {
        let text: String = values
            .iter()
            .map(|(v, immediate)| format!("{} {} {}\n", n, if *immediate { ":=" } else { "=" }, v))
            .collect();
        let cut = cut.min(values.len());
        prop_assert_eq!(resolve(&build(&text, Some(cut)), &n), values[cut - 1].0.clone());
    }

    #[test]
    fn pwd_is_never_a_bound_variable(v in value()) {
        let context = build(&format!("PWD = {}\nDIR = $(PWD)", v), None);
        prop_assert_eq!(resolve(&context, "DIR"), "/ws");
    }
}
