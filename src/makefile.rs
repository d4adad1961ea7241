//! Makefile variable resolution engine
//!
//! Walks the include graph of a root Makefile, applies the four assignment
//! operators up to a cutoff point, and expands `$(NAME)` references. The
//! flattener produces a single synthetic Makefile for evaluation by a real
//! Make instead.

pub mod builder;
pub mod ending;
pub mod expand;
pub mod flatten;
pub mod graph;
pub mod line;
pub mod path;
pub mod source;
pub mod variable;

pub use builder::ContextBuilder;
pub use ending::{locate, EndingContext};
pub use expand::{expand_text, expand_variable, references, Reference};
pub use flatten::{FlattenedDocument, Flattener};
pub use graph::{IncludeBase, IncludeGraph};
pub use line::{classify, AssignOp, Assignment, LineKind};
pub use source::{FsSource, MemorySource, SourceReader};
pub use variable::{Context, Location, Variable};
