//! Workspace domain: root discovery and the multi-root hover session.

mod discovery;
mod session;

pub use discovery::RootDiscovery;
pub use session::{HoverEntry, HoverOutcome, HoverReport, HoverRequest, WorkspaceSession};
