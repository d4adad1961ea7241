//! CLI presentation: text formatters per command family.

mod context;
mod resolve;
mod shared;

pub use context::format_context_text;
pub use resolve::{format_hover_text, format_locate_text, format_resolution_text};
pub use shared::{format_roots_text, format_section_heading};
