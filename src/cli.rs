//! CLI domain: parse, route, help, output, and presentation only.
//! No resolution logic; a single route table dispatches to the workspace session.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_name, output_format};
pub use output::{map_error, to_json};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_context_text, format_hover_text, format_locate_text, format_resolution_text,
    format_roots_text, format_section_heading,
};
pub use route::RunContext;
