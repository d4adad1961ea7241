//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string for log spans (e.g. "hover", "flatten").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Hover { .. } => "hover",
        Commands::Resolve { .. } => "resolve",
        Commands::Locate { .. } => "locate",
        Commands::Context { .. } => "context",
        Commands::Flatten { .. } => "flatten",
        Commands::Roots { .. } => "roots",
        Commands::Config => "config",
    }
}

/// Requested output format, for commands that take one.
pub fn output_format(command: &Commands) -> Option<&str> {
    match command {
        Commands::Hover { format, .. }
        | Commands::Resolve { format, .. }
        | Commands::Locate { format, .. }
        | Commands::Context { format, .. }
        | Commands::Roots { format } => Some(format.as_str()),
        Commands::Flatten { .. } | Commands::Config => None,
    }
}
