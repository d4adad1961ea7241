//! CLI parse: clap types for clarifier. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clarifier CLI - resolve Makefile variables at a point in the include graph
#[derive(Parser)]
#[command(name = "clarifier")]
#[command(about = "Resolve Makefile variables at a point in the include graph")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (replaces global and workspace config files)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a variable against every root Makefile that includes FILE
    Hover {
        /// Makefile being edited
        file: PathBuf,
        /// Variable name
        name: String,
        /// 1-based line; scanning stops before it (default: end of file)
        #[arg(long)]
        line: Option<usize>,
        /// Resolution strategy (textual or evaluated; default from config)
        #[arg(long)]
        strategy: Option<String>,
        /// Expression to evaluate instead of $(NAME)
        #[arg(long)]
        expression: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve a variable from a single root Makefile
    Resolve {
        /// Root Makefile
        #[arg(long)]
        root: PathBuf,
        /// Makefile being edited
        file: PathBuf,
        /// Variable name
        name: String,
        /// 1-based line; scanning stops before it (default: end of file)
        #[arg(long)]
        line: Option<usize>,
        /// Resolution strategy (textual or evaluated; default from config)
        #[arg(long)]
        strategy: Option<String>,
        /// Expression to evaluate instead of $(NAME)
        #[arg(long)]
        expression: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the include directive through which ROOT reaches FILE
    Locate {
        /// Root Makefile
        #[arg(long)]
        root: PathBuf,
        /// Makefile being edited
        file: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show every variable visible at a point in FILE
    Context {
        /// Root Makefile
        #[arg(long)]
        root: PathBuf,
        /// Makefile being edited
        file: PathBuf,
        /// 1-based line; scanning stops before it (default: end of file)
        #[arg(long)]
        line: Option<usize>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the synthetic Makefile handed to make for a variable
    Flatten {
        /// Root Makefile
        #[arg(long)]
        root: PathBuf,
        /// Makefile being edited
        file: PathBuf,
        /// Variable name
        name: String,
        /// 1-based line; scanning stops before it (default: end of file)
        #[arg(long)]
        line: Option<usize>,
        /// Expression to evaluate instead of $(NAME)
        #[arg(long)]
        expression: Option<String>,
    },
    /// List root Makefiles discovered in the workspace
    Roots {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}
