//! Clarifier: Makefile variable resolution
//!
//! Answers "what is the value of variable NAME at this line of this file",
//! taking into account every root Makefile whose include graph reaches the
//! file. Values come either from an in-process textual engine or from a real
//! Make run over a flattened copy of the include graph.

pub mod cli;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod logging;
pub mod makefile;
pub mod strategy;
pub mod workspace;
