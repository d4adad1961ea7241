//! Integration tests for the clarifier Makefile resolver

mod cli_routes;
mod config_integration;
mod end_to_end;
mod evaluator_path;
mod include_graph;
pub mod test_utils;
