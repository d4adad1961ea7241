//! Property-based tests for assignment and expansion semantics

mod operators;
