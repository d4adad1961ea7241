//! External Make evaluation: subprocess runner and scratch arena.

pub mod runner;
pub mod scratch;

pub use runner::{MakeInvocation, MakeOutput, MakeRunner, ProcessMakeRunner};
pub use scratch::{
    default_scratch_base, workspace_scratch_dir, ScratchArena, ScratchGeneration, StagedFile,
};
