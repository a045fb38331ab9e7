//! Where commits and their diffs come from.

pub mod commits;
/// `git` command-line adapter.
pub mod git;
/// Unified diff parsing.
pub mod patch;
