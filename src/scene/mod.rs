//! Deterministic per-frame scene states.
//!
//! A [`sequencer::SceneSequencer`] animates one file-change; a [`script::CommitSceneAssembler`]
//! chains them into the [`script::AnimationScript`] of a whole commit.

pub mod script;
pub mod sequencer;
pub mod state;
