//! diffreel turns git commits into short "someone is typing this diff" video clips.
//!
//! - [`source`] lists commits and reads their per-file changes
//! - [`diff`] classifies change blocks into wrapped display lines
//! - [`scene`] expands each file-change into a deterministic sequence of scene states
//! - [`render`] draws scene states over a background canvas
//! - [`encode`] stores frames per commit and assembles them into an MP4
#![forbid(unsafe_code)]

pub mod diff;
pub mod encode;
mod foundation;
pub mod render;
pub mod scene;
pub mod source;

pub use crate::foundation::config::{Config, HeaderStyle, LayoutConfig, Palette, SequenceConfig};
pub use crate::foundation::core::{Canvas, FrameIndex, Rgba8};
pub use crate::foundation::error::{DiffreelError, DiffreelResult};

pub use crate::diff::change::{FileChange, FileChangeKind};
pub use crate::diff::classify::{ChangeKind, ClassifiedLine, classify_bytes, classify_lines};
pub use crate::encode::sink::{FrameDirSink, FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::timeline::TimelineAssembler;
pub use crate::render::assets::RenderAssets;
pub use crate::render::backend::{FrameRGBA, RenderBackend};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::{RenderSummary, render_commit, render_script, render_tag_video};
pub use crate::scene::script::{AnimationScript, CommitSceneAssembler};
pub use crate::scene::sequencer::{FileSceneContext, SceneSequencer, frame_count};
pub use crate::scene::state::{SceneState, SlotState};
pub use crate::source::commits::{CommitInfo, CommitSource, TagRange, numbered_tag_ranges};
pub use crate::source::git::GitCli;
