//! Frame storage and video output.
//!
//! Rendered frames go through a [`sink::FrameSink`] into per-commit directories; the
//! [`timeline::TimelineAssembler`] then streams them into `ffmpeg`.

/// `ffmpeg` encoder (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Frame sink trait and built-in sinks.
pub mod sink;
/// Concatenation of frame directories into one video.
pub mod timeline;
