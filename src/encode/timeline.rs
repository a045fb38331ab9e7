use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::ffmpeg::{EncodeConfig, FfmpegEncoder},
    foundation::{
        config::Config,
        core::{FRAME_EXTENSION, FrameIndex},
        error::{DiffreelError, DiffreelResult},
    },
};

/// List the frames of one commit directory in index order.
///
/// Every entry must be a frame file and indices must run `0..n` without gaps.
pub fn list_frames(dir: &Path) -> DiffreelResult<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read frame directory '{}'", dir.display()))?;

    let mut frames = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read frame directory '{}'", dir.display()))?;
        let name = entry.file_name();
        let idx = name
            .to_str()
            .and_then(FrameIndex::parse_file_name)
            .ok_or_else(|| {
                DiffreelError::validation(format!(
                    "unexpected entry '{}' in frame directory '{}' (want NNNNNNNNN.{FRAME_EXTENSION})",
                    name.to_string_lossy(),
                    dir.display()
                ))
            })?;
        frames.push((idx, entry.path()));
    }
    frames.sort_by_key(|(idx, _)| *idx);

    for (expected, (idx, path)) in frames.iter().enumerate() {
        if idx.0 != expected as u64 {
            return Err(DiffreelError::validation(format!(
                "frame '{}' breaks the sequence (expected index {expected})",
                path.display()
            )));
        }
    }

    Ok(frames.into_iter().map(|(_, path)| path).collect())
}

/// Concatenates per-commit frame directories, in the given order, into one MP4.
#[derive(Clone, Debug)]
pub struct TimelineAssembler {
    pub fps: u32,
    pub output: PathBuf,
}

impl TimelineAssembler {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            fps: cfg.fps,
            output: cfg.output.clone(),
        }
    }

    /// Encode all frames. Returns the frame count, or `None` when there was nothing to encode.
    ///
    /// Every frame must have the size of the first one.
    #[tracing::instrument(skip(self, dirs), fields(output = %self.output.display(), dirs = dirs.len()))]
    pub fn assemble(&self, dirs: &[PathBuf]) -> DiffreelResult<Option<u64>> {
        let mut frames = Vec::new();
        for dir in dirs {
            frames.extend(list_frames(dir)?);
        }

        let Some(first) = frames.first() else {
            tracing::warn!("no frames to assemble; no video written");
            return Ok(None);
        };

        let (width, height) = image::image_dimensions(first)
            .map_err(|e| DiffreelError::encode(format!("read '{}': {e}", first.display())))?;
        let cfg = EncodeConfig::new(&self.output, width, height, self.fps)?;
        let mut enc = FfmpegEncoder::spawn(&cfg)?;

        for path in &frames {
            let img = decode_frame(path)?;
            if img.dimensions() != (width, height) {
                return Err(DiffreelError::validation(format!(
                    "frame '{}' is {}x{}, expected {width}x{height}",
                    path.display(),
                    img.width(),
                    img.height()
                )));
            }
            enc.push(img.as_raw())?;
        }
        let count = enc.finish()?;

        tracing::info!(frames = count, "video written");
        Ok(Some(count))
    }
}

fn decode_frame(path: &Path) -> DiffreelResult<image::RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| DiffreelError::encode(format!("decode frame '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/timeline.rs"]
mod tests;
