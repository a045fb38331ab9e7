use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{Canvas, FrameIndex, flatten_to_opaque_rgba8},
        error::{DiffreelError, DiffreelResult},
    },
    render::backend::FrameRGBA,
};

/// Configuration provided to a [`FrameSink`] at the start of a commit render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    pub canvas: Canvas,
    pub fps: u32,
}

/// Sink contract for consuming rendered frames in script order.
///
/// `push_frame` is called with indices `0, 1, 2, ...` without gaps.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> DiffreelResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DiffreelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> DiffreelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> DiffreelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DiffreelResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> DiffreelResult<()> {
        Ok(())
    }
}

/// Writes each frame as a zero-padded PNG into one directory.
///
/// `begin` empties the directory so a re-render never mixes in stale frames.
#[derive(Debug)]
pub struct FrameDirSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    next: FrameIndex,
    scratch: Vec<u8>,
}

impl FrameDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            next: FrameIndex(0),
            scratch: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of frames written since `begin`.
    pub fn written(&self) -> u64 {
        self.next.0
    }
}

impl FrameSink for FrameDirSink {
    fn begin(&mut self, cfg: SinkConfig) -> DiffreelResult<()> {
        clear_dir(&self.dir)?;
        self.cfg = Some(cfg);
        self.next = FrameIndex(0);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DiffreelResult<()> {
        let Some(cfg) = self.cfg else {
            return Err(DiffreelError::encode("frame pushed before begin"));
        };
        if idx != self.next {
            return Err(DiffreelError::validation(format!(
                "frame index {} out of order (expected {})",
                idx.0, self.next.0
            )));
        }
        if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
            return Err(DiffreelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }

        let path = self.dir.join(idx.file_name());
        write_png(&path, frame, &mut self.scratch)?;

        self.next = idx.next();
        Ok(())
    }

    fn end(&mut self) -> DiffreelResult<()> {
        tracing::debug!(dir = %self.dir.display(), frames = self.next.0, "frame directory complete");
        Ok(())
    }
}

/// Save one frame as an opaque PNG; `scratch` is reused for flattening translucent frames.
pub fn write_png(path: &Path, frame: &FrameRGBA, scratch: &mut Vec<u8>) -> DiffreelResult<()> {
    let data: &[u8] = if frame.is_opaque() {
        &frame.data
    } else {
        scratch.resize(frame.data.len(), 0);
        flatten_to_opaque_rgba8(scratch, &frame.data, frame.premultiplied, [0, 0, 0, 255])?;
        scratch
    };

    image::save_buffer_with_format(
        path,
        data,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| DiffreelError::encode(format!("write frame '{}': {e}", path.display())))
}

fn clear_dir(dir: &Path) -> DiffreelResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create frame directory '{}'", dir.display()))?;
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read frame directory '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read frame directory '{}'", dir.display()))?;
        let path = entry.path();
        let removed = if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        removed.with_context(|| format!("remove stale entry '{}'", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
