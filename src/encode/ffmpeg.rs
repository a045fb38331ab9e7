use std::{
    io::Write as _,
    path::PathBuf,
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::foundation::error::{DiffreelError, DiffreelResult};

/// Output settings for one MP4; the file is always replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
}

impl EncodeConfig {
    pub fn new(out_path: impl Into<PathBuf>, width: u32, height: u32, fps: u32) -> DiffreelResult<Self> {
        if width == 0 || height == 0 {
            return Err(DiffreelError::validation("encode width/height must be non-zero"));
        }
        if fps == 0 {
            return Err(DiffreelError::validation("encode fps must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            // yuv420p
            return Err(DiffreelError::validation(format!(
                "encode width/height must be even, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            fps,
            out_path: out_path.into(),
        })
    }

    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba",
        ]
        .map(String::from)
        .to_vec();
        args.extend([
            "-s".to_string(),
            format!("{}x{}", self.width, self.height),
            "-framerate".to_string(),
            self.fps.to_string(),
        ]);
        args.extend(
            [
                "-i", "pipe:0", "-an", "-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags",
                "+faststart",
            ]
            .map(String::from),
        );
        args.push(self.out_path.to_string_lossy().into_owned());
        args
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Streams opaque RGBA8 frames into the system `ffmpeg` (H.264 in MP4).
pub struct FfmpegEncoder {
    frame_len: usize,
    frames: u64,
    child: Child,
    stdin: ChildStdin,
}

impl FfmpegEncoder {
    pub fn spawn(cfg: &EncodeConfig) -> DiffreelResult<Self> {
        if let Some(parent) = cfg.out_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
        }
        if !is_ffmpeg_on_path() {
            return Err(DiffreelError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(cfg.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DiffreelError::encode(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DiffreelError::encode("ffmpeg stdin was not captured"))?;

        Ok(Self {
            frame_len: cfg.frame_len(),
            frames: 0,
            child,
            stdin,
        })
    }

    /// Write one frame of `width * height * 4` bytes.
    pub fn push(&mut self, rgba: &[u8]) -> DiffreelResult<()> {
        if rgba.len() != self.frame_len {
            return Err(DiffreelError::validation(format!(
                "frame has {} bytes, encoder expects {}",
                rgba.len(),
                self.frame_len
            )));
        }
        self.stdin.write_all(rgba).map_err(|e| {
            DiffreelError::encode(format!("write frame {} to ffmpeg: {e}", self.frames))
        })?;
        self.frames += 1;
        Ok(())
    }

    /// Close the stream and wait for ffmpeg. Returns the number of frames written.
    pub fn finish(self) -> DiffreelResult<u64> {
        let Self {
            frames,
            child,
            stdin,
            ..
        } = self;
        drop(stdin);

        let output = child
            .wait_with_output()
            .map_err(|e| DiffreelError::encode(format!("wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            return Err(DiffreelError::encode(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
