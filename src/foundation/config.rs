use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::{
    core::Rgba8,
    error::{DiffreelError, DiffreelResult},
};

/// Process-wide settings, built once at startup and passed by reference.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum columns per classified line.
    pub wrap_width: usize,
    /// Commits whose message is not longer than this are skipped.
    pub min_message_len: usize,
    /// Output video frame rate.
    pub fps: u32,
    /// Font size in pixels.
    pub font_size: f32,
    /// Fixed-width font used for every piece of text.
    pub font_path: PathBuf,
    /// Background image every frame is drawn over.
    pub canvas_path: PathBuf,
    /// Root of the per-commit frame directories.
    pub frames_root: PathBuf,
    /// Final concatenated video.
    pub output: PathBuf,
    /// Bare-canvas frames written before each commit's script.
    pub lead_in_frames: u32,
    /// Commits rendered concurrently.
    pub jobs: usize,
    pub sequence: SequenceConfig,
    pub layout: LayoutConfig,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrap_width: 125,
            min_message_len: 20,
            fps: 24,
            font_size: 16.0,
            font_path: PathBuf::from("/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf"),
            canvas_path: PathBuf::from("assets/background-full.png"),
            frames_root: PathBuf::from("imgs"),
            output: PathBuf::from("output.mp4"),
            lead_in_frames: 1,
            jobs: 1,
            sequence: SequenceConfig::default(),
            layout: LayoutConfig::default(),
            palette: Palette::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> DiffreelResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| DiffreelError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> DiffreelResult<()> {
        if self.wrap_width < 4 {
            return Err(DiffreelError::validation("wrap_width must be >= 4"));
        }
        if self.fps == 0 {
            return Err(DiffreelError::validation("fps must be non-zero"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(DiffreelError::validation(
                "font_size must be finite and > 0",
            ));
        }
        if self.jobs == 0 {
            return Err(DiffreelError::validation("jobs must be >= 1"));
        }
        if self.layout.line_height == 0 {
            return Err(DiffreelError::validation("layout.line_height must be > 0"));
        }
        Ok(())
    }

    /// Frame directory for one commit.
    pub fn commit_frames_dir(&self, commit_id: &str) -> PathBuf {
        self.frames_root.join(commit_id)
    }
}

/// Frame counts for the fixed-length phases of a file-change animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequenceConfig {
    pub intro_frames: u32,
    pub outro_frames: u32,
    /// Frames per burst of the three-step removal collapse.
    pub removal_burst: u32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            intro_frames: 32,
            outro_frames: 32,
            removal_burst: 4,
        }
    }
}

/// Pixel positions of the frame regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub margin_x: u32,
    pub header_y: u32,
    /// Gap between the active filename and the header list.
    pub header_gap: u32,
    /// Row 0 of the code body.
    pub body_y: u32,
    pub line_height: u32,
    pub footer_y: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_x: 30,
            header_y: 16,
            header_gap: 10,
            body_y: 64,
            line_height: 16,
            footer_y: 700,
        }
    }
}

/// Foreground/background pair for the active filename tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderStyle {
    pub fg: Rgba8,
    pub bg: Rgba8,
}

/// Colors, all straight RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub context: Rgba8,
    pub added: Rgba8,
    pub removed: Rgba8,
    pub header_created: HeaderStyle,
    pub header_deleted: HeaderStyle,
    pub header_modified: HeaderStyle,
    pub header_list: Rgba8,
    pub footer: Rgba8,
    /// Canvas pixels are flattened onto this color.
    pub background: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        const GRAY: Rgba8 = [128, 128, 128, 255];
        Self {
            context: [255, 255, 255, 255],
            added: [0, 128, 0, 255],
            removed: [255, 0, 0, 255],
            header_created: HeaderStyle {
                fg: [144, 238, 144, 255],
                bg: [0, 100, 0, 255],
            },
            header_deleted: HeaderStyle {
                fg: [255, 128, 128, 255],
                bg: [139, 0, 0, 255],
            },
            header_modified: HeaderStyle {
                fg: [173, 216, 230, 255],
                bg: [0, 0, 139, 255],
            },
            header_list: GRAY,
            footer: GRAY,
            background: [0, 0, 0, 255],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
