use crate::foundation::error::{DiffreelError, DiffreelResult};

/// Image extension used for stored frames.
pub const FRAME_EXTENSION: &str = "png";

/// Zero-based position of a frame within one commit's frame set.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// The index that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// File name used for this frame inside a commit frame directory (`000000042.png`).
    pub fn file_name(self) -> String {
        format!("{:09}.{FRAME_EXTENSION}", self.0)
    }

    /// Parse a frame file name produced by [`FrameIndex::file_name`].
    pub fn parse_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(FRAME_EXTENSION)?.strip_suffix('.')?;
        if stem.len() != 9 || !stem.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        stem.parse().ok().map(Self)
    }
}

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> DiffreelResult<Self> {
        if width == 0 || height == 0 {
            return Err(DiffreelError::validation("canvas width/height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(DiffreelError::validation("canvas width/height exceeds u16"));
        }
        Ok(Self { width, height })
    }

    pub fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Straight (non-premultiplied) RGBA8 color as stored in configuration.
pub type Rgba8 = [u8; 4];

/// Composite RGBA8 pixels in `src` over the opaque color `bg`, writing opaque pixels to `dst`.
///
/// `src_is_premul` selects premultiplied (rendered frames) or straight (decoded images) input.
pub fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg: Rgba8,
) -> DiffreelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DiffreelError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                scale(u16::from(s[c]), a)
            };
            d[c] = (fg + scale(u16::from(bg[c]), inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn scale(c: u16, a: u16) -> u16 {
    (c * a + 127) / 255
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
