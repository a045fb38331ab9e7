use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::foundation::{
    config::Config,
    core::{Canvas, Rgba8, flatten_to_opaque_rgba8},
    error::{DiffreelError, DiffreelResult},
};

/// Static inputs every frame needs: the font and the flattened background canvas.
#[derive(Clone, Debug)]
pub struct RenderAssets {
    pub font_bytes: Arc<Vec<u8>>,
    pub canvas: Canvas,
    /// Opaque RGBA8, `canvas.width * canvas.height * 4` bytes.
    pub canvas_rgba8: Arc<Vec<u8>>,
}

impl RenderAssets {
    /// Read the configured font and canvas. Either one missing is fatal.
    pub fn load(cfg: &Config) -> DiffreelResult<Self> {
        let font_bytes = read_asset(&cfg.font_path, "font")?;
        let canvas_bytes = read_asset(&cfg.canvas_path, "canvas")?;
        Self::from_bytes(font_bytes, &canvas_bytes, cfg.palette.background)
    }

    /// Build from in-memory bytes; the canvas may be any format `image` can decode.
    pub fn from_bytes(
        font_bytes: Vec<u8>,
        canvas_bytes: &[u8],
        background: Rgba8,
    ) -> DiffreelResult<Self> {
        if font_bytes.is_empty() {
            return Err(DiffreelError::asset("font file is empty"));
        }
        let img = image::load_from_memory(canvas_bytes)
            .map_err(|e| DiffreelError::asset(format!("decode canvas image: {e}")))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        let canvas = Canvas::new(width, height)?;

        let straight = img.into_raw();
        let mut opaque = vec![0u8; straight.len()];
        flatten_to_opaque_rgba8(&mut opaque, &straight, false, background)?;

        Ok(Self {
            font_bytes: Arc::new(font_bytes),
            canvas,
            canvas_rgba8: Arc::new(opaque),
        })
    }
}

fn read_asset(path: &Path, what: &str) -> DiffreelResult<Vec<u8>> {
    if !path.is_file() {
        return Err(DiffreelError::asset(format!(
            "{what} '{}' does not exist",
            path.display()
        )));
    }
    std::fs::read(path)
        .with_context(|| format!("read {what} from '{}'", path.display()))
        .map_err(DiffreelError::from)
}

#[cfg(test)]
#[path = "../../tests/unit/render/assets.rs"]
mod tests;
