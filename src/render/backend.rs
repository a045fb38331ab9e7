use crate::{
    foundation::{core::Canvas, error::DiffreelResult},
    scene::state::SceneState,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }
}

/// Turns one scene state into pixels.
pub trait RenderBackend {
    fn canvas(&self) -> Canvas;

    /// The background alone, used for lead-in frames.
    fn render_blank(&mut self) -> DiffreelResult<FrameRGBA>;

    fn render_scene(&mut self, scene: &SceneState) -> DiffreelResult<FrameRGBA>;
}
