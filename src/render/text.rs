use std::{collections::HashMap, sync::Arc};

use crate::foundation::{
    core::Rgba8,
    error::{DiffreelError, DiffreelResult},
};

/// Layouts kept before the cache is dropped wholesale.
const LAYOUT_CACHE_LIMIT: usize = 4096;

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from([r, g, b, a]: Rgba8) -> Self {
        Self { r, g, b, a }
    }
}

pub type TextLayout = parley::Layout<TextBrushRgba8>;

/// Single-font Parley layout helper with a per-(text, color) cache.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    size_px: f32,
    cache: HashMap<(String, Rgba8), Arc<TextLayout>>,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and fix the font size for every layout.
    pub fn new(font_bytes: &[u8], size_px: f32) -> DiffreelResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(DiffreelError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| DiffreelError::asset("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| DiffreelError::asset("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            size_px,
            cache: HashMap::new(),
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shaped single-paragraph layout of `text` in `color`.
    pub fn layout(&mut self, text: &str, color: Rgba8) -> Arc<TextLayout> {
        let key = (text.to_string(), color);
        if let Some(hit) = self.cache.get(&key) {
            return Arc::clone(hit);
        }
        if self.cache.len() >= LAYOUT_CACHE_LIMIT {
            self.cache.clear();
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: TextLayout = builder.build(text);
        layout.break_all_lines(None);

        let layout = Arc::new(layout);
        self.cache.insert(key, Arc::clone(&layout));
        layout
    }
}
