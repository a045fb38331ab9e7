use crate::{
    diff::change::FileChangeKind,
    foundation::{
        config::{Config, HeaderStyle, LayoutConfig, Palette},
        core::{Canvas, Rgba8},
        error::{DiffreelError, DiffreelResult},
    },
    render::{
        assets::RenderAssets,
        backend::{FrameRGBA, RenderBackend},
        text::{TextLayout, TextLayoutEngine},
    },
    scene::state::{SceneState, SlotState},
};

/// Separator between names in the header list.
const HEADER_LIST_SEPARATOR: &str = "   ";

/// CPU frame renderer: canvas, header strip, code body and footer.
pub struct CpuBackend {
    assets: RenderAssets,
    layout: LayoutConfig,
    palette: Palette,
    text: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
    width: u16,
    height: u16,
    /// Text layer; vello_cpu overwrites it on every render.
    layer: vello_cpu::Pixmap,
}

impl CpuBackend {
    pub fn new(assets: RenderAssets, cfg: &Config) -> DiffreelResult<Self> {
        let width: u16 = assets
            .canvas
            .width
            .try_into()
            .map_err(|_| DiffreelError::validation("canvas width exceeds u16"))?;
        let height: u16 = assets
            .canvas
            .height
            .try_into()
            .map_err(|_| DiffreelError::validation("canvas height exceeds u16"))?;
        if assets.canvas_rgba8.len() != assets.canvas.byte_len() {
            return Err(DiffreelError::asset("canvas byte length mismatch"));
        }

        let text = TextLayoutEngine::new(&assets.font_bytes, cfg.font_size)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(assets.font_bytes.as_ref().clone()),
            0,
        );
        tracing::debug!(family = text.family_name(), width, height, "cpu backend ready");

        Ok(Self {
            assets,
            layout: cfg.layout,
            palette: cfg.palette,
            text,
            font,
            width,
            height,
            layer: vello_cpu::Pixmap::new(width, height),
        })
    }

    fn canvas_frame(&self, data: Vec<u8>) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data,
            premultiplied: true,
        }
    }

    fn draw_header(&mut self, ctx: &mut vello_cpu::RenderContext, scene: &SceneState) {
        let x = f64::from(self.layout.margin_x);
        let y = f64::from(self.layout.header_y);
        let style = header_style(&self.palette, scene.file_kind);

        let mut list_x = x;
        if !scene.filename.is_empty() {
            let name = self.text.layout(&scene.filename, style.fg);
            let (w, h) = (f64::from(name.width()), f64::from(name.height()));
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(paint(style.bg));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x, y, x + w, y + h));
            draw_text(ctx, &self.font, &name, x, y);
            list_x = x + w + f64::from(self.layout.header_gap);
        }

        if !scene.header_list.is_empty() {
            let joined = scene.header_list.join(HEADER_LIST_SEPARATOR);
            let list = self.text.layout(&joined, self.palette.header_list);
            draw_text(ctx, &self.font, &list, list_x, y);
        }
    }

    fn draw_body(&mut self, ctx: &mut vello_cpu::RenderContext, scene: &SceneState) {
        let x = f64::from(self.layout.margin_x);
        for (index, slot) in scene.visible_slots() {
            let Some(row) = scene.row_of(index, self.layout.body_y, self.layout.line_height)
            else {
                continue;
            };
            let (text, color) = match slot {
                SlotState::Empty => continue,
                SlotState::Existing(t) => (t, self.palette.context),
                SlotState::New(t) => (t, self.palette.added),
                SlotState::Removed(t) => (t, self.palette.removed),
            };
            let layout = self.text.layout(text, color);
            draw_text(ctx, &self.font, &layout, x, f64::from(row));
        }
    }

    fn draw_footer(&mut self, ctx: &mut vello_cpu::RenderContext, scene: &SceneState) {
        if scene.footer.is_empty() {
            return;
        }
        let footer = self.text.layout(&scene.footer, self.palette.footer);
        draw_text(
            ctx,
            &self.font,
            &footer,
            f64::from(self.layout.margin_x),
            f64::from(self.layout.footer_y),
        );
    }
}

impl RenderBackend for CpuBackend {
    fn canvas(&self) -> Canvas {
        self.assets.canvas
    }

    fn render_blank(&mut self) -> DiffreelResult<FrameRGBA> {
        Ok(self.canvas_frame(self.assets.canvas_rgba8.to_vec()))
    }

    fn render_scene(&mut self, scene: &SceneState) -> DiffreelResult<FrameRGBA> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.draw_header(&mut ctx, scene);
        self.draw_body(&mut ctx, scene);
        self.draw_footer(&mut ctx, scene);
        ctx.flush();
        self.layer.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut self.layer);

        let mut data = self.assets.canvas_rgba8.to_vec();
        premul_over_in_place(&mut data, self.layer.data_as_u8_slice())?;
        Ok(self.canvas_frame(data))
    }
}

/// Fg/bg pair for the active filename.
pub fn header_style(palette: &Palette, kind: FileChangeKind) -> HeaderStyle {
    match kind {
        FileChangeKind::Created => palette.header_created,
        FileChangeKind::Deleted => palette.header_deleted,
        FileChangeKind::Modified => palette.header_modified,
    }
}

fn paint([r, g, b, a]: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &TextLayout,
    x: f64,
    y: f64,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Source-over of premultiplied `src` onto premultiplied `dst`.
fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> DiffreelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DiffreelError::validation(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3];
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - u16::from(sa);
        for c in 0..4 {
            let dc = ((u16::from(d[c]) * inv + 127) / 255) as u8;
            d[c] = s[c].saturating_add(dc);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
