use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{CaptyteError, CaptyteResult};
use crate::layout::measure::{TextExtent, TextMeasure, font_px};
use crate::render::backend::{FrameRGBA, Painter, TextDraw, TextPass};
use crate::render::composite::over_in_place;
use crate::render::emoji::EmojiImage;
use crate::style::color::Rgba8;

/// Glyphs of one shaped string, positioned relative to the first line's baseline.
struct ShapedText {
    glyphs: Vec<vello_cpu::Glyph>,
    font_size: f32,
}

/// Painter backed by `parley` shaping and `vello_cpu` rasterization.
///
/// Draw calls go to a transparent overlay that `finish` composites onto the frame.
pub struct CpuPainter {
    font: vello_cpu::peniko::FontData,
    family_name: String,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    extents: HashMap<(String, u64), TextExtent>,
    image_cache: HashMap<usize, vello_cpu::Image>,
    ctx: Option<vello_cpu::RenderContext>,
    canvas: Option<Canvas>,
}

impl std::fmt::Debug for CpuPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuPainter")
            .field("family_name", &self.family_name)
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl CpuPainter {
    /// Load a TrueType/OpenType font file.
    pub fn from_font_path(path: &Path) -> CaptyteResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_font_bytes(bytes)
    }

    pub fn from_font_bytes(font_bytes: Vec<u8>) -> CaptyteResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CaptyteError::paint("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CaptyteError::paint("registered font family has no name"))?
            .to_string();
        tracing::debug!(family = %family_name, "font registered");

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font,
            family_name,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            extents: HashMap::new(),
            image_cache: HashMap::new(),
            ctx: None,
            canvas: None,
        })
    }

    /// Family name resolved from the font data.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn build_layout(&mut self, text: &str, size_px: f32) -> CaptyteResult<parley::Layout<()>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CaptyteError::layout(format!(
                "font pixel size must be finite and > 0, got {size_px}"
            )));
        }
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    fn shape(&mut self, text: &str, font_size: f64) -> CaptyteResult<ShapedText> {
        let size_px = font_px(font_size) as f32;
        let layout = self.build_layout(text, size_px)?;
        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(0.0);

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y - baseline,
                }));
            }
        }
        Ok(ShapedText {
            glyphs,
            font_size: size_px,
        })
    }

    fn image_paint_for(&mut self, image: &EmojiImage) -> CaptyteResult<vello_cpu::Image> {
        let key = Arc::as_ptr(&image.rgba8_premul) as usize;
        if let Some(p) = self.image_cache.get(&key) {
            return Ok(p.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(key, paint.clone());
        Ok(paint)
    }

    fn ctx_mut(&mut self) -> CaptyteResult<&mut vello_cpu::RenderContext> {
        self.ctx
            .as_mut()
            .ok_or_else(|| CaptyteError::paint("painter used before begin()"))
    }
}

impl TextMeasure for CpuPainter {
    fn text_extent(&mut self, text: &str, font_size: f64) -> CaptyteResult<TextExtent> {
        let key = (text.to_string(), font_size.to_bits());
        if let Some(extent) = self.extents.get(&key) {
            return Ok(*extent);
        }
        let layout = self.build_layout(text, font_px(font_size) as f32)?;
        let extent = TextExtent {
            width: f64::from(layout.full_width()),
            height: f64::from(layout.height()),
        };
        self.extents.insert(key, extent);
        Ok(extent)
    }
}

impl Painter for CpuPainter {
    fn begin(&mut self, canvas: Canvas) -> CaptyteResult<()> {
        let (w, h) = canvas_to_u16(canvas)?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        self.ctx = Some(ctx);
        self.canvas = Some(canvas);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8, opacity: f64) -> CaptyteResult<()> {
        let ctx = self.ctx_mut()?;
        let opacity = opacity.clamp(0.0, 1.0) as f32;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn draw_text(&mut self, draw: &TextDraw<'_>) -> CaptyteResult<()> {
        let shaped = self.shape(draw.text, draw.font_size)?;
        let font = self.font.clone();
        let ctx = self.ctx_mut()?;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            draw.origin.x,
            draw.origin.y,
        )));
        let c = draw.color;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        let width = match draw.pass {
            TextPass::Stroke { width } => width,
            TextPass::Fill { width } => {
                ctx.glyph_run(&font)
                    .font_size(shaped.font_size)
                    .fill_glyphs(shaped.glyphs.iter().cloned());
                width
            }
        };
        if width > 0.0 {
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
            ctx.glyph_run(&font)
                .font_size(shaped.font_size)
                .stroke_glyphs(shaped.glyphs.into_iter());
        }
        Ok(())
    }

    fn draw_image(&mut self, image: &EmojiImage, dest: Rect, opacity: f64) -> CaptyteResult<()> {
        let paint = self.image_paint_for(image)?;
        let ctx = self.ctx_mut()?;
        let opacity = opacity.clamp(0.0, 1.0) as f32;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0)));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn finish(&mut self, frame: &mut FrameRGBA) -> CaptyteResult<()> {
        let canvas = self
            .canvas
            .take()
            .ok_or_else(|| CaptyteError::paint("finish() without begin()"))?;
        if canvas != frame.canvas() {
            return Err(CaptyteError::paint(format!(
                "frame is {}x{} but painting began at {}x{}",
                frame.width, frame.height, canvas.width, canvas.height
            )));
        }
        let (w, h) = canvas_to_u16(canvas)?;
        let ctx = self.ctx_mut()?;
        ctx.flush();
        let mut overlay = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut overlay);
        over_in_place(&mut frame.data, overlay.data_as_u8_slice(), 1.0)
    }
}

fn canvas_to_u16(canvas: Canvas) -> CaptyteResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| CaptyteError::paint("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| CaptyteError::paint("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CaptyteResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_to_u16(Canvas::new(width, height)?)?;
    if bytes.len() != (width as usize) * (height as usize) * 4 {
        return Err(CaptyteError::paint("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
