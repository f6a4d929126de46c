use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::{CaptyteError, CaptyteResult};
use crate::layout::measure::TextMeasure;
use crate::render::emoji::EmojiImage;
use crate::style::color::Rgba8;

/// A video frame as RGBA8 pixels.
///
/// Decoded video frames are opaque, so straight and premultiplied bytes coincide. Frames
/// produced by painting are premultiplied; the flag keeps that explicit at sink boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Wrap raw bytes, checking the buffer length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>, premultiplied: bool) -> CaptyteResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if data.len() != canvas.rgba8_len() {
            return Err(CaptyteError::validation(format!(
                "frame data length {} does not match {width}x{height} rgba8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied,
        })
    }

    /// Fully transparent frame.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.rgba8_len()],
            premultiplied: true,
        }
    }

    /// Opaque frame filled with one color.
    pub fn solid(canvas: Canvas, color: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(canvas.rgba8_len());
        for _ in 0..(canvas.width as usize * canvas.height as usize) {
            data.extend_from_slice(&[color[0], color[1], color[2], 255]);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA of pixel `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Which of the two text passes is being drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextPass {
    /// Outline of the glyphs with the given line width in pixels.
    Stroke { width: f64 },
    /// Glyph bodies, thickened by an outline of `width` pixels in the same color when
    /// `width > 0`.
    Fill { width: f64 },
}

/// One word draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct TextDraw<'a> {
    pub text: &'a str,
    /// Baseline origin in frame pixels.
    pub origin: Point,
    /// Style scale; pixel size is derived with [`crate::font_px`].
    pub font_size: f64,
    pub color: Rgba8,
    pub pass: TextPass,
}

/// Caption painting target.
///
/// A frame is painted as `begin`, any number of draw calls in paint order, then `finish`,
/// which composites everything drawn onto the frame. Painters also measure text so layout
/// and paint agree on advances.
pub trait Painter: TextMeasure {
    fn begin(&mut self, canvas: Canvas) -> CaptyteResult<()>;

    /// Fill `rect` with `color` at `opacity`.
    fn fill_rect(&mut self, rect: Rect, color: Rgba8, opacity: f64) -> CaptyteResult<()>;

    fn draw_text(&mut self, draw: &TextDraw<'_>) -> CaptyteResult<()>;

    /// Draw `image` at its native size into `dest`.
    fn draw_image(&mut self, image: &EmojiImage, dest: Rect, opacity: f64) -> CaptyteResult<()>;

    fn finish(&mut self, frame: &mut FrameRGBA) -> CaptyteResult<()>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
