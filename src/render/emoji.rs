use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use kurbo::Size;

use crate::foundation::core::Canvas;
use crate::foundation::error::{CaptyteError, CaptyteResult};
use crate::render::composite::premultiply_rgba8_in_place;

/// Decoded, scaled and premultiplied emoji overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmojiImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl EmojiImage {
    /// Load an image file and scale it by `scale`.
    ///
    /// Only local files are supported. The scaled image must fit inside `bounds`.
    #[tracing::instrument(level = "debug")]
    pub fn load(path: &Path, scale: f64, bounds: Canvas) -> CaptyteResult<Self> {
        let s = path.to_string_lossy();
        if s.starts_with("http://") || s.starts_with("https://") {
            return Err(CaptyteError::validation(format!(
                "emoji_path must be a local file, got url '{s}'"
            )));
        }
        let bytes = std::fs::read(path)
            .with_context(|| format!("read emoji '{}'", path.display()))?;
        Self::decode(&bytes, scale, bounds)
    }

    /// Decode encoded image bytes (PNG, JPEG, ...) and scale them by `scale`.
    ///
    /// A scaled size larger than `bounds` is rejected before any resampling.
    pub fn decode(bytes: &[u8], scale: f64, bounds: Canvas) -> CaptyteResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CaptyteError::validation(format!(
                "emoji_scale must be finite and > 0, got {scale}"
            )));
        }
        let dyn_img = image::load_from_memory(bytes).context("decode emoji image")?;
        let mut rgba = dyn_img.to_rgba8();
        let (w, h) = rgba.dimensions();
        let (sw, sh) = (scaled_dim(w, scale), scaled_dim(h, scale));
        if sw > f64::from(bounds.width) || sh > f64::from(bounds.height) {
            return Err(CaptyteError::validation(format!(
                "emoji scaled to {sw}x{sh} does not fit the {}x{} frame",
                bounds.width, bounds.height
            )));
        }
        let (sw, sh) = (sw as u32, sh as u32);
        if (sw, sh) != (w, h) {
            rgba = image::imageops::resize(&rgba, sw, sh, image::imageops::FilterType::Triangle);
        }

        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        tracing::debug!(width = sw, height = sh, "emoji decoded");
        Ok(Self {
            width: sw,
            height: sh,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

fn scaled_dim(dim: u32, scale: f64) -> f64 {
    (f64::from(dim) * scale).round().max(1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/emoji.rs"]
mod tests;
