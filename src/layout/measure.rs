use crate::foundation::error::{CaptyteError, CaptyteResult};

/// Pixels per style `font_size` unit.
pub const FONT_PX_PER_UNIT: f64 = 32.0;

/// Pixel size used to shape text at style scale `font_size`.
pub fn font_px(font_size: f64) -> f64 {
    font_size * FONT_PX_PER_UNIT
}

/// Measured size of a shaped string.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct TextExtent {
    /// Full advance, trailing whitespace included.
    pub width: f64,
    /// Line height.
    pub height: f64,
}

/// Text measurement used by layout.
///
/// Implementations must be deterministic: the same text at the same scale always measures
/// the same.
pub trait TextMeasure {
    fn text_extent(&mut self, text: &str, font_size: f64) -> CaptyteResult<TextExtent>;
}

/// Font-free approximation where every character advances by `advance_em` of the pixel size.
///
/// Used when no font is available (layout previews) and in tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    pub advance_em: f64,
    pub line_height_em: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            advance_em: 0.6,
            line_height_em: 1.2,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_extent(&mut self, text: &str, font_size: f64) -> CaptyteResult<TextExtent> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(CaptyteError::layout(format!(
                "font_size must be finite and > 0, got {font_size}"
            )));
        }
        let px = font_px(font_size);
        Ok(TextExtent {
            width: text.chars().count() as f64 * self.advance_em * px,
            height: self.line_height_em * px,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/measure.rs"]
mod tests;
