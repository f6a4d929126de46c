use crate::foundation::core::{Canvas, FrameIndex, Fps};
use crate::foundation::error::CaptyteResult;
use crate::layout::measure::TextMeasure;
use crate::layout::plan::{LayoutEnv, LayoutPlan, layout};
use crate::render::backend::{FrameRGBA, Painter, TextDraw, TextPass};
use crate::render::emoji::EmojiImage;
use crate::style::color::Rgba8;
use crate::style::config::StyleConfig;
use crate::timeline::highlight::HighlightState;
use crate::timeline::select::Timeline;
use crate::transcript::segment::DisplayUnit;

/// Extra stroke width added around the fill thickness.
pub const STROKE_EXTRA: f64 = 2.0;

/// Burns captions into frames in playback order.
///
/// Owns the only mutable caption state, the highlight history of the active unit, so
/// frames must be fed sequentially.
#[derive(Debug)]
pub struct Compositor {
    style: StyleConfig,
    timeline: Timeline,
    fps: Fps,
    emoji: Option<EmojiImage>,
    highlight: HighlightState,
}

impl Compositor {
    pub fn new(units: Vec<DisplayUnit>, style: StyleConfig, fps: Fps) -> Self {
        Self {
            style,
            timeline: Timeline::new(units),
            fps,
            emoji: None,
            highlight: HighlightState::new(),
        }
    }

    /// Build a compositor and load the emoji named by the style, if any.
    ///
    /// An emoji that cannot be loaded, or that would not fit `canvas` once scaled, is dropped
    /// with a warning; captions still render.
    pub fn from_style(
        units: Vec<DisplayUnit>,
        style: StyleConfig,
        fps: Fps,
        canvas: Canvas,
    ) -> Self {
        let emoji = style.emoji_path.as_deref().and_then(|path| {
            match EmojiImage::load(path, style.emoji_scale, canvas) {
                Ok(img) => Some(img),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "emoji disabled");
                    None
                }
            }
        });
        Self::new(units, style, fps).with_emoji(emoji)
    }

    pub fn with_emoji(mut self, emoji: Option<EmojiImage>) -> Self {
        self.emoji = emoji;
        self
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Select the active unit at `t` and lay it out.
    ///
    /// Returns `None` when no unit is active. Switching units clears the highlight history.
    pub fn plan_at(
        &mut self,
        t: f64,
        canvas: Canvas,
        measure: &mut dyn TextMeasure,
    ) -> CaptyteResult<Option<LayoutPlan>> {
        let Some(idx) = self.timeline.active_unit(t) else {
            return Ok(None);
        };
        if self.highlight.enter_unit(idx) {
            tracing::debug!(unit = idx, t, "active unit changed");
        }
        let Some(unit) = self.timeline.unit(idx) else {
            return Ok(None);
        };
        let mut env = LayoutEnv {
            canvas,
            measure,
            emoji_size: self.emoji.as_ref().map(EmojiImage::size),
        };
        layout(unit, &self.style, &mut self.highlight, t, &mut env).map(Some)
    }

    /// Paint the caption for frame `index` onto `frame`.
    ///
    /// Frames without an active unit are left untouched. Returns whether anything was painted.
    pub fn compose_frame(
        &mut self,
        index: FrameIndex,
        frame: &mut FrameRGBA,
        painter: &mut dyn Painter,
    ) -> CaptyteResult<bool> {
        let t = self.fps.frames_to_secs(index.0);
        let canvas = frame.canvas();
        let Some(plan) = self.plan_at(t, canvas, &mut *painter)? else {
            return Ok(false);
        };
        if plan.is_empty() {
            return Ok(false);
        }
        tracing::debug!(frame = index.0, t, text = %plan.text, active_word = ?plan.active_word, "compose");

        painter.begin(canvas)?;
        self.paint_plan(&plan, painter)?;
        painter.finish(frame)?;
        Ok(true)
    }

    fn paint_plan(&self, plan: &LayoutPlan, painter: &mut dyn Painter) -> CaptyteResult<()> {
        if let Some(fill) = &plan.box_fill {
            painter.fill_rect(fill.rect, Rgba8::parse_hex(&fill.color)?, fill.opacity)?;
        }

        let style = &plan.text_style;
        let stroke = Rgba8::parse_hex(&style.stroke_color)?;
        let base = Rgba8::parse_hex(&style.text_color)?;
        let highlight = Rgba8::parse_hex(&style.highlight_color)?;
        for word in plan.words() {
            painter.draw_text(&TextDraw {
                text: &word.text,
                origin: word.origin,
                font_size: style.font_size,
                color: stroke,
                pass: TextPass::Stroke {
                    width: style.stroke_thickness + STROKE_EXTRA,
                },
            })?;
            painter.draw_text(&TextDraw {
                text: &word.text,
                origin: word.origin,
                font_size: style.font_size,
                color: if word.highlighted { highlight } else { base },
                pass: TextPass::Fill {
                    width: style.stroke_thickness,
                },
            })?;
        }

        if let (Some(placement), Some(image)) = (&plan.emoji, &self.emoji) {
            painter.draw_image(image, placement.rect, placement.opacity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
