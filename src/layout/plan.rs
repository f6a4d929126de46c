use std::ops::Range;

use kurbo::Size;

use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::CaptyteResult;
use crate::layout::measure::TextMeasure;
use crate::style::config::{EmojiPosition, StyleConfig, TextAlignment};
use crate::timeline::highlight::HighlightState;
use crate::timeline::select::active_word;
use crate::transcript::segment::DisplayUnit;

/// Base line advance in pixels, scaled by `line_spacing`.
pub const LINE_HEIGHT: f64 = 35.0;

/// Minimum horizontal margin kept between the caption box and the frame edges (both sides).
pub const FRAME_MARGIN: f64 = 100.0;

/// Text paint parameters shared by every word of a plan.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextStyle {
    pub font_size: f64,
    pub stroke_thickness: f64,
    pub text_color: String,
    pub highlight_color: String,
    pub stroke_color: String,
}

impl TextStyle {
    fn from_style(style: &StyleConfig) -> Self {
        Self {
            font_size: style.font_size,
            stroke_thickness: style.stroke_thickness,
            text_color: style.text_color.clone(),
            highlight_color: style.highlight_color.clone(),
            stroke_color: style.stroke_color.clone(),
        }
    }
}

/// One positioned word.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WordPlan {
    /// Index of the word inside its display unit.
    pub index: usize,
    /// Case-transformed display text.
    pub text: String,
    /// Baseline origin.
    pub origin: Point,
    /// Horizontal advance to the next word (trailing space and letter spacing included).
    pub advance: f64,
    pub highlighted: bool,
}

/// One visual line of the caption.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LinePlan {
    pub baseline_y: f64,
    /// Sum of word advances minus one trailing letter spacing.
    pub width: f64,
    pub words: Vec<WordPlan>,
}

/// Background box.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BoxFill {
    pub rect: Rect,
    pub color: String,
    pub opacity: f64,
}

/// Emoji destination in frame pixels, already clamped into the frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EmojiPlacement {
    pub rect: Rect,
    pub opacity: f64,
}

/// Everything the compositor needs to paint one frame's caption.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutPlan {
    /// Case-transformed unit text.
    pub text: String,
    pub active_word: Option<usize>,
    /// Caption area (`box_x`, `box_y`, width, text height plus vertical padding), computed
    /// even when no box is painted.
    pub caption_area: Rect,
    pub box_fill: Option<BoxFill>,
    pub lines: Vec<LinePlan>,
    pub emoji: Option<EmojiPlacement>,
    pub text_style: TextStyle,
}

impl LayoutPlan {
    fn empty(style: &StyleConfig) -> Self {
        Self {
            text: String::new(),
            active_word: None,
            caption_area: Rect::ZERO,
            box_fill: None,
            lines: Vec::new(),
            emoji: None,
            text_style: TextStyle::from_style(style),
        }
    }

    /// Nothing to paint.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.box_fill.is_none() && self.emoji.is_none()
    }

    /// All words in paint order.
    pub fn words(&self) -> impl Iterator<Item = &WordPlan> {
        self.lines.iter().flat_map(|l| l.words.iter())
    }
}

/// Inputs layout needs beyond the unit and style.
pub struct LayoutEnv<'a> {
    pub canvas: Canvas,
    pub measure: &'a mut dyn TextMeasure,
    /// Emoji size after `emoji_scale`, when an emoji is configured.
    pub emoji_size: Option<Size>,
}

/// Lay out `unit` at time `t`, advancing `highlight` for this frame.
///
/// `highlight` must already be bound to the unit (see [`HighlightState::enter_unit`]).
#[tracing::instrument(
    level = "debug",
    skip(unit, style, highlight, env),
    fields(words = unit.words.len())
)]
pub fn layout(
    unit: &DisplayUnit,
    style: &StyleConfig,
    highlight: &mut HighlightState,
    t: f64,
    env: &mut LayoutEnv<'_>,
) -> CaptyteResult<LayoutPlan> {
    if unit.words.is_empty() {
        return Ok(LayoutPlan::empty(style));
    }

    let active = active_word(unit, t);
    let flags = highlight.advance(&unit.words, t, active);

    let texts: Vec<String> = unit
        .words
        .iter()
        .map(|w| style.text_case.apply(w.display_text()))
        .collect();
    let ranges = wrap_lines(&texts, style.max_line_chars, style.multi_line);

    let mut advances = Vec::with_capacity(texts.len());
    for text in &texts {
        let extent = env
            .measure
            .text_extent(&format!("{text} "), style.font_size)?;
        advances.push(extent.width);
    }
    let mut longest = 0.0f64;
    for range in &ranges {
        let line_text = texts[range.clone()].join(" ");
        longest = longest.max(env.measure.text_extent(&line_text, style.font_size)?.width);
    }

    let frame_w = f64::from(env.canvas.width);
    let box_width = (frame_w - FRAME_MARGIN)
        .min(longest + 2.0 * style.padding_x)
        .max(0.0);
    let box_x = (frame_w - box_width) / 2.0;
    let box_y = style.box_vertical_position;
    let line_h = LINE_HEIGHT * style.line_spacing;
    let text_height = line_h * ranges.len() as f64;
    let caption_area = Rect::new(
        box_x,
        box_y,
        box_x + box_width,
        box_y + text_height + 2.0 * style.padding_y,
    );

    let mut lines = Vec::with_capacity(ranges.len());
    let mut baseline_y = box_y + style.padding_y + line_h / 2.0;
    for range in ranges {
        let width: f64 = advances[range.clone()]
            .iter()
            .map(|a| a + style.letter_spacing)
            .sum::<f64>()
            - style.letter_spacing;
        let mut x = match style.text_alignment {
            TextAlignment::Left => box_x + style.padding_x,
            TextAlignment::Right => box_x + box_width - style.padding_x - width,
            TextAlignment::Center => box_x + (box_width - width) / 2.0,
        };
        let mut words = Vec::with_capacity(range.len());
        for i in range {
            let advance = advances[i] + style.letter_spacing;
            words.push(WordPlan {
                index: i,
                text: texts[i].clone(),
                origin: Point::new(x, baseline_y),
                advance,
                highlighted: flags[i],
            });
            x += advance;
        }
        lines.push(LinePlan {
            baseline_y,
            width,
            words,
        });
        baseline_y += line_h;
    }

    let box_fill = style.show_box.then(|| BoxFill {
        rect: caption_area,
        color: style.bg_color.clone(),
        opacity: style.bg_opacity,
    });

    let emoji = env.emoji_size.and_then(|size| {
        place_emoji(
            style,
            env.canvas,
            size,
            box_x,
            box_y,
            box_width,
            text_height,
        )
    });

    Ok(LayoutPlan {
        text: texts.join(" "),
        active_word: active,
        caption_area,
        box_fill,
        lines,
        emoji,
        text_style: TextStyle::from_style(style),
    })
}

/// Greedy wrap of word indices into visual lines.
fn wrap_lines(texts: &[String], max_chars: usize, multi_line: bool) -> Vec<Range<usize>> {
    if !multi_line || texts.is_empty() {
        return vec![0..texts.len()];
    }
    let mut lines = Vec::new();
    let mut start = 0;
    let mut len = 0usize;
    for (i, text) in texts.iter().enumerate() {
        let n = text.chars().count();
        if i == start {
            len = n;
        } else if len + 1 + n > max_chars {
            lines.push(start..i);
            start = i;
            len = n;
        } else {
            len += 1 + n;
        }
    }
    lines.push(start..texts.len());
    lines
}

fn place_emoji(
    style: &StyleConfig,
    canvas: Canvas,
    size: Size,
    box_x: f64,
    box_y: f64,
    box_width: f64,
    text_height: f64,
) -> Option<EmojiPlacement> {
    let (ew, eh) = (size.width, size.height);
    let (fw, fh) = (f64::from(canvas.width), f64::from(canvas.height));
    if ew > fw || eh > fh {
        tracing::warn!(
            emoji_w = ew,
            emoji_h = eh,
            frame_w = fw,
            frame_h = fh,
            "emoji larger than frame, skipping"
        );
        return None;
    }

    let (mx, my) = (style.emoji_margin_x, style.emoji_margin_y);
    let x = match style.emoji_position {
        EmojiPosition::TopLeft | EmojiPosition::BottomLeft => box_x + style.padding_x + mx,
        EmojiPosition::TopRight | EmojiPosition::BottomRight => {
            box_x + box_width - style.padding_x - ew - mx
        }
        EmojiPosition::TopCenter | EmojiPosition::BottomCenter => box_x + (box_width - ew) / 2.0,
    };
    let y = if style.emoji_position.is_top() {
        box_y - eh - my
    } else {
        box_y + text_height + style.padding_y + my
    };

    let x = x.min(fw - ew).max(0.0);
    let y = y.min(fh - eh).max(0.0);
    Some(EmojiPlacement {
        rect: Rect::new(x, y, x + ew, y + eh),
        opacity: style.emoji_opacity,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/plan.rs"]
mod tests;
