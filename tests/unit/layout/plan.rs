use super::*;
use crate::layout::measure::{MonospaceMeasure, TextExtent};
use crate::transcript::model::Word;

/// Ten pixels per character regardless of scale.
struct TenPerChar;

impl TextMeasure for TenPerChar {
    fn text_extent(&mut self, text: &str, _font_size: f64) -> CaptyteResult<TextExtent> {
        Ok(TextExtent {
            width: text.chars().count() as f64 * 10.0,
            height: 40.0,
        })
    }
}

fn hi_there_friend() -> DisplayUnit {
    DisplayUnit::from_words(vec![
        Word::new("hi", 0.0, 0.4),
        Word::new("there", 0.4, 0.9),
        Word::new("friend", 1.0, 1.6),
    ])
    .expect("non-empty")
}

fn run(style: &StyleConfig, t: f64, emoji: Option<Size>) -> LayoutPlan {
    let mut measure = TenPerChar;
    let mut env = LayoutEnv {
        canvas: Canvas::new(1000, 1000).expect("canvas"),
        measure: &mut measure,
        emoji_size: emoji,
    };
    let mut highlight = HighlightState::new();
    highlight.enter_unit(0);
    layout(&hi_there_friend(), style, &mut highlight, t, &mut env).expect("layout")
}

fn xs(plan: &LayoutPlan) -> Vec<f64> {
    plan.words().map(|w| w.origin.x).collect()
}

#[test]
fn centered_single_line_geometry() {
    let plan = run(&StyleConfig::default(), 0.2, None);
    assert_eq!(plan.text, "hi there friend");
    assert_eq!(plan.lines.len(), 1);
    // "hi there friend" = 150px, + 2 * 30 padding.
    assert_eq!(plan.caption_area, Rect::new(395.0, 850.0, 605.0, 850.0 + 42.0 + 40.0));
    assert_eq!(plan.lines[0].width, 160.0);
    assert_eq!(xs(&plan), vec![420.0, 450.0, 510.0]);
    assert_eq!(plan.lines[0].baseline_y, 850.0 + 20.0 + 21.0);
    assert!(plan.box_fill.is_none());
}

#[test]
fn left_and_right_alignment() {
    let mut style = StyleConfig {
        text_alignment: TextAlignment::Left,
        ..StyleConfig::default()
    };
    assert_eq!(xs(&run(&style, 0.2, None))[0], 425.0);
    style.text_alignment = TextAlignment::Right;
    assert_eq!(xs(&run(&style, 0.2, None))[0], 415.0);
}

#[test]
fn letter_spacing_widens_advances() {
    let style = StyleConfig {
        letter_spacing: 5.0,
        ..StyleConfig::default()
    };
    let plan = run(&style, 0.2, None);
    assert_eq!(plan.lines[0].width, 170.0);
    assert_eq!(xs(&plan), vec![415.0, 450.0, 515.0]);
}

#[test]
fn box_is_capped_by_frame_margin() {
    let mut measure = TenPerChar;
    let mut env = LayoutEnv {
        canvas: Canvas::new(200, 200).expect("canvas"),
        measure: &mut measure,
        emoji_size: None,
    };
    let mut highlight = HighlightState::new();
    highlight.enter_unit(0);
    let plan = layout(
        &hi_there_friend(),
        &StyleConfig::default(),
        &mut highlight,
        0.2,
        &mut env,
    )
    .expect("layout");
    assert_eq!(plan.caption_area.x0, 50.0);
    assert_eq!(plan.caption_area.width(), 100.0);
}

#[test]
fn highlight_follows_active_word() {
    let style = StyleConfig::default();
    let plan = run(&style, 0.6, None);
    assert_eq!(plan.active_word, Some(1));
    let flags: Vec<bool> = plan.words().map(|w| w.highlighted).collect();
    assert_eq!(flags, vec![false, true, false]);

    // Gap between "there" and "friend".
    let plan = run(&style, 0.95, None);
    assert_eq!(plan.active_word, None);
    assert!(plan.words().all(|w| !w.highlighted));
}

#[test]
fn layout_is_deterministic() {
    let style = StyleConfig {
        show_box: true,
        ..StyleConfig::default()
    };
    let unit = hi_there_friend();
    let mut measure = TenPerChar;
    let mut env = LayoutEnv {
        canvas: Canvas::new(1000, 1000).expect("canvas"),
        measure: &mut measure,
        emoji_size: Some(Size::new(20.0, 20.0)),
    };
    let mut highlight = HighlightState::new();
    highlight.enter_unit(0);
    let a = layout(&unit, &style, &mut highlight, 0.6, &mut env).expect("layout");
    let b = layout(&unit, &style, &mut highlight, 0.6, &mut env).expect("layout");
    assert_eq!(a, b);
}

#[test]
fn box_fill_uses_caption_area() {
    let style = StyleConfig {
        show_box: true,
        bg_opacity: 0.5,
        ..StyleConfig::default()
    };
    let plan = run(&style, 0.2, None);
    let fill = plan.box_fill.expect("box");
    assert_eq!(fill.rect, plan.caption_area);
    assert_eq!(fill.color, "#FFFF99");
    assert_eq!(fill.opacity, 0.5);
}

#[test]
fn text_case_applies_to_words_and_text() {
    let style = StyleConfig {
        text_case: crate::style::config::TextCase::Uppercase,
        ..StyleConfig::default()
    };
    let plan = run(&style, 0.2, None);
    assert_eq!(plan.text, "HI THERE FRIEND");
    let words: Vec<&str> = plan.words().map(|w| w.text.as_str()).collect();
    assert_eq!(words, vec!["HI", "THERE", "FRIEND"]);
}

#[test]
fn multi_line_wraps_on_char_budget() {
    let style = StyleConfig {
        multi_line: true,
        max_line_chars: 8,
        ..StyleConfig::default()
    };
    let plan = run(&style, 0.2, None);
    assert_eq!(plan.lines.len(), 2);
    assert_eq!(plan.lines[0].words.len(), 2);
    assert_eq!(plan.lines[1].words[0].text, "friend");
    assert_eq!(plan.lines[1].baseline_y - plan.lines[0].baseline_y, 42.0);
    // Longest line "hi there" = 80px.
    assert_eq!(plan.caption_area.width(), 140.0);
    assert_eq!(plan.caption_area.height(), 84.0 + 40.0);
}

#[test]
fn emoji_positions_relative_to_box() {
    let size = Some(Size::new(50.0, 40.0));
    let plan = run(&StyleConfig::default(), 0.2, size);
    let emoji = plan.emoji.expect("emoji");
    assert_eq!(emoji.rect, Rect::new(515.0, 800.0, 565.0, 840.0));

    let style = StyleConfig {
        emoji_position: EmojiPosition::BottomLeft,
        ..StyleConfig::default()
    };
    let emoji = run(&style, 0.2, size).emoji.expect("emoji");
    assert_eq!(emoji.rect.origin(), Point::new(435.0, 850.0 + 42.0 + 20.0 + 10.0));

    let style = StyleConfig {
        emoji_position: EmojiPosition::TopCenter,
        ..StyleConfig::default()
    };
    let emoji = run(&style, 0.2, size).emoji.expect("emoji");
    assert_eq!(emoji.rect.x0, 475.0);
}

#[test]
fn emoji_is_clamped_into_frame() {
    let style = StyleConfig {
        box_vertical_position: 0.0,
        ..StyleConfig::default()
    };
    let emoji = run(&style, 0.2, Some(Size::new(50.0, 40.0)))
        .emoji
        .expect("emoji");
    assert_eq!(emoji.rect.y0, 0.0);

    let style = StyleConfig {
        box_vertical_position: 990.0,
        emoji_position: EmojiPosition::BottomRight,
        ..StyleConfig::default()
    };
    let emoji = run(&style, 0.2, Some(Size::new(50.0, 40.0)))
        .emoji
        .expect("emoji");
    assert_eq!(emoji.rect.y1, 1000.0);
}

#[test]
fn oversized_emoji_is_skipped() {
    let plan = run(&StyleConfig::default(), 0.2, Some(Size::new(2000.0, 10.0)));
    assert!(plan.emoji.is_none());
    assert_eq!(plan.lines.len(), 1);
}

#[test]
fn empty_unit_has_empty_plan() {
    let unit = DisplayUnit {
        text: String::new(),
        start: 0.0,
        end: 1.0,
        words: Vec::new(),
    };
    let mut measure = MonospaceMeasure::default();
    let mut env = LayoutEnv {
        canvas: Canvas::new(100, 100).expect("canvas"),
        measure: &mut measure,
        emoji_size: Some(Size::new(10.0, 10.0)),
    };
    let mut highlight = HighlightState::new();
    let plan = layout(
        &unit,
        &StyleConfig::default(),
        &mut highlight,
        0.5,
        &mut env,
    )
    .expect("layout");
    assert!(plan.is_empty());
}

#[test]
fn wrap_puts_long_word_on_own_line() {
    let texts: Vec<String> = ["a", "extraordinary", "b"].iter().map(|s| s.to_string()).collect();
    assert_eq!(wrap_lines(&texts, 5, true), vec![0..1, 1..2, 2..3]);
    assert_eq!(wrap_lines(&texts, 5, false), vec![0..3]);
}

#[test]
fn plan_serializes_with_documented_shape() {
    fn keys(v: &serde_json::Value) -> Vec<&str> {
        let mut keys: Vec<&str> = v
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys
    }

    let style = StyleConfig {
        show_box: true,
        ..StyleConfig::default()
    };
    let plan = run(&style, 0.2, Some(Size::new(20.0, 20.0)));
    let v = serde_json::to_value(&plan).expect("serialize");
    assert_eq!(
        keys(&v),
        [
            "active_word",
            "box_fill",
            "caption_area",
            "emoji",
            "lines",
            "text",
            "text_style"
        ]
    );
    assert_eq!(keys(&v["box_fill"]), ["color", "opacity", "rect"]);
    assert_eq!(keys(&v["emoji"]), ["opacity", "rect"]);
    assert_eq!(keys(&v["lines"][0]), ["baseline_y", "width", "words"]);
    assert_eq!(
        keys(&v["lines"][0]["words"][0]),
        ["advance", "highlighted", "index", "origin", "text"]
    );
    assert_eq!(
        keys(&v["text_style"]),
        [
            "font_size",
            "highlight_color",
            "stroke_color",
            "stroke_thickness",
            "text_color"
        ]
    );
}
