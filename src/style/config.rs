use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::{Map, Value};

use crate::foundation::error::{CaptyteError, CaptyteResult};

/// Template sections written by the template designer. Their entries are merged into the flat
/// option namespace.
const SECTIONS: [&str; 4] = [
    "text_design",
    "content_positioning",
    "emoji_config",
    "animation_effects",
];

/// Designer spellings accepted for canonical option names.
const ALIASES: [(&str, &str); 3] = [
    ("outline_color", "stroke_color"),
    ("outline_thickness", "stroke_thickness"),
    ("font_family", "font_path"),
];

/// Horizontal placement of each caption line inside the box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlignment {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" | "centre" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Case transform applied to displayed words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

impl TextCase {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "uppercase" => Some(Self::Uppercase),
            "lowercase" => Some(Self::Lowercase),
            "capitalize" => Some(Self::Capitalize),
            _ => None,
        }
    }

    /// Transform one word. Applying this per word and joining with spaces gives the same
    /// result as transforming the joined text.
    pub fn apply(self, word: &str) -> String {
        match self {
            Self::None => word.to_string(),
            Self::Uppercase => word.to_uppercase(),
            Self::Lowercase => word.to_lowercase(),
            Self::Capitalize => {
                // Title case: a cased letter starts a word unless it follows another cased
                // letter, so digits, apostrophes and hyphens also start words.
                let mut out = String::with_capacity(word.len());
                let mut prev_cased = false;
                for ch in word.chars() {
                    let cased = ch.is_lowercase() || ch.is_uppercase();
                    if !cased {
                        out.push(ch);
                    } else if prev_cased {
                        out.extend(ch.to_lowercase());
                    } else {
                        out.extend(ch.to_uppercase());
                    }
                    prev_cased = cased;
                }
                out
            }
        }
    }
}

/// Where the emoji sits relative to the caption box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmojiPosition {
    TopLeft,
    #[default]
    TopRight,
    TopCenter,
    BottomLeft,
    BottomRight,
    BottomCenter,
}

impl EmojiPosition {
    /// Unrecognized names fall back to [`EmojiPosition::TopRight`].
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "top-center" => Self::TopCenter,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            "bottom-center" => Self::BottomCenter,
            other => {
                tracing::warn!(value = other, "unknown emoji_position, using top-right");
                Self::TopRight
            }
        }
    }

    pub fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight | Self::TopCenter)
    }
}

/// Fully resolved caption style. Every option has a value.
///
/// Colors are kept as the template strings and parsed when painted.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StyleConfig {
    pub font_size: f64,
    pub stroke_thickness: f64,
    pub text_color: String,
    pub highlight_color: String,
    pub stroke_color: String,
    pub letter_spacing: f64,
    pub line_spacing: f64,
    pub text_alignment: TextAlignment,
    pub text_case: TextCase,
    pub padding_x: f64,
    pub padding_y: f64,
    pub show_box: bool,
    pub max_line_chars: usize,
    pub multi_line: bool,
    pub box_vertical_position: f64,
    pub bg_color: String,
    pub bg_opacity: f64,
    pub emoji_path: Option<PathBuf>,
    pub emoji_scale: f64,
    pub emoji_opacity: f64,
    pub emoji_position: EmojiPosition,
    pub emoji_margin_x: f64,
    pub emoji_margin_y: f64,
    pub font_path: Option<PathBuf>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: 1.5,
            stroke_thickness: 3.0,
            text_color: "#FFFFFF".to_string(),
            highlight_color: "#FF0000".to_string(),
            stroke_color: "#000000".to_string(),
            letter_spacing: 0.0,
            line_spacing: 1.2,
            text_alignment: TextAlignment::Center,
            text_case: TextCase::None,
            padding_x: 30.0,
            padding_y: 20.0,
            show_box: false,
            max_line_chars: 40,
            multi_line: false,
            box_vertical_position: 850.0,
            bg_color: "#FFFF99".to_string(),
            bg_opacity: 1.0,
            emoji_path: None,
            emoji_scale: 1.0,
            emoji_opacity: 1.0,
            emoji_position: EmojiPosition::TopRight,
            emoji_margin_x: 10.0,
            emoji_margin_y: 10.0,
            font_path: None,
        }
    }
}

impl StyleConfig {
    /// Resolve a (possibly partial, flat or sectioned) template over the defaults.
    ///
    /// Unknown keys are ignored. A value of the wrong type or outside its range falls back to
    /// the default and is reported with `tracing::warn!`.
    #[tracing::instrument(skip(partial))]
    pub fn resolve(partial: &Value) -> Self {
        let opts = flatten_template(partial);
        let d = Self::default();
        let o = Options { map: &opts };

        Self {
            font_size: o.number("font_size", d.font_size, |v| v > 0.0),
            stroke_thickness: o.number("stroke_thickness", d.stroke_thickness, |v| v >= 0.0),
            text_color: o.string("text_color", d.text_color),
            highlight_color: o.string("highlight_color", d.highlight_color),
            stroke_color: o.string("stroke_color", d.stroke_color),
            letter_spacing: o.number("letter_spacing", d.letter_spacing, |_| true),
            line_spacing: o.number("line_spacing", d.line_spacing, |v| v > 0.0),
            text_alignment: o.choice("text_alignment", d.text_alignment, TextAlignment::parse),
            text_case: o.choice("text_case", d.text_case, TextCase::parse),
            padding_x: o.number("padding_x", d.padding_x, |v| v >= 0.0),
            padding_y: o.number("padding_y", d.padding_y, |v| v >= 0.0),
            show_box: o.boolean("show_box", d.show_box),
            max_line_chars: o.count("max_line_chars", d.max_line_chars),
            multi_line: o.boolean("multi_line", d.multi_line),
            box_vertical_position: o.number("box_vertical_position", d.box_vertical_position, |_| {
                true
            }),
            bg_color: o.string("bg_color", d.bg_color),
            bg_opacity: o.number("bg_opacity", d.bg_opacity, unit_range),
            emoji_path: o.path("emoji_path"),
            emoji_scale: o.number("emoji_scale", d.emoji_scale, |v| v > 0.0),
            emoji_opacity: o.number("emoji_opacity", d.emoji_opacity, unit_range),
            emoji_position: o.emoji_position("emoji_position", d.emoji_position),
            emoji_margin_x: o.number("emoji_margin_x", d.emoji_margin_x, |_| true),
            emoji_margin_y: o.number("emoji_margin_y", d.emoji_margin_y, |_| true),
            font_path: o.path("font_path"),
        }
    }

    /// Parse template JSON text and resolve it.
    pub fn from_json_str(s: &str) -> CaptyteResult<Self> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| CaptyteError::parse(format!("invalid template json: {e}")))?;
        Ok(Self::resolve(&value))
    }

    /// Read and resolve a template file.
    pub fn from_path(path: &Path) -> CaptyteResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read template '{}'", path.display()))?;
        Self::from_json_str(&text).map_err(|e| match e {
            CaptyteError::Parse(msg) => CaptyteError::parse(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Flat JSON form; resolving it again yields an identical config.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn unit_range(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

fn flatten_template(partial: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    let Some(obj) = partial.as_object() else {
        if !partial.is_null() {
            tracing::warn!("style template is not a JSON object, using defaults");
        }
        return out;
    };

    for section in SECTIONS {
        if let Some(Value::Object(entries)) = obj.get(section) {
            for (k, v) in entries {
                out.insert(k.clone(), v.clone());
            }
        }
    }
    for (k, v) in obj {
        if SECTIONS.contains(&k.as_str()) && v.is_object() {
            continue;
        }
        out.insert(k.clone(), v.clone());
    }

    for (alias, canonical) in ALIASES {
        if !out.contains_key(canonical)
            && let Some(v) = out.get(alias).cloned()
        {
            out.insert(canonical.to_string(), v);
        }
    }
    out
}

struct Options<'a> {
    map: &'a Map<String, Value>,
}

impl Options<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn number(&self, key: &str, default: f64, valid: impl Fn(f64) -> bool) -> f64 {
        let Some(raw) = self.get(key) else {
            return default;
        };
        match raw.as_f64() {
            Some(v) if v.is_finite() && valid(v) => v,
            _ => {
                tracing::warn!(key, value = %raw, default, "invalid style number, using default");
                default
            }
        }
    }

    fn count(&self, key: &str, default: usize) -> usize {
        let Some(raw) = self.get(key) else {
            return default;
        };
        let parsed = raw.as_u64().or_else(|| {
            raw.as_f64()
                .filter(|v| v.is_finite() && v.fract() == 0.0 && *v >= 0.0)
                .map(|v| v as u64)
        });
        match parsed {
            Some(v) if v >= 1 => v as usize,
            _ => {
                tracing::warn!(key, value = %raw, default, "invalid style count, using default");
                default
            }
        }
    }

    fn boolean(&self, key: &str, default: bool) -> bool {
        let Some(raw) = self.get(key) else {
            return default;
        };
        raw.as_bool().unwrap_or_else(|| {
            tracing::warn!(key, value = %raw, default, "invalid style flag, using default");
            default
        })
    }

    fn string(&self, key: &str, default: String) -> String {
        let Some(raw) = self.get(key) else {
            return default;
        };
        match raw.as_str() {
            Some(s) => s.to_string(),
            None => {
                tracing::warn!(key, value = %raw, "invalid style string, using default");
                default
            }
        }
    }

    fn choice<T: Copy + std::fmt::Debug>(
        &self,
        key: &str,
        default: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> T {
        let Some(raw) = self.get(key) else {
            return default;
        };
        match raw.as_str().and_then(parse) {
            Some(v) => v,
            None => {
                tracing::warn!(key, value = %raw, ?default, "unknown style choice, using default");
                default
            }
        }
    }

    fn emoji_position(&self, key: &str, default: EmojiPosition) -> EmojiPosition {
        match self.get(key).and_then(Value::as_str) {
            Some(s) => EmojiPosition::parse_or_default(s),
            None => default,
        }
    }

    fn path(&self, key: &str) -> Option<PathBuf> {
        let raw = self.get(key)?;
        match raw.as_str().map(str::trim) {
            Some("") => None,
            Some(s) => Some(PathBuf::from(s)),
            None => {
                tracing::warn!(key, value = %raw, "invalid style path, ignoring");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/config.rs"]
mod tests;
