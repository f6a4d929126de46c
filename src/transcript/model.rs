use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{CaptyteError, CaptyteResult};

/// One timestamped word as produced by the transcript source.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Word {
    /// Word text exactly as transcribed (may carry surrounding whitespace).
    #[serde(rename = "word")]
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds, `>= start`.
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Text used for display and character budgeting.
    pub fn display_text(&self) -> &str {
        self.text.trim()
    }

    /// Inclusive interval containment.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// A transcript segment. Only the word list is consumed.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TranscriptSegment {
    /// Words in non-decreasing start order.
    pub words: Vec<Word>,
}

/// Transcript document: `{"segments": [{"words": [...]}, ...]}`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transcript {
    /// Source segments. Their boundaries are not display boundaries.
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Parse and validate a transcript from JSON text.
    pub fn from_json_str(s: &str) -> CaptyteResult<Self> {
        let transcript: Self = serde_json::from_str(s)
            .map_err(|e| CaptyteError::parse(format!("invalid transcript json: {e}")))?;
        transcript.validate()?;
        Ok(transcript)
    }

    /// Read, parse and validate a transcript file.
    pub fn from_path(path: &Path) -> CaptyteResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read transcript '{}'", path.display()))?;
        Self::from_json_str(&text).map_err(|e| match e {
            CaptyteError::Parse(msg) => CaptyteError::parse(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Reject non-finite, negative or inverted word intervals.
    pub fn validate(&self) -> CaptyteResult<()> {
        for (si, segment) in self.segments.iter().enumerate() {
            for (wi, w) in segment.words.iter().enumerate() {
                if !w.start.is_finite() || !w.end.is_finite() {
                    return Err(CaptyteError::parse(format!(
                        "segments[{si}].words[{wi}] has non-finite times"
                    )));
                }
                if w.start < 0.0 {
                    return Err(CaptyteError::parse(format!(
                        "segments[{si}].words[{wi}] starts before 0 ({})",
                        w.start
                    )));
                }
                if w.end < w.start {
                    return Err(CaptyteError::parse(format!(
                        "segments[{si}].words[{wi}] ends before it starts ({} < {})",
                        w.end, w.start
                    )));
                }
            }
        }
        Ok(())
    }

    /// All words of all segments, in order.
    pub fn flatten_words(&self) -> Vec<Word> {
        self.segments
            .iter()
            .flat_map(|s| s.words.iter().cloned())
            .collect()
    }

    /// Total number of words.
    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| s.words.len()).sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transcript/model.rs"]
mod tests;
