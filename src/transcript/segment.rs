use crate::transcript::model::Word;

/// Pause (seconds) between two words that starts a new sentence.
pub const SILENCE_GAP_SECS: f64 = 0.5;

/// A line or sentence shown on screen as one caption.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DisplayUnit {
    /// Trimmed word texts joined by single spaces.
    pub text: String,
    /// Start of the first word.
    pub start: f64,
    /// End of the last word.
    pub end: f64,
    /// Words in input order.
    pub words: Vec<Word>,
}

impl DisplayUnit {
    /// Finalize a unit from its words. Returns `None` for an empty word list.
    pub fn from_words(words: Vec<Word>) -> Option<Self> {
        let start = words.first()?.start;
        let end = words.last()?.end;
        Some(Self {
            text: join_words(&words),
            start,
            end,
            words,
        })
    }

    /// Inclusive interval containment.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// How a flat word stream is grouped into display units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentPolicy {
    /// Line segmentation under a character budget.
    CharBudget {
        /// Character budget per unit.
        max_line_chars: usize,
        /// Multi-line captions close a unit only once the budget is exceeded.
        multi_line: bool,
    },
    /// Sentence segmentation on pauses longer than [`SILENCE_GAP_SECS`].
    SilenceGap,
}

/// Group `words` into display units according to `policy`.
///
/// Every input word lands in exactly one unit and order is preserved.
#[tracing::instrument(skip(words), fields(words = words.len()))]
pub fn segment_words(words: &[Word], policy: SegmentPolicy) -> Vec<DisplayUnit> {
    let units = match policy {
        SegmentPolicy::CharBudget {
            max_line_chars,
            multi_line,
        } => segment_char_budget(words, max_line_chars.max(1), multi_line),
        SegmentPolicy::SilenceGap => segment_silence_gap(words),
    };
    tracing::debug!(units = units.len(), "segmented transcript");
    units
}

fn segment_char_budget(words: &[Word], max_line_chars: usize, multi_line: bool) -> Vec<DisplayUnit> {
    let mut units = Vec::new();
    let mut current = Vec::<Word>::new();
    let mut len = 0usize;

    for word in words {
        let word_len = word.display_text().chars().count();
        // Appending would overflow the budget: the word opens the next unit instead.
        if !current.is_empty() && len + 1 + word_len > max_line_chars {
            flush(&mut units, &mut current);
        }

        len = if current.is_empty() {
            word_len
        } else {
            len + 1 + word_len
        };
        current.push(word.clone());

        let full = if multi_line {
            len > max_line_chars
        } else {
            len >= max_line_chars
        };
        if full {
            flush(&mut units, &mut current);
            len = 0;
        }
    }
    flush(&mut units, &mut current);
    units
}

fn segment_silence_gap(words: &[Word]) -> Vec<DisplayUnit> {
    let mut units = Vec::new();
    let mut current = Vec::<Word>::new();

    for word in words {
        if let Some(prev) = current.last()
            && word.start - prev.end > SILENCE_GAP_SECS
        {
            flush(&mut units, &mut current);
        }
        current.push(word.clone());
    }
    flush(&mut units, &mut current);
    units
}

fn flush(units: &mut Vec<DisplayUnit>, current: &mut Vec<Word>) {
    if let Some(unit) = DisplayUnit::from_words(std::mem::take(current)) {
        units.push(unit);
    }
}

pub(crate) fn join_words(words: &[Word]) -> String {
    words
        .iter()
        .map(Word::display_text)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/transcript/segment.rs"]
mod tests;
