use std::collections::BTreeSet;

use crate::transcript::model::Word;

/// Highlight history for the current active display unit.
///
/// Identity is the word index inside the unit, never the word text. A word's highlight is a
/// single run of frames: it starts on the first frame whose time falls inside the word's
/// interval and, once a later frame no longer covers it, the index is spent and never
/// highlights again during this unit's lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightState {
    unit: Option<usize>,
    showing: BTreeSet<usize>,
    spent: BTreeSet<usize>,
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.unit = None;
        self.showing.clear();
        self.spent.clear();
    }

    /// Bind the state to `unit`, clearing history when the active unit changed.
    ///
    /// Returns `true` when a reset happened.
    pub fn enter_unit(&mut self, unit: usize) -> bool {
        if self.unit == Some(unit) {
            return false;
        }
        self.reset();
        self.unit = Some(unit);
        true
    }

    /// Unit the history belongs to.
    pub fn unit(&self) -> Option<usize> {
        self.unit
    }

    /// Whether index `i` already finished its highlight in this unit.
    pub fn is_spent(&self, i: usize) -> bool {
        self.spent.contains(&i)
    }

    /// Decide the highlight flag of every word for time `t` and record the outcome.
    ///
    /// Nothing is highlighted when there is no active word.
    pub fn advance(&mut self, words: &[Word], t: f64, active_word: Option<usize>) -> Vec<bool> {
        let mut flags = vec![false; words.len()];
        if active_word.is_some() {
            for (i, w) in words.iter().enumerate() {
                flags[i] = w.contains(t) && !self.spent.contains(&i);
            }
        }

        let ended: Vec<usize> = self
            .showing
            .iter()
            .copied()
            .filter(|&i| !flags.get(i).copied().unwrap_or(false))
            .collect();
        self.spent.extend(ended);
        self.showing = flags
            .iter()
            .enumerate()
            .filter_map(|(i, &on)| on.then_some(i))
            .collect();
        flags
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/highlight.rs"]
mod tests;
