use crate::transcript::model::Word;
use crate::transcript::segment::DisplayUnit;

/// Index of the first unit (input order) with `start <= t <= end`.
pub fn active_unit(units: &[DisplayUnit], t: f64) -> Option<usize> {
    units.iter().position(|u| u.contains(t))
}

/// Index of the first word of `unit` with `start <= t <= end`.
pub fn active_word(unit: &DisplayUnit, t: f64) -> Option<usize> {
    first_containing(&unit.words, t)
}

pub(crate) fn first_containing(words: &[Word], t: f64) -> Option<usize> {
    words.iter().position(|w| w.contains(t))
}

/// Display units prepared for repeated lookups during playback.
///
/// Lookups return exactly what [`active_unit`] returns, but skip the prefix of units that
/// end before `t` with a binary search over the running maximum of unit ends.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    units: Vec<DisplayUnit>,
    max_end_prefix: Vec<f64>,
    starts_sorted: bool,
}

impl Timeline {
    pub fn new(units: Vec<DisplayUnit>) -> Self {
        let mut max_end_prefix = Vec::with_capacity(units.len());
        let mut running = f64::NEG_INFINITY;
        for u in &units {
            running = running.max(u.end);
            max_end_prefix.push(running);
        }
        let starts_sorted = units.windows(2).all(|w| w[0].start <= w[1].start);
        Self {
            units,
            max_end_prefix,
            starts_sorted,
        }
    }

    pub fn units(&self) -> &[DisplayUnit] {
        &self.units
    }

    pub fn unit(&self, idx: usize) -> Option<&DisplayUnit> {
        self.units.get(idx)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// First unit containing `t`, in input order.
    pub fn active_unit(&self, t: f64) -> Option<usize> {
        // Units before `first` all end before `t`.
        let first = self.max_end_prefix.partition_point(|&end| end < t);
        for (offset, unit) in self.units[first..].iter().enumerate() {
            if self.starts_sorted && unit.start > t {
                return None;
            }
            if unit.contains(t) {
                return Some(first + offset);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/select.rs"]
mod tests;
