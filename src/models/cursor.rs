//! Cursor addressing into a score
//!
//! The cursor always refers to an existing note, or to position 0 of an
//! empty measure (the empty-measure sentinel, where the next insert lands).
//! Every movement and every post-mutation fixup clamps against the score,
//! so score operations called through the cursor cannot see an out-of-range
//! address.

use serde::{Deserialize, Serialize};

use super::score::Score;

/// Position reference into a score
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub measure: usize,
    pub index: usize,
}

impl Cursor {
    /// Cursor at the very first position
    pub fn start() -> Self {
        Self {
            measure: 0,
            index: 0,
        }
    }

    /// True when the cursor sits in an empty measure (nothing to address)
    pub fn at_sentinel(&self, score: &Score) -> bool {
        score
            .measures
            .get(self.measure)
            .map(|m| m.is_empty())
            .unwrap_or(true)
    }

    /// Clamp to the nearest valid address in the score
    pub fn clamp(&mut self, score: &Score) {
        if score.measures.is_empty() {
            self.measure = 0;
            self.index = 0;
            return;
        }
        self.measure = self.measure.min(score.measures.len() - 1);
        let len = score.measures[self.measure].len();
        self.index = if len == 0 { 0 } else { self.index.min(len - 1) };
    }

    /// Move to the previous note, crossing into the previous measure
    pub fn previous(&mut self, score: &Score) {
        if self.index > 0 {
            self.index -= 1;
        } else if self.measure > 0 {
            self.measure -= 1;
            self.index = score.measures[self.measure].len().saturating_sub(1);
        }
        self.clamp(score);
    }

    /// Move to the next note, crossing into the next measure
    pub fn next(&mut self, score: &Score) {
        let len = score
            .measures
            .get(self.measure)
            .map(|m| m.len())
            .unwrap_or(0);
        if self.index + 1 < len {
            self.index += 1;
        } else if self.measure + 1 < score.measures.len() {
            self.measure += 1;
            self.index = 0;
        }
        self.clamp(score);
    }

    /// Jump to the previous measure (start of it)
    pub fn previous_measure(&mut self, score: &Score) {
        self.measure = self.measure.saturating_sub(1);
        self.index = 0;
        self.clamp(score);
    }

    /// Jump to the next measure (start of it)
    pub fn next_measure(&mut self, score: &Score) {
        if self.measure + 1 < score.measures.len() {
            self.measure += 1;
        }
        self.index = 0;
        self.clamp(score);
    }

    /// Jump to the first note of the score
    pub fn first(&mut self, score: &Score) {
        self.measure = 0;
        self.index = 0;
        self.clamp(score);
    }

    /// Jump to the last note of the score
    pub fn last(&mut self, score: &Score) {
        self.measure = score.measures.len().saturating_sub(1);
        self.index = usize::MAX;
        self.clamp(score);
    }

    /// Fix up the cursor after removing the note it addressed: move to the
    /// preceding note, or stay on the sentinel when the measure drained
    pub fn after_removal(&mut self, score: &Score) {
        self.index = self.index.saturating_sub(1);
        self.clamp(score);
    }

    /// Position where an insert should land (at the sentinel that is 0)
    pub fn insert_index(&self, score: &Score) -> usize {
        if self.at_sentinel(score) {
            0
        } else {
            self.index + 1
        }
    }
}
