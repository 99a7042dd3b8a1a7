//! Score data model
//!
//! The score owns an ordered list of measures, each an ordered list of
//! notes. Mutations are addressed by (measure, index) and fail with an
//! `AddressError` when the address is out of range. Musical validity
//! (an overfull measure, say) is advisory: notation entry is provisional
//! while editing, so nothing here refuses "wrong" music.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::attributes::{ClefType, KeySignature, TimeSignature};
use super::duration::{Duration, Rational};
use super::pitch::Pitch;

/// Invalid (measure, index) coordinate passed to a score operation
///
/// This indicates a programming defect in the caller: the editor clamps its
/// cursor before touching the score, so these should never surface to a
/// user-facing path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("measure {index} out of range (score has {len} measures)")]
    MeasureOutOfRange { index: usize, len: usize },

    #[error("position {index} out of range in measure {measure} ({len} notes)")]
    PositionOutOfRange {
        measure: usize,
        index: usize,
        len: usize,
    },
}

/// A single note or rest
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    /// A pitched note
    Pitched { pitch: Pitch, duration: Duration },

    /// A rest, carrying only a duration
    Rest { duration: Duration },
}

impl Note {
    /// The duration of this note or rest
    pub fn duration(&self) -> Duration {
        match self {
            Note::Pitched { duration, .. } | Note::Rest { duration } => *duration,
        }
    }

    /// Mutable access to the duration
    pub fn duration_mut(&mut self) -> &mut Duration {
        match self {
            Note::Pitched { duration, .. } | Note::Rest { duration } => duration,
        }
    }

    /// The pitch, if this is a pitched note
    pub fn pitch(&self) -> Option<Pitch> {
        match self {
            Note::Pitched { pitch, .. } => Some(*pitch),
            Note::Rest { .. } => None,
        }
    }

    /// True if this is a rest
    pub fn is_rest(&self) -> bool {
        matches!(self, Note::Rest { .. })
    }
}

/// An ordered sequence of notes between two barlines
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Measure {
    pub notes: Vec<Note>,
}

impl Measure {
    /// Create an empty measure
    pub fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// Total duration of the notes in this measure
    pub fn total_duration(&self) -> Rational {
        self.notes
            .iter()
            .map(|n| n.duration().value())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// The root entity: measures plus score-level metadata
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub clef: ClefType,
    pub time: TimeSignature,
    pub key: Option<KeySignature>,
    pub measures: Vec<Measure>,
}

impl Score {
    /// A fresh score: treble clef, common time, one empty measure
    pub fn new() -> Self {
        Self {
            clef: ClefType::default(),
            time: TimeSignature::common(),
            key: None,
            measures: vec![Measure::new()],
        }
    }

    fn measure_checked(&self, measure: usize) -> Result<&Measure, AddressError> {
        self.measures
            .get(measure)
            .ok_or(AddressError::MeasureOutOfRange {
                index: measure,
                len: self.measures.len(),
            })
    }

    fn measure_checked_mut(&mut self, measure: usize) -> Result<&mut Measure, AddressError> {
        let len = self.measures.len();
        self.measures
            .get_mut(measure)
            .ok_or(AddressError::MeasureOutOfRange { index: measure, len })
    }

    /// Borrow the note at (measure, index)
    pub fn note(&self, measure: usize, index: usize) -> Result<&Note, AddressError> {
        let m = self.measure_checked(measure)?;
        m.notes
            .get(index)
            .ok_or(AddressError::PositionOutOfRange {
                measure,
                index,
                len: m.notes.len(),
            })
    }

    /// Mutably borrow the note at (measure, index)
    pub fn note_mut(&mut self, measure: usize, index: usize) -> Result<&mut Note, AddressError> {
        let m = self.measure_checked_mut(measure)?;
        let len = m.notes.len();
        m.notes
            .get_mut(index)
            .ok_or(AddressError::PositionOutOfRange {
                measure,
                index,
                len,
            })
    }

    /// Insert a note at (measure, index); index may equal the note count
    pub fn insert_note(
        &mut self,
        measure: usize,
        index: usize,
        note: Note,
    ) -> Result<(), AddressError> {
        let m = self.measure_checked_mut(measure)?;
        if index > m.notes.len() {
            return Err(AddressError::PositionOutOfRange {
                measure,
                index,
                len: m.notes.len(),
            });
        }
        m.notes.insert(index, note);
        Ok(())
    }

    /// Replace the note at (measure, index), returning the previous note
    pub fn replace_note(
        &mut self,
        measure: usize,
        index: usize,
        note: Note,
    ) -> Result<Note, AddressError> {
        let slot = self.note_mut(measure, index)?;
        Ok(std::mem::replace(slot, note))
    }

    /// Remove and return the note at (measure, index)
    pub fn remove_note(&mut self, measure: usize, index: usize) -> Result<Note, AddressError> {
        let m = self.measure_checked_mut(measure)?;
        if index >= m.notes.len() {
            return Err(AddressError::PositionOutOfRange {
                measure,
                index,
                len: m.notes.len(),
            });
        }
        Ok(m.notes.remove(index))
    }

    /// Insert an empty measure at the given position (may equal the count)
    pub fn insert_measure(&mut self, index: usize) -> Result<(), AddressError> {
        if index > self.measures.len() {
            return Err(AddressError::MeasureOutOfRange {
                index,
                len: self.measures.len(),
            });
        }
        self.measures.insert(index, Measure::new());
        Ok(())
    }

    /// Split a measure in two; notes from `index` onward move to a new
    /// measure inserted directly after
    pub fn split_measure(&mut self, measure: usize, index: usize) -> Result<(), AddressError> {
        let m = self.measure_checked_mut(measure)?;
        if index > m.notes.len() {
            return Err(AddressError::PositionOutOfRange {
                measure,
                index,
                len: m.notes.len(),
            });
        }
        let tail = m.notes.split_off(index);
        self.measures.insert(measure + 1, Measure { notes: tail });
        Ok(())
    }

    /// Fold the following measure into this one
    pub fn merge_measures(&mut self, measure: usize) -> Result<(), AddressError> {
        if measure + 1 >= self.measures.len() {
            return Err(AddressError::MeasureOutOfRange {
                index: measure + 1,
                len: self.measures.len(),
            });
        }
        let mut tail = self.measures.remove(measure + 1);
        self.measures[measure].notes.append(&mut tail.notes);
        Ok(())
    }

    /// Total duration of a single measure
    pub fn measure_duration(&self, measure: usize) -> Result<Rational, AddressError> {
        Ok(self.measure_checked(measure)?.total_duration())
    }

    /// Total performable duration of the whole score
    pub fn total_duration(&self) -> Rational {
        self.measures.iter().map(|m| m.total_duration()).sum()
    }

    /// Advisory check: does this measure exceed the time signature?
    pub fn is_overfull(&self, measure: usize) -> Result<bool, AddressError> {
        Ok(self.measure_duration(measure)? > self.time.measure_length())
    }

    /// Advisory check: does this measure fall short of the time signature?
    pub fn is_underfull(&self, measure: usize) -> Result<bool, AddressError> {
        Ok(self.measure_duration(measure)? < self.time.measure_length())
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_rest() -> Note {
        Note::Rest {
            duration: Duration::quarter(),
        }
    }

    fn note_c4(log: u8) -> Note {
        Note::Pitched {
            pitch: Pitch::new(0, 0, 4).unwrap(),
            duration: Duration::new(log, 0, None),
        }
    }

    #[test]
    fn test_insert_and_remove() {
        let mut score = Score::new();
        score.insert_note(0, 0, quarter_rest()).unwrap();
        score.insert_note(0, 1, note_c4(2)).unwrap();
        assert_eq!(score.measures[0].len(), 2);

        let removed = score.remove_note(0, 0).unwrap();
        assert!(removed.is_rest());
        assert_eq!(score.measures[0].len(), 1);
    }

    #[test]
    fn test_address_errors() {
        let mut score = Score::new();
        assert_eq!(
            score.insert_note(1, 0, quarter_rest()),
            Err(AddressError::MeasureOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            score.remove_note(0, 0),
            Err(AddressError::PositionOutOfRange {
                measure: 0,
                index: 0,
                len: 0
            })
        );
        assert!(score.insert_note(0, 1, quarter_rest()).is_err());
    }

    #[test]
    fn test_replace_returns_the_previous_note() {
        let mut score = Score::new();
        score.insert_note(0, 0, quarter_rest()).unwrap();
        let previous = score.replace_note(0, 0, note_c4(1)).unwrap();
        assert!(previous.is_rest());
        assert_eq!(score.note(0, 0).unwrap().duration().log, 1);
        assert!(score.replace_note(0, 1, quarter_rest()).is_err());
    }

    #[test]
    fn test_split_and_merge() {
        let mut score = Score::new();
        for _ in 0..4 {
            score.insert_note(0, 0, note_c4(2)).unwrap();
        }
        score.split_measure(0, 2).unwrap();
        assert_eq!(score.measures.len(), 2);
        assert_eq!(score.measures[0].len(), 2);
        assert_eq!(score.measures[1].len(), 2);

        score.merge_measures(0).unwrap();
        assert_eq!(score.measures.len(), 1);
        assert_eq!(score.measures[0].len(), 4);

        // nothing after the last measure to merge
        assert!(score.merge_measures(0).is_err());
    }

    #[test]
    fn test_durations_and_validity() {
        let mut score = Score::new();
        for _ in 0..4 {
            score.insert_note(0, 0, note_c4(2)).unwrap();
        }
        assert_eq!(score.measure_duration(0).unwrap(), Rational::new(1, 1));
        assert!(!score.is_overfull(0).unwrap());
        assert!(!score.is_underfull(0).unwrap());

        // a fifth quarter makes the measure overfull, but nothing refuses it
        score.insert_note(0, 4, note_c4(2)).unwrap();
        assert!(score.is_overfull(0).unwrap());
        assert_eq!(score.total_duration(), Rational::new(5, 4));
    }
}
