//! Duration representation
//!
//! Durations are stored the way LilyPond thinks about them: a logarithmic
//! base length, a dot count, and an optional tuplet scaling factor. The
//! exact rational value is computed on demand with num-rational, so measure
//! totals never accumulate floating point error.

use num_rational::Rational32;
use serde::{Deserialize, Serialize};

/// Re-export Rational for duration calculations
pub type Rational = Rational32;

/// Musical duration representation
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    /// Logarithmic base length (0=whole, 1=half, 2=quarter, ..., 6=sixty-fourth)
    pub log: u8,

    /// Number of augmentation dots; each dot extends the running total by half
    pub dots: u8,

    /// Scaling factor for tuplets (e.g. 2/3 for a triplet member)
    pub factor: Option<Rational>,
}

impl Duration {
    /// Shortest supported base length (sixty-fourth note)
    pub const MAX_LOG: u8 = 6;

    /// Most augmentation dots the notation supports
    pub const MAX_DOTS: u8 = 3;

    /// Create a new duration; the base and dot count are clamped to the
    /// notation range, and a factor of 1/1 is normalized away
    pub fn new(log: u8, dots: u8, factor: Option<Rational>) -> Self {
        let factor = factor.filter(|f| *f != Rational::new(1, 1));
        Self {
            log: log.min(Self::MAX_LOG),
            dots: dots.min(Self::MAX_DOTS),
            factor,
        }
    }

    /// A plain quarter note duration, the editor's insertion default
    pub fn quarter() -> Self {
        Self::new(2, 0, None)
    }

    /// The denominator digit of the base length (1, 2, 4, ..., 64)
    pub fn denominator(&self) -> u32 {
        1 << self.log.min(Self::MAX_LOG)
    }

    /// Exact rational length, as a fraction of a whole note
    ///
    /// A dotted note is base * (2 - 1/2^dots); the tuplet factor scales the
    /// result. The value may be non-positive if the factor is degenerate;
    /// the notation mapper rejects that case. The shift amounts stay in
    /// range even for a hand-built value outside the notation bounds.
    pub fn value(&self) -> Rational {
        let log = self.log.min(Self::MAX_LOG);
        let dots = self.dots.min(Self::MAX_DOTS);
        let base = Rational::new(1, 1 << log);
        let dotted = base * Rational::new((1i32 << (dots + 1)) - 1, 1i32 << dots);
        match self.factor {
            Some(f) => dotted * f,
            None => dotted,
        }
    }

    /// Convert duration to LilyPond notation (e.g. "4", "8.", "4*2/3")
    pub fn to_lilypond_string(&self) -> String {
        let dots = ".".repeat(self.dots as usize);
        let factor = match &self.factor {
            Some(f) => format!("*{}/{}", f.numer(), f.denom()),
            None => String::new(),
        };
        format!("{}{}{}", self.denominator(), dots, factor)
    }

    /// Halve the base length (quarter -> eighth), clamped at a sixty-fourth
    pub fn halve(&mut self) {
        if self.log < Self::MAX_LOG {
            self.log += 1;
        }
    }

    /// Double the base length (quarter -> half), clamped at a whole note
    pub fn double(&mut self) {
        self.log = self.log.saturating_sub(1);
    }

    /// Cycle the dot count through 0..=MAX_DOTS
    pub fn cycle_dots(&mut self) {
        self.dots = (self.dots + 1) % (Self::MAX_DOTS + 1);
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::quarter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_of_plain_lengths() {
        assert_eq!(Duration::new(0, 0, None).value(), Rational::new(1, 1));
        assert_eq!(Duration::new(2, 0, None).value(), Rational::new(1, 4));
        assert_eq!(Duration::new(6, 0, None).value(), Rational::new(1, 64));
    }

    #[test]
    fn test_value_with_dots() {
        // dotted quarter = 3/8, double-dotted half = 7/8
        assert_eq!(Duration::new(2, 1, None).value(), Rational::new(3, 8));
        assert_eq!(Duration::new(1, 2, None).value(), Rational::new(7, 8));
    }

    #[test]
    fn test_value_with_tuplet_factor() {
        // triplet eighth = 1/8 * 2/3 = 1/12
        let d = Duration::new(3, 0, Some(Rational::new(2, 3)));
        assert_eq!(d.value(), Rational::new(1, 12));
    }

    #[test]
    fn test_lilypond_strings() {
        assert_eq!(Duration::new(0, 0, None).to_lilypond_string(), "1");
        assert_eq!(Duration::new(2, 1, None).to_lilypond_string(), "4.");
        assert_eq!(
            Duration::new(3, 0, Some(Rational::new(2, 3))).to_lilypond_string(),
            "8*2/3"
        );
    }

    #[test]
    fn test_unit_factor_is_normalized() {
        let d = Duration::new(2, 0, Some(Rational::new(1, 1)));
        assert_eq!(d.factor, None);
        assert_eq!(d, Duration::quarter());
    }

    #[test]
    fn test_new_clamps_to_the_notation_range() {
        let d = Duration::new(9, 7, None);
        assert_eq!(d.log, Duration::MAX_LOG);
        assert_eq!(d.dots, Duration::MAX_DOTS);
    }

    #[test]
    fn test_value_tolerates_hand_built_fields() {
        // out-of-range fields can only come from a struct literal; the
        // value must still not overflow its shifts
        let d = Duration {
            log: 40,
            dots: 40,
            factor: None,
        };
        assert_eq!(d.value(), Duration::new(6, 3, None).value());
        assert_eq!(d.denominator(), 64);
    }

    #[test]
    fn test_halve_double_clamp() {
        let mut d = Duration::new(Duration::MAX_LOG, 0, None);
        d.halve();
        assert_eq!(d.log, Duration::MAX_LOG);
        let mut d = Duration::new(0, 0, None);
        d.double();
        assert_eq!(d.log, 0);
    }
}
