//! Exact-match chord recognition and inversion labelling.

use std::fmt;

use crate::chord::DiatonicChord;
use crate::pitch::{PitchClass, PitchClassSet};

/// Find the catalog chord whose pitch-class set equals `held` exactly.
///
/// Octave, voicing and note order do not matter. Sets of any other size or
/// content return None. The first match in catalog order wins.
pub fn recognize<'a>(held: &PitchClassSet, catalog: &'a [DiatonicChord]) -> Option<&'a DiatonicChord> {
    catalog.iter().find(|chord| chord.pcs == *held)
}

/// Which chord tone sounds lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inversion {
    Root,
    First,
    Second,
    Third,
}

impl Inversion {
    pub fn label(&self) -> &'static str {
        match self {
            Inversion::Root => "root",
            Inversion::First => "1st inv",
            Inversion::Second => "2nd inv",
            Inversion::Third => "3rd inv",
        }
    }
}

impl fmt::Display for Inversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label the inversion from the lowest held note.
///
/// The bass is compared against root, third, fifth and seventh in that order.
/// Returns None for no notes or a bass that is not a chord tone.
pub fn detect_inversion<I>(held_notes: I, chord: &DiatonicChord) -> Option<Inversion>
where
    I: IntoIterator,
    I::Item: Into<i32>,
{
    let lowest: i32 = held_notes.into_iter().map(Into::into).min()?;
    let bass = PitchClass::from_note(lowest);

    if bass == chord.root {
        Some(Inversion::Root)
    } else if bass == chord.third() {
        Some(Inversion::First)
    } else if bass == chord.fifth() {
        Some(Inversion::Second)
    } else if chord.seventh() == Some(bass) {
        Some(Inversion::Third)
    } else {
        None
    }
}

/// Outcome of one evaluation of the held notes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecognitionResult {
    pub chord: Option<DiatonicChord>,
    pub inversion: Option<Inversion>,
}

impl RecognitionResult {
    /// Normalize, match and label in one pass.
    pub fn evaluate(held_notes: &[i32], catalog: &[DiatonicChord]) -> Self {
        let pcs = crate::pitch::normalize(held_notes.iter().copied());
        match recognize(&pcs, catalog) {
            Some(chord) => RecognitionResult {
                inversion: detect_inversion(held_notes.iter().copied(), chord),
                chord: Some(chord.clone()),
            },
            None => RecognitionResult::default(),
        }
    }

    pub fn inversion_label(&self) -> Option<&'static str> {
        self.inversion.map(|inv| inv.label())
    }
}
