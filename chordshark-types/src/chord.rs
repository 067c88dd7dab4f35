//! Diatonic chord catalog for a key.
//!
//! Degree labels and qualities come from fixed per-mode tables. The stacked
//! intervals of each generated chord are checked against those tables in
//! debug builds.

use std::fmt;

use crate::key::{Key, Mode};
use crate::pitch::{normalize, PitchClass, PitchClassSet, Spelling};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordType {
    Triad,
    Seventh,
}

impl ChordType {
    pub fn name(&self) -> &'static str {
        match self {
            ChordType::Triad => "triad",
            ChordType::Seventh => "7th",
        }
    }

    /// Number of chord tones.
    pub fn size(&self) -> usize {
        match self {
            ChordType::Triad => 3,
            ChordType::Seventh => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Dominant7,
    Major7,
    Minor7,
    HalfDiminished7,
}

impl ChordQuality {
    /// Symbol suffix appended to the root name.
    pub fn suffix(&self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::HalfDiminished7 => "m7b5",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            ChordQuality::Major => "maj",
            ChordQuality::Minor => "min",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Dominant7 => "dom7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "min7",
            ChordQuality::HalfDiminished7 => "hdim7",
        }
    }

    /// Classify stacked intervals above the root (semitones to third, fifth
    /// and optionally seventh). Returns None for shapes outside the diatonic
    /// vocabulary.
    pub fn from_intervals(third: u8, fifth: u8, seventh: Option<u8>) -> Option<ChordQuality> {
        match (third, fifth, seventh) {
            (4, 7, None) => Some(ChordQuality::Major),
            (3, 7, None) => Some(ChordQuality::Minor),
            (3, 6, None) => Some(ChordQuality::Diminished),
            (4, 8, None) => Some(ChordQuality::Augmented),
            (4, 7, Some(10)) => Some(ChordQuality::Dominant7),
            (4, 7, Some(11)) => Some(ChordQuality::Major7),
            (3, 7, Some(10)) => Some(ChordQuality::Minor7),
            (3, 6, Some(10)) => Some(ChordQuality::HalfDiminished7),
            _ => None,
        }
    }
}

// (degree label, quality) per scale degree.
const MAJOR_TRIADS: [(&str, ChordQuality); 7] = [
    ("I", ChordQuality::Major),
    ("ii", ChordQuality::Minor),
    ("iii", ChordQuality::Minor),
    ("IV", ChordQuality::Major),
    ("V", ChordQuality::Major),
    ("vi", ChordQuality::Minor),
    ("vii°", ChordQuality::Diminished),
];

const MINOR_TRIADS: [(&str, ChordQuality); 7] = [
    ("i", ChordQuality::Minor),
    ("ii°", ChordQuality::Diminished),
    ("III", ChordQuality::Major),
    ("iv", ChordQuality::Minor),
    ("v", ChordQuality::Minor),
    ("VI", ChordQuality::Major),
    ("VII", ChordQuality::Major),
];

const MAJOR_SEVENTHS: [(&str, ChordQuality); 7] = [
    ("I", ChordQuality::Major7),
    ("ii", ChordQuality::Minor7),
    ("iii", ChordQuality::Minor7),
    ("IV", ChordQuality::Major7),
    ("V", ChordQuality::Dominant7),
    ("vi", ChordQuality::Minor7),
    ("viiø", ChordQuality::HalfDiminished7),
];

const MINOR_SEVENTHS: [(&str, ChordQuality); 7] = [
    ("i", ChordQuality::Minor7),
    ("iiø", ChordQuality::HalfDiminished7),
    ("III", ChordQuality::Major7),
    ("iv", ChordQuality::Minor7),
    ("v", ChordQuality::Minor7),
    ("VI", ChordQuality::Major7),
    ("VII", ChordQuality::Dominant7),
];

fn degree_table(mode: Mode, chord_type: ChordType) -> &'static [(&'static str, ChordQuality); 7] {
    match (mode, chord_type) {
        (Mode::Major, ChordType::Triad) => &MAJOR_TRIADS,
        (Mode::Minor, ChordType::Triad) => &MINOR_TRIADS,
        (Mode::Major, ChordType::Seventh) => &MAJOR_SEVENTHS,
        (Mode::Minor, ChordType::Seventh) => &MINOR_SEVENTHS,
    }
}

/// Identity of a catalog entry, scoped to the key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChordId {
    pub mode: Mode,
    pub tonic: PitchClass,
    pub chord_type: ChordType,
    /// Scale degree index, 0..=6.
    pub degree: u8,
}

impl fmt::Display for ChordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.mode.name(),
            self.tonic.get(),
            self.chord_type.name(),
            self.degree
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiatonicChord {
    pub id: ChordId,
    pub root: PitchClass,
    /// Chord tones in stacking order: root, third, fifth and, for sevenths, seventh.
    pub tones: Vec<PitchClass>,
    /// The tones as a canonical set, used for matching.
    pub pcs: PitchClassSet,
    /// Roman numeral, e.g. "V" or "viiø".
    pub degree: &'static str,
    pub quality: ChordQuality,
    pub chord_type: ChordType,
}

impl DiatonicChord {
    pub fn third(&self) -> PitchClass {
        self.tones[1]
    }

    pub fn fifth(&self) -> PitchClass {
        self.tones[2]
    }

    pub fn seventh(&self) -> Option<PitchClass> {
        self.tones.get(3).copied()
    }

    /// Root name plus quality suffix, e.g. "Cmaj7", "Dm", "Bbm7b5".
    pub fn display_name(&self, spelling: Spelling) -> String {
        format!("{}{}", self.root.name(spelling), self.quality.suffix())
    }
}

/// Free-function form of [`DiatonicChord::display_name`].
pub fn display_name(chord: &DiatonicChord, spelling: Spelling) -> String {
    chord.display_name(spelling)
}

fn build_chord(key: Key, rotated: &[PitchClass; 7], degree: u8, chord_type: ChordType) -> DiatonicChord {
    let tones: Vec<PitchClass> = [0, 2, 4, 6]
        .iter()
        .take(chord_type.size())
        .map(|&i| rotated[i])
        .collect();
    let (label, quality) = degree_table(key.mode, chord_type)[degree as usize];

    let root = tones[0];
    debug_assert_eq!(
        ChordQuality::from_intervals(
            root.interval_to(tones[1]),
            root.interval_to(tones[2]),
            tones.get(3).map(|s| root.interval_to(*s)),
        ),
        Some(quality),
        "degree table disagrees with stacked intervals for {} degree {}",
        key.name(),
        degree
    );

    DiatonicChord {
        id: ChordId {
            mode: key.mode,
            tonic: key.tonic,
            chord_type,
            degree,
        },
        root,
        pcs: normalize(tones.iter().map(|pc| pc.get() as i32)),
        tones,
        degree: label,
        quality,
        chord_type,
    }
}

/// Build the 14 diatonic chords of a key: for each degree 0..=6 the triad
/// followed by the seventh chord.
pub fn build_diatonic_chords(key: Key) -> Vec<DiatonicChord> {
    let scale = key.scale();
    let mut chords = Vec::with_capacity(14);
    for degree in 0..7u8 {
        let mut rotated = scale;
        rotated.rotate_left(degree as usize);
        chords.push(build_chord(key, &rotated, degree, ChordType::Triad));
        chords.push(build_chord(key, &rotated, degree, ChordType::Seventh));
    }
    chords
}
