//! Pitch classes, canonical pitch-class sets, and note spelling.

use std::fmt;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// A pitch reduced modulo the octave (0 = C, 11 = B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// All twelve pitch classes in ascending order.
    pub const ALL: [PitchClass; 12] = [
        PitchClass(0),
        PitchClass(1),
        PitchClass(2),
        PitchClass(3),
        PitchClass(4),
        PitchClass(5),
        PitchClass(6),
        PitchClass(7),
        PitchClass(8),
        PitchClass(9),
        PitchClass(10),
        PitchClass(11),
    ];

    /// Reduce an absolute note number. Negative notes wrap upward, so -1 is B.
    pub fn from_note(note: i32) -> Self {
        PitchClass(note.rem_euclid(12) as u8)
    }

    /// Pitch class from a raw value already in 0..=11.
    pub fn new(pc: u8) -> Option<Self> {
        (pc < 12).then_some(PitchClass(pc))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_note(self.0 as i32 + semitones)
    }

    /// Upward distance in semitones from `self` to `other` (0..=11).
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 + 12 - self.0) % 12
    }

    pub fn name(self, spelling: Spelling) -> &'static str {
        match spelling {
            Spelling::Sharps => SHARP_NAMES[self.0 as usize],
            Spelling::Flats => FLAT_NAMES[self.0 as usize],
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(Spelling::Sharps))
    }
}

/// Canonical set of pitch classes: ascending, no duplicates.
///
/// Two inputs that are permutations or octave doublings of the same pitches
/// normalize to equal sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PitchClassSet(Vec<PitchClass>);

impl PitchClassSet {
    pub fn as_slice(&self) -> &[PitchClass] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, pc: PitchClass) -> bool {
        self.0.binary_search(&pc).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = PitchClass> + '_ {
        self.0.iter().copied()
    }

    /// Raw values, mostly for display and tests.
    pub fn values(&self) -> Vec<u8> {
        self.0.iter().map(|pc| pc.get()).collect()
    }
}

impl FromIterator<PitchClass> for PitchClassSet {
    fn from_iter<I: IntoIterator<Item = PitchClass>>(iter: I) -> Self {
        normalize(iter.into_iter().map(|pc| pc.get() as i32))
    }
}

/// Normalize absolute note numbers (or raw pitch classes) into a canonical set.
///
/// Accepts any integers, including negative and out-of-range values, in any
/// order and with duplicates.
pub fn normalize<I>(notes: I) -> PitchClassSet
where
    I: IntoIterator,
    I::Item: Into<i32>,
{
    let mut present = [false; 12];
    for note in notes {
        present[PitchClass::from_note(note.into()).get() as usize] = true;
    }
    PitchClassSet(
        PitchClass::ALL
            .iter()
            .copied()
            .filter(|pc| present[pc.get() as usize])
            .collect(),
    )
}

/// Whether note names are spelled with sharps or flats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Spelling {
    #[default]
    Sharps,
    Flats,
}

impl Spelling {
    /// Flat-preferred tonics are Db, Eb, Gb, Ab and Bb; the mode does not matter.
    pub fn for_tonic(tonic: PitchClass) -> Self {
        match tonic.get() {
            1 | 3 | 6 | 8 | 10 => Spelling::Flats,
            _ => Spelling::Sharps,
        }
    }
}

pub fn pitch_class_names(set: &PitchClassSet, spelling: Spelling) -> Vec<&'static str> {
    set.iter().map(|pc| pc.name(spelling)).collect()
}

/// Name an absolute MIDI note with its octave, e.g. 60 -> "C4".
pub fn note_name_with_octave(note: i32, spelling: Spelling) -> String {
    let octave = note.div_euclid(12) - 1;
    format!("{}{}", PitchClass::from_note(note).name(spelling), octave)
}

/// Parse a tonic like "C", "F#", "Fs", "Bb" or "eb".
pub fn parse_tonic(s: &str) -> Option<PitchClass> {
    let mut chars = s.trim().chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let base = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let mut offset = 0;
    for c in chars {
        match c {
            '#' | 's' | '♯' => offset += 1,
            'b' | '♭' => offset -= 1,
            _ => return None,
        }
    }
    Some(PitchClass::from_note(base + offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[i32]) -> Vec<u8> {
        normalize(values.iter().copied()).values()
    }

    #[test]
    fn normalize_sorts_and_dedupes() {
        assert_eq!(set(&[7, 11, 2]), vec![2, 7, 11]);
        assert_eq!(set(&[2, 7, 2, 11, 7]), vec![2, 7, 11]);
        assert_eq!(set(&[0, 12, 24]), vec![0]);
    }

    #[test]
    fn normalize_midi_notes() {
        // G4 B4 D4
        assert_eq!(set(&[67, 71, 62]), vec![2, 7, 11]);
        assert_eq!(set(&[60, 64, 67]), vec![0, 4, 7]);
    }

    #[test]
    fn normalize_negative_notes() {
        assert_eq!(set(&[-1]), vec![11]);
        assert_eq!(set(&[-13]), vec![11]);
        assert_eq!(set(&[-12, -24]), vec![0]);
    }

    #[test]
    fn normalize_empty() {
        assert!(normalize(Vec::<i32>::new()).is_empty());
    }

    #[test]
    fn normalize_accepts_u8_notes() {
        let notes: Vec<u8> = vec![64, 60, 67];
        assert_eq!(normalize(notes).values(), vec![0, 4, 7]);
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs: [&[i32]; 4] = [&[], &[5, -7, 130, 5], &[-100, 3, 27, 51], &[11, 10, 9, 0]];
        for input in inputs {
            let once = normalize(input.iter().copied());
            let twice = normalize(once.iter().map(|pc| pc.get() as i32));
            assert_eq!(once, twice, "input {:?}", input);
        }
    }

    #[test]
    fn normalize_octave_invariant() {
        for n in -30..30 {
            for k in -4..5 {
                assert_eq!(set(&[n]), set(&[n + 12 * k]), "n={} k={}", n, k);
            }
        }
    }

    #[test]
    fn normalize_order_invariant() {
        assert_eq!(set(&[60, 64, 67]), set(&[67, 60, 64]));
        assert_eq!(set(&[60, 64, 67]), set(&[64, 67, 60]));
        assert_eq!(set(&[-3, 50, 14]), set(&[14, -3, 50]));
    }

    #[test]
    fn pitch_class_set_contains() {
        let s = normalize([60, 64, 67]);
        assert!(s.contains(PitchClass::C));
        assert!(!s.contains(PitchClass::from_note(1)));
    }

    #[test]
    fn from_iterator_normalizes() {
        let s: PitchClassSet = [PitchClass::from_note(7), PitchClass::C, PitchClass::from_note(7)]
            .into_iter()
            .collect();
        assert_eq!(s.values(), vec![0, 7]);
    }

    #[test]
    fn interval_to_wraps() {
        let b = PitchClass::from_note(11);
        let d = PitchClass::from_note(2);
        assert_eq!(b.interval_to(d), 3);
        assert_eq!(d.interval_to(b), 9);
        assert_eq!(b.interval_to(b), 0);
    }

    #[test]
    fn spelling_for_tonic() {
        let flats: Vec<u8> = PitchClass::ALL
            .iter()
            .filter(|pc| Spelling::for_tonic(**pc) == Spelling::Flats)
            .map(|pc| pc.get())
            .collect();
        assert_eq!(flats, vec![1, 3, 6, 8, 10]);
    }

    #[test]
    fn names_follow_spelling() {
        let bb = PitchClass::from_note(10);
        assert_eq!(bb.name(Spelling::Flats), "Bb");
        assert_eq!(bb.name(Spelling::Sharps), "A#");
        assert_eq!(PitchClass::from_note(4).name(Spelling::Flats), "E");
    }

    #[test]
    fn held_note_names() {
        let s = normalize([61, 65, 68]);
        assert_eq!(pitch_class_names(&s, Spelling::Flats), vec!["Db", "F", "Ab"]);
        assert_eq!(pitch_class_names(&s, Spelling::Sharps), vec!["C#", "F", "G#"]);
    }

    #[test]
    fn octave_names() {
        assert_eq!(note_name_with_octave(60, Spelling::Sharps), "C4");
        assert_eq!(note_name_with_octave(69, Spelling::Sharps), "A4");
        assert_eq!(note_name_with_octave(0, Spelling::Sharps), "C-1");
        assert_eq!(note_name_with_octave(70, Spelling::Flats), "Bb4");
    }

    #[test]
    fn parse_tonics() {
        assert_eq!(parse_tonic("C"), Some(PitchClass::C));
        assert_eq!(parse_tonic("F#").map(PitchClass::get), Some(6));
        assert_eq!(parse_tonic("Fs").map(PitchClass::get), Some(6));
        assert_eq!(parse_tonic("Bb").map(PitchClass::get), Some(10));
        assert_eq!(parse_tonic("eb").map(PitchClass::get), Some(3));
        assert_eq!(parse_tonic("Cb").map(PitchClass::get), Some(11));
        assert_eq!(parse_tonic("H"), None);
        assert_eq!(parse_tonic("C7"), None);
        assert_eq!(parse_tonic(""), None);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert_eq!(PitchClass::new(11).map(PitchClass::get), Some(11));
        assert_eq!(PitchClass::new(12), None);
    }
}
