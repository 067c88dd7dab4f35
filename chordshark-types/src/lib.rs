//! # chordshark-types
//!
//! Music theory for the chordshark trainer: pitch classes, keys, the diatonic
//! chord catalog, exact-match recognition, inversion labels and chord names.
//! Everything here is pure and total; there is no I/O.

pub mod chord;
pub mod key;
pub mod pitch;
pub mod recognize;

pub use chord::{build_diatonic_chords, display_name, ChordId, ChordQuality, ChordType, DiatonicChord};
pub use key::{Key, Mode};
pub use pitch::{
    normalize, note_name_with_octave, parse_tonic, pitch_class_names, PitchClass, PitchClassSet,
    Spelling,
};
pub use recognize::{detect_inversion, recognize, Inversion, RecognitionResult};
