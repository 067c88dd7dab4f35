use crate::pitch::{parse_tonic, PitchClass, Spelling};

/// Scale mode of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Major,
    /// Natural (Aeolian) minor.
    Minor,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Major, Mode::Minor];

    /// Semitone steps between consecutive scale degrees.
    pub fn steps(&self) -> [u8; 7] {
        match self {
            Mode::Major => [2, 2, 1, 2, 2, 2, 1],
            Mode::Minor => [2, 1, 2, 2, 1, 2, 2],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }

    pub fn parse(s: &str) -> Option<Mode> {
        match s.trim().to_lowercase().as_str() {
            "major" | "maj" | "ionian" => Some(Mode::Major),
            "minor" | "min" | "aeolian" => Some(Mode::Minor),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Mode {
        match self {
            Mode::Major => Mode::Minor,
            Mode::Minor => Mode::Major,
        }
    }
}

/// A tonic plus a mode. Defaults to C major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Key {
    pub tonic: PitchClass,
    pub mode: Mode,
}

impl Key {
    pub fn new(tonic: PitchClass, mode: Mode) -> Self {
        Self { tonic, mode }
    }

    /// Parse a tonic spelling ("Eb", "F#") together with a mode.
    pub fn parse(tonic: &str, mode: Mode) -> Option<Key> {
        parse_tonic(tonic).map(|t| Key::new(t, mode))
    }

    /// The seven scale pitch classes starting at the tonic.
    pub fn scale(&self) -> [PitchClass; 7] {
        let mut scale = [self.tonic; 7];
        let steps = self.mode.steps();
        for i in 1..7 {
            scale[i] = scale[i - 1].transpose(steps[i - 1] as i32);
        }
        scale
    }

    pub fn spelling(&self) -> Spelling {
        Spelling::for_tonic(self.tonic)
    }

    /// E.g. "C major", "Eb minor".
    pub fn name(&self) -> String {
        format!("{} {}", self.tonic.name(self.spelling()), self.mode.name())
    }

    pub fn with_tonic_shifted(&self, semitones: i32) -> Key {
        Key::new(self.tonic.transpose(semitones), self.mode)
    }

    pub fn with_mode(&self, mode: Mode) -> Key {
        Key::new(self.tonic, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(scale: [PitchClass; 7]) -> Vec<u8> {
        scale.iter().map(|pc| pc.get()).collect()
    }

    #[test]
    fn c_major_scale() {
        assert_eq!(values(Key::default().scale()), vec![0, 2, 4, 5, 7, 9, 11]);
    }

    #[test]
    fn a_minor_scale() {
        let key = Key::new(PitchClass::from_note(9), Mode::Minor);
        assert_eq!(values(key.scale()), vec![9, 11, 0, 2, 4, 5, 7]);
    }

    #[test]
    fn steps_span_an_octave() {
        for mode in Mode::ALL {
            let total: u32 = mode.steps().iter().map(|s| *s as u32).sum();
            assert_eq!(total, 12);
        }
    }

    #[test]
    fn scales_have_seven_distinct_classes() {
        for mode in Mode::ALL {
            for tonic in PitchClass::ALL {
                let mut v = values(Key::new(tonic, mode).scale());
                v.sort();
                v.dedup();
                assert_eq!(v.len(), 7);
            }
        }
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::default().name(), "C major");
        assert_eq!(Key::new(PitchClass::from_note(3), Mode::Minor).name(), "Eb minor");
        assert_eq!(Key::new(PitchClass::from_note(9), Mode::Minor).name(), "A minor");
    }

    #[test]
    fn parse_key_and_mode() {
        assert_eq!(
            Key::parse("Bb", Mode::Major),
            Some(Key::new(PitchClass::from_note(10), Mode::Major))
        );
        assert_eq!(Key::parse("X", Mode::Major), None);
        assert_eq!(Mode::parse("Minor"), Some(Mode::Minor));
        assert_eq!(Mode::parse("major"), Some(Mode::Major));
        assert_eq!(Mode::parse("dorian"), None);
    }

    #[test]
    fn tonic_shift_wraps() {
        let b = Key::new(PitchClass::from_note(11), Mode::Major);
        assert_eq!(b.with_tonic_shifted(1).tonic, PitchClass::C);
        assert_eq!(Key::default().with_tonic_shifted(-1).tonic.get(), 11);
    }

    #[test]
    fn mode_toggle() {
        assert_eq!(Mode::Major.toggled(), Mode::Minor);
        assert_eq!(Mode::Minor.toggled(), Mode::Major);
    }
}
