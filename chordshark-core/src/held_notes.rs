use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use chordshark_types::{normalize, PitchClassSet};

use crate::midi::MidiEventKind;

/// How long the activity lamp stays lit after a MIDI event.
pub const ACTIVITY_WINDOW: Duration = Duration::from_millis(160);

/// The set of currently held note numbers, fed by note-on/note-off events.
#[derive(Debug, Clone, Default)]
pub struct HeldNotes {
    notes: BTreeSet<u8>,
    last_event: Option<Instant>,
}

impl HeldNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns true if the held set changed.
    pub fn apply(&mut self, kind: &MidiEventKind, now: Instant) -> bool {
        self.last_event = Some(now);
        match *kind {
            MidiEventKind::NoteOn { note, .. } => self.notes.insert(note),
            MidiEventKind::NoteOff { note, .. } => self.notes.remove(&note),
            MidiEventKind::AllNotesOff { .. } => {
                let changed = !self.notes.is_empty();
                self.notes.clear();
                changed
            }
        }
    }

    /// Drop every held note, e.g. when switching input devices.
    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Held notes in ascending order.
    pub fn notes(&self) -> Vec<u8> {
        self.notes.iter().copied().collect()
    }

    pub fn pitch_classes(&self) -> PitchClassSet {
        normalize(self.notes.iter().copied())
    }

    /// True shortly after any MIDI event, held or not.
    pub fn recent_activity(&self, now: Instant) -> bool {
        self.last_event
            .is_some_and(|t| now.saturating_duration_since(t) < ACTIVITY_WINDOW)
    }

    /// When the activity lamp will go dark, if it is lit.
    pub fn activity_deadline(&self, now: Instant) -> Option<Instant> {
        let t = self.last_event? + ACTIVITY_WINDOW;
        (t > now).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(note: u8) -> MidiEventKind {
        MidiEventKind::NoteOn {
            channel: 0,
            note,
            velocity: 90,
        }
    }

    fn off(note: u8) -> MidiEventKind {
        MidiEventKind::NoteOff { channel: 0, note }
    }

    #[test]
    fn note_on_adds_and_note_off_removes() {
        let now = Instant::now();
        let mut held = HeldNotes::new();
        assert!(held.apply(&on(67), now));
        assert!(held.apply(&on(60), now));
        assert!(held.apply(&on(64), now));
        assert_eq!(held.notes(), vec![60, 64, 67]);
        assert!(held.apply(&off(64), now));
        assert_eq!(held.notes(), vec![60, 67]);
    }

    #[test]
    fn repeated_events_do_not_change_the_set() {
        let now = Instant::now();
        let mut held = HeldNotes::new();
        held.apply(&on(60), now);
        assert!(!held.apply(&on(60), now));
        assert!(!held.apply(&off(61), now));
    }

    #[test]
    fn all_notes_off_clears() {
        let now = Instant::now();
        let mut held = HeldNotes::new();
        held.apply(&on(60), now);
        held.apply(&on(72), now);
        assert!(held.apply(&MidiEventKind::AllNotesOff { channel: 0 }, now));
        assert!(held.is_empty());
        assert!(!held.apply(&MidiEventKind::AllNotesOff { channel: 0 }, now));
    }

    #[test]
    fn pitch_classes_collapse_octaves() {
        let now = Instant::now();
        let mut held = HeldNotes::new();
        for n in [48, 60, 64, 79] {
            held.apply(&on(n), now);
        }
        assert_eq!(held.pitch_classes().values(), vec![0, 4, 7]);
    }

    #[test]
    fn activity_lamp_times_out() {
        let t0 = Instant::now();
        let mut held = HeldNotes::new();
        assert!(!held.recent_activity(t0));
        held.apply(&off(60), t0);
        assert!(held.recent_activity(t0 + Duration::from_millis(100)));
        assert!(!held.recent_activity(t0 + ACTIVITY_WINDOW));
        assert_eq!(held.activity_deadline(t0), Some(t0 + ACTIVITY_WINDOW));
        assert_eq!(held.activity_deadline(t0 + ACTIVITY_WINDOW), None);
    }
}
