//! Everything the screen shows, minus the MIDI port itself.

use std::time::Instant;

use chordshark_core::config::Config;
use chordshark_core::held_notes::HeldNotes;
use chordshark_core::midi::MidiEvent;
use chordshark_core::practice::PracticeSession;
use chordshark_core::prefs::{PreferenceStore, Preferences};
use chordshark_core::recognition::{RecognitionEngine, RecognitionState};
use chordshark_core::timer::earliest;
use chordshark_types::Key;

pub struct Trainer<S: PreferenceStore> {
    engine: RecognitionEngine,
    held: HeldNotes,
    practice: PracticeSession,
    prefs: Preferences<S>,
}

impl<S: PreferenceStore> Trainer<S> {
    /// Start in the stored key, or the configured default.
    pub fn new(config: &Config, prefs: Preferences<S>, seed: u64) -> Self {
        let key = prefs.key();
        log::info!("starting in {}", key.name());
        Self {
            engine: RecognitionEngine::new(key, config.recognition_settings()),
            held: HeldNotes::new(),
            practice: PracticeSession::new(config.practice_filter(), config.practice_advance(), seed),
            prefs,
        }
    }

    pub fn key(&self) -> Key {
        self.engine.key()
    }

    pub fn engine(&self) -> &RecognitionEngine {
        &self.engine
    }

    pub fn held(&self) -> &HeldNotes {
        &self.held
    }

    pub fn practice(&self) -> &PracticeSession {
        &self.practice
    }

    pub fn prefs(&self) -> &Preferences<S> {
        &self.prefs
    }

    pub fn prefs_mut(&mut self) -> &mut Preferences<S> {
        &mut self.prefs
    }

    /// Feed drained MIDI events. Returns true if the held set changed.
    pub fn apply_midi(&mut self, events: &[MidiEvent], now: Instant) -> bool {
        let mut changed = false;
        for event in events {
            changed |= self.held.apply(&event.kind, now);
        }
        if changed {
            self.engine.update_held(&self.held.notes(), now);
        }
        changed
    }

    /// Forget held notes, e.g. after switching devices.
    pub fn clear_held(&mut self, now: Instant) {
        self.held.clear();
        self.engine.update_held(&[], now);
    }

    pub fn shift_tonic(&mut self, semitones: i32, now: Instant) {
        let key = self.key().with_tonic_shifted(semitones);
        self.set_key(key, now);
    }

    pub fn toggle_mode(&mut self, now: Instant) {
        let key = self.key();
        self.set_key(key.with_mode(key.mode.toggled()), now);
    }

    /// Change key, re-evaluate held notes, re-pick the practice target and persist.
    pub fn set_key(&mut self, key: Key, now: Instant) {
        if key == self.key() {
            return;
        }
        self.engine.set_key(key, now);
        self.practice.on_key_changed(self.engine.catalog());
        self.score_held(now);
        self.prefs.set_key(key);
    }

    /// Start or stop practice. A chord already held counts against a new target.
    pub fn toggle_practice(&mut self, now: Instant) {
        if self.practice.is_active() {
            self.practice.stop();
        } else {
            self.practice.start(self.engine.catalog());
            self.score_held(now);
        }
    }

    /// Cycle the practice filter. Ignored while a session runs.
    pub fn cycle_filter(&mut self) {
        let next = self.practice.filter().next();
        self.practice.set_filter(next);
    }

    /// Fire due timers. Returns true if anything visible changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = self.engine.poll(now);
        changed |= self.practice.poll(self.engine.catalog(), now);
        changed |= self.score_held(now);
        changed
    }

    /// Report the recognized chord, if any, to practice. True on a hit.
    fn score_held(&mut self, now: Instant) -> bool {
        if self.engine.state() != RecognitionState::Success {
            return false;
        }
        match &self.engine.result().chord {
            Some(chord) => self.practice.on_recognized(chord.id, now),
            None => false,
        }
    }

    /// Nearest pending deadline, including the activity lamp going dark.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        earliest(&[
            self.engine.next_deadline(),
            self.practice.next_deadline(),
            self.held.activity_deadline(now),
        ])
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
        if self.practice.is_active() {
            self.practice.stop();
        }
    }
}
