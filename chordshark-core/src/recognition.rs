//! Live recognition state machine.
//!
//! Held notes are debounced before a verdict is rendered so that a chord
//! whose notes land a few milliseconds apart does not flicker through
//! partial states. Releasing everything clears the display immediately.

use std::time::{Duration, Instant};

use chordshark_types::{build_diatonic_chords, normalize, DiatonicChord, Key, RecognitionResult};

use crate::timer::Deadline;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(120);
pub const DEFAULT_MIN_PITCH_CLASSES: usize = 3;

/// UI-facing recognition state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognitionState {
    /// No notes held.
    #[default]
    Idle,
    /// Notes held but still changing, or too few pitch classes for a verdict.
    Listening,
    /// A stable set matched a diatonic chord.
    Success,
    /// A stable set matched nothing in the key.
    Mismatch,
}

impl RecognitionState {
    pub fn name(&self) -> &'static str {
        match self {
            RecognitionState::Idle => "idle",
            RecognitionState::Listening => "listening",
            RecognitionState::Success => "success",
            RecognitionState::Mismatch => "mismatch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognitionSettings {
    pub debounce: Duration,
    pub min_pitch_classes: usize,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_pitch_classes: DEFAULT_MIN_PITCH_CLASSES,
        }
    }
}

/// Owns the key's chord catalog and turns a changing held-note set into a
/// [`RecognitionState`] plus the latest [`RecognitionResult`].
#[derive(Debug, Clone)]
pub struct RecognitionEngine {
    key: Key,
    catalog: Vec<DiatonicChord>,
    settings: RecognitionSettings,
    held: Vec<u8>,
    timer: Deadline,
    state: RecognitionState,
    result: RecognitionResult,
}

impl RecognitionEngine {
    pub fn new(key: Key, settings: RecognitionSettings) -> Self {
        Self {
            key,
            catalog: build_diatonic_chords(key),
            settings,
            held: Vec::new(),
            timer: Deadline::new(),
            state: RecognitionState::Idle,
            result: RecognitionResult::default(),
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn catalog(&self) -> &[DiatonicChord] {
        &self.catalog
    }

    pub fn settings(&self) -> RecognitionSettings {
        self.settings
    }

    pub fn state(&self) -> RecognitionState {
        self.state
    }

    pub fn result(&self) -> &RecognitionResult {
        &self.result
    }

    pub fn held(&self) -> &[u8] {
        &self.held
    }

    /// When the pending evaluation is due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.at()
    }

    /// Feed the current held-note set. Order and duplicates do not matter.
    pub fn update_held(&mut self, notes: &[u8], now: Instant) {
        let mut notes = notes.to_vec();
        notes.sort_unstable();
        notes.dedup();

        if notes.is_empty() {
            self.timer.cancel();
            self.held.clear();
            self.state = RecognitionState::Idle;
            self.result = RecognitionResult::default();
            return;
        }
        if notes == self.held {
            return;
        }

        self.held = notes;
        self.state = RecognitionState::Listening;
        self.result = RecognitionResult::default();
        self.timer.schedule(now, self.settings.debounce);
    }

    /// Switch keys. A non-empty held set is re-evaluated after the debounce window.
    pub fn set_key(&mut self, key: Key, now: Instant) {
        if key == self.key {
            return;
        }
        log::debug!(target: "recognition", "key changed to {}", key.name());
        self.key = key;
        self.catalog = build_diatonic_chords(key);
        if !self.held.is_empty() {
            self.state = RecognitionState::Listening;
            self.result = RecognitionResult::default();
            self.timer.schedule(now, self.settings.debounce);
        }
    }

    /// Fire the debounce timer if due. Returns true if state or result changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.timer.fire(now) {
            return false;
        }
        let (state, result) = (self.state, self.result.clone());
        self.evaluate();
        self.state != state || self.result != result
    }

    /// Cancel any pending evaluation, e.g. on shutdown.
    pub fn shutdown(&mut self) {
        self.timer.cancel();
    }

    fn evaluate(&mut self) {
        let pcs = normalize(self.held.iter().copied());
        if pcs.is_empty() {
            self.state = RecognitionState::Idle;
            self.result = RecognitionResult::default();
            return;
        }
        if pcs.len() < self.settings.min_pitch_classes {
            self.state = RecognitionState::Listening;
            self.result = RecognitionResult::default();
            return;
        }

        let notes: Vec<i32> = self.held.iter().map(|&n| n as i32).collect();
        self.result = RecognitionResult::evaluate(&notes, &self.catalog);
        self.state = if self.result.chord.is_some() {
            RecognitionState::Success
        } else {
            RecognitionState::Mismatch
        };

        match &self.result.chord {
            Some(chord) => log::debug!(
                target: "recognition",
                "{:?} -> {} ({})",
                self.held,
                chord.display_name(self.key.spelling()),
                self.result.inversion_label().unwrap_or("-")
            ),
            None => log::debug!(target: "recognition", "{:?} -> no diatonic match", self.held),
        }
    }
}
