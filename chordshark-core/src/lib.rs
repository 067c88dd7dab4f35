//! # chordshark-core
//!
//! Everything between the MIDI port and the screen: device input, held-note
//! tracking, the debounced recognition state machine, practice sessions,
//! configuration and persisted preferences. Independent of any UI framework.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Instant;
//! use chordshark_core::config::Config;
//! use chordshark_core::held_notes::HeldNotes;
//! use chordshark_core::midi::MidiInputManager;
//! use chordshark_core::recognition::RecognitionEngine;
//!
//! let config = Config::load();
//! let mut engine = RecognitionEngine::new(config.default_key(), config.recognition_settings());
//! let mut held = HeldNotes::new();
//! let mut midi = MidiInputManager::new();
//! midi.refresh_ports();
//! midi.connect(0)?;
//!
//! loop {
//!     let now = Instant::now();
//!     for event in midi.poll_events() {
//!         held.apply(&event.kind, now);
//!     }
//!     engine.update_held(&held.notes(), now);
//!     if engine.poll(now) {
//!         // redraw with engine.state() / engine.result()
//!     }
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`midi`]: `MidiInputManager` (midir) and raw message parsing
//! - [`held_notes`]: the held-note set and MIDI activity lamp
//! - [`recognition`]: `RecognitionEngine`: Idle / Listening / Success / Mismatch
//! - [`practice`]: "play this chord" sessions with filter and auto-advance
//! - [`config`]: TOML configuration (embedded defaults + user override)
//! - [`prefs`]: persisted key and device selection
//! - [`timer`]: single-slot deadlines driven by the caller's clock
//! - [`paths`]: per-user file locations

pub mod config;
pub mod held_notes;
pub mod midi;
pub mod paths;
pub mod practice;
pub mod prefs;
pub mod recognition;
pub mod timer;
