//! Small persisted user choices: the selected key and the last input device.
//!
//! Storage failures never reach the caller. An unreadable file behaves like
//! an empty one and a failed write is logged and dropped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chordshark_types::{Key, Mode, PitchClass};

pub const KEY_TONIC: &str = "selectedKeyTonicPc";
pub const KEY_MODE: &str = "selectedKeyMode";
pub const KEY_MIDI_INPUT: &str = "selectedMidiInputId";

/// String key/value storage behind [`Preferences`].
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// JSON object on disk, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!(target: "prefs", "ignoring malformed {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    /// The store at the default location under the user config dir.
    pub fn load_default() -> Self {
        Self::load(crate::paths::prefs_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let result = serde_json::to_string_pretty(&self.values)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&self.path, json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            log::warn!(target: "prefs", "could not save {}: {}", self.path.display(), e);
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.save();
    }
}

/// Typed view over a [`PreferenceStore`].
pub struct Preferences<S: PreferenceStore> {
    store: S,
    default_key: Key,
}

impl<S: PreferenceStore> Preferences<S> {
    pub fn new(store: S, default_key: Key) -> Self {
        Self { store, default_key }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored key. Tonic and mode each fall back to the default on their own.
    pub fn key(&self) -> Key {
        let tonic = self
            .store
            .get(KEY_TONIC)
            .and_then(|s| s.trim().parse::<u8>().ok())
            .and_then(PitchClass::new)
            .unwrap_or(self.default_key.tonic);
        let mode = match self.store.get(KEY_MODE).as_deref() {
            Some("major") => Mode::Major,
            Some("minor") => Mode::Minor,
            _ => self.default_key.mode,
        };
        Key::new(tonic, mode)
    }

    pub fn set_key(&mut self, key: Key) {
        self.store.set(KEY_TONIC, &key.tonic.get().to_string());
        self.store.set(KEY_MODE, key.mode.name());
    }

    pub fn midi_input(&self) -> Option<String> {
        self.store.get(KEY_MIDI_INPUT).filter(|s| !s.is_empty())
    }

    /// `None` leaves the stored value alone. An empty id clears it.
    pub fn set_midi_input(&mut self, id: Option<&str>) {
        if let Some(id) = id {
            self.store.set(KEY_MIDI_INPUT, id);
        }
    }

    pub fn clear_midi_input(&mut self) {
        self.store.set(KEY_MIDI_INPUT, "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> Preferences<MemoryPreferenceStore> {
        Preferences::new(MemoryPreferenceStore::new(), Key::default())
    }

    #[test]
    fn empty_store_yields_default_key() {
        assert_eq!(prefs().key(), Key::default());
        let fallback = Key::new(PitchClass::from_note(7), Mode::Minor);
        let p = Preferences::new(MemoryPreferenceStore::new(), fallback);
        assert_eq!(p.key(), fallback);
    }

    #[test]
    fn key_round_trips() {
        let mut p = prefs();
        let key = Key::new(PitchClass::from_note(3), Mode::Minor);
        p.set_key(key);
        assert_eq!(p.key(), key);
        assert_eq!(p.store().get(KEY_TONIC).as_deref(), Some("3"));
        assert_eq!(p.store().get(KEY_MODE).as_deref(), Some("minor"));
    }

    #[test]
    fn invalid_values_fall_back_independently() {
        let mut store = MemoryPreferenceStore::new();
        store.set(KEY_TONIC, "12");
        store.set(KEY_MODE, "minor");
        let p = Preferences::new(store, Key::default());
        assert_eq!(p.key(), Key::new(PitchClass::C, Mode::Minor));

        let mut store = MemoryPreferenceStore::new();
        store.set(KEY_TONIC, "9");
        store.set(KEY_MODE, "dorian");
        let p = Preferences::new(store, Key::default());
        assert_eq!(p.key(), Key::new(PitchClass::from_note(9), Mode::Major));

        let mut store = MemoryPreferenceStore::new();
        store.set(KEY_TONIC, "-1");
        let p = Preferences::new(store, Key::default());
        assert_eq!(p.key().tonic, PitchClass::C);
    }

    #[test]
    fn midi_input_none_is_noop_and_empty_clears() {
        let mut p = prefs();
        assert_eq!(p.midi_input(), None);
        p.set_midi_input(Some("Keystation 49"));
        assert_eq!(p.midi_input().as_deref(), Some("Keystation 49"));
        p.set_midi_input(None);
        assert_eq!(p.midi_input().as_deref(), Some("Keystation 49"));
        p.set_midi_input(Some(""));
        assert_eq!(p.midi_input(), None);
        p.set_midi_input(Some("Other"));
        p.clear_midi_input();
        assert_eq!(p.midi_input(), None);
    }

    #[test]
    fn file_store_persists_between_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut p = Preferences::new(FilePreferenceStore::load(&path), Key::default());
        p.set_key(Key::new(PitchClass::from_note(10), Mode::Major));
        p.set_midi_input(Some("IAC Driver Bus 1"));
        assert!(path.exists());

        let p = Preferences::new(FilePreferenceStore::load(&path), Key::default());
        assert_eq!(p.key().tonic.get(), 10);
        assert_eq!(p.midi_input().as_deref(), Some("IAC Driver Bus 1"));
    }

    #[test]
    fn file_store_tolerates_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FilePreferenceStore::load(dir.path().join("absent.json"));
        assert_eq!(missing.get(KEY_MODE), None);

        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").unwrap();
        let mut store = FilePreferenceStore::load(&path);
        assert_eq!(store.get(KEY_TONIC), None);
        store.set(KEY_TONIC, "5");
        assert_eq!(FilePreferenceStore::load(&path).get(KEY_TONIC).as_deref(), Some("5"));
    }

    #[test]
    fn file_store_write_failure_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be makes the write fail
        let path = dir.path().join("prefs.json");
        std::fs::create_dir(&path).unwrap();
        let mut store = FilePreferenceStore::load(&path);
        store.set(KEY_MODE, "minor");
        assert_eq!(store.get(KEY_MODE).as_deref(), Some("minor"));
    }
}
