use std::time::Duration;

use serde::Deserialize;

use chordshark_types::{parse_tonic, Key, Mode};

use crate::practice::ChordFilter;
use crate::recognition::RecognitionSettings;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    recognition: RecognitionConfig,
    #[serde(default)]
    practice: PracticeConfig,
    #[serde(default)]
    midi: MidiConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    key: Option<String>,
    mode: Option<String>,
}

#[derive(Deserialize, Default)]
struct RecognitionConfig {
    debounce_ms: Option<u64>,
    min_pitch_classes: Option<usize>,
}

#[derive(Deserialize, Default)]
struct PracticeConfig {
    advance_ms: Option<u64>,
    filter: Option<String>,
}

#[derive(Deserialize, Default)]
struct MidiConfig {
    auto_connect: Option<bool>,
}

pub struct Config {
    defaults: DefaultsConfig,
    recognition: RecognitionConfig,
    practice: PracticeConfig,
    midi: MidiConfig,
}

impl Config {
    /// Embedded defaults merged with the user's config file, if any.
    pub fn load() -> Self {
        let path = crate::paths::user_config_path();
        let user = if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => Some(contents),
                Err(e) => {
                    log::warn!(target: "config", "could not read config {}: {}", path.display(), e);
                    None
                }
            }
        } else {
            None
        };
        Self::with_user_toml(user.as_deref())
    }

    /// Embedded defaults merged with `user`. Malformed input is logged and ignored.
    pub fn with_user_toml(user: Option<&str>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(contents) = user {
            match toml::from_str::<ConfigFile>(contents) {
                Ok(user) => {
                    merge_defaults(&mut base.defaults, user.defaults);
                    merge_recognition(&mut base.recognition, user.recognition);
                    merge_practice(&mut base.practice, user.practice);
                    merge_midi(&mut base.midi, user.midi);
                }
                Err(e) => log::warn!(target: "config", "ignoring malformed user config: {}", e),
            }
        }

        Config {
            defaults: base.defaults,
            recognition: base.recognition,
            practice: base.practice,
            midi: base.midi,
        }
    }

    /// Key used when no preference has been stored.
    pub fn default_key(&self) -> Key {
        let fallback = Key::default();
        let tonic = self
            .defaults
            .key
            .as_deref()
            .and_then(parse_tonic)
            .unwrap_or(fallback.tonic);
        let mode = self
            .defaults
            .mode
            .as_deref()
            .and_then(Mode::parse)
            .unwrap_or(fallback.mode);
        Key::new(tonic, mode)
    }

    /// Debounce clamped to 0..=1000 ms, minimum pitch classes to 1..=4.
    pub fn recognition_settings(&self) -> RecognitionSettings {
        let fallback = RecognitionSettings::default();
        RecognitionSettings {
            debounce: self
                .recognition
                .debounce_ms
                .map(|ms| Duration::from_millis(ms.min(1000)))
                .unwrap_or(fallback.debounce),
            min_pitch_classes: self
                .recognition
                .min_pitch_classes
                .map(|n| n.clamp(1, 4))
                .unwrap_or(fallback.min_pitch_classes),
        }
    }

    /// Delay before the next practice target, clamped to 100..=10000 ms.
    pub fn practice_advance(&self) -> Duration {
        Duration::from_millis(self.practice.advance_ms.unwrap_or(1500).clamp(100, 10_000))
    }

    pub fn practice_filter(&self) -> ChordFilter {
        self.practice
            .filter
            .as_deref()
            .and_then(ChordFilter::parse)
            .unwrap_or_default()
    }

    pub fn midi_auto_connect(&self) -> bool {
        self.midi.auto_connect.unwrap_or(true)
    }
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.key.is_some() {
        base.key = user.key;
    }
    if user.mode.is_some() {
        base.mode = user.mode;
    }
}

fn merge_recognition(base: &mut RecognitionConfig, user: RecognitionConfig) {
    if user.debounce_ms.is_some() {
        base.debounce_ms = user.debounce_ms;
    }
    if user.min_pitch_classes.is_some() {
        base.min_pitch_classes = user.min_pitch_classes;
    }
}

fn merge_practice(base: &mut PracticeConfig, user: PracticeConfig) {
    if user.advance_ms.is_some() {
        base.advance_ms = user.advance_ms;
    }
    if user.filter.is_some() {
        base.filter = user.filter;
    }
}

fn merge_midi(base: &mut MidiConfig, user: MidiConfig) {
    if user.auto_connect.is_some() {
        base.auto_connect = user.auto_connect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordshark_types::PitchClass;

    #[test]
    fn test_embedded_defaults() {
        let config = Config::with_user_toml(None);
        assert_eq!(config.default_key(), Key::default());
        let settings = config.recognition_settings();
        assert_eq!(settings.debounce, Duration::from_millis(120));
        assert_eq!(settings.min_pitch_classes, 3);
        assert_eq!(config.practice_advance(), Duration::from_millis(1500));
        assert_eq!(config.practice_filter(), ChordFilter::All);
        assert!(config.midi_auto_connect());
    }

    #[test]
    fn test_user_overrides_single_fields() {
        let config = Config::with_user_toml(Some(
            r#"
            [defaults]
            key = "Eb"

            [practice]
            filter = "seventh"
            "#,
        ));
        let key = config.default_key();
        assert_eq!(key.tonic, PitchClass::from_note(3));
        assert_eq!(key.mode, Mode::Major);
        assert_eq!(config.practice_filter(), ChordFilter::Seventh);
        assert_eq!(config.practice_advance(), Duration::from_millis(1500));
    }

    #[test]
    fn test_values_are_clamped() {
        let config = Config::with_user_toml(Some(
            r#"
            [recognition]
            debounce_ms = 5000
            min_pitch_classes = 9

            [practice]
            advance_ms = 1
            "#,
        ));
        let settings = config.recognition_settings();
        assert_eq!(settings.debounce, Duration::from_millis(1000));
        assert_eq!(settings.min_pitch_classes, 4);
        assert_eq!(config.practice_advance(), Duration::from_millis(100));
    }

    #[test]
    fn test_malformed_user_config_is_ignored() {
        let config = Config::with_user_toml(Some("[recognition\ndebounce_ms = "));
        assert_eq!(config.recognition_settings(), RecognitionSettings::default());
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let config = Config::with_user_toml(Some(
            r#"
            [defaults]
            key = "H"
            mode = "lydian"

            [practice]
            filter = "ninths"

            [midi]
            auto_connect = false
            "#,
        ));
        assert_eq!(config.default_key(), Key::default());
        assert_eq!(config.practice_filter(), ChordFilter::All);
        assert!(!config.midi_auto_connect());
    }
}
