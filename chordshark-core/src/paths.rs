use std::path::PathBuf;

/// Resolve the per-user chordshark directory.
///
/// Fallback chain:
/// 1. `CHORDSHARK_CONFIG_DIR` env var (runtime override)
/// 2. `dirs::config_dir()/chordshark`
/// 3. `chordshark` in the system temp dir
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHORDSHARK_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .map(|d| d.join("chordshark"))
        .unwrap_or_else(|| std::env::temp_dir().join("chordshark"))
}

/// User config overriding the embedded defaults.
pub fn user_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn prefs_path() -> PathBuf {
    config_dir().join("prefs.json")
}

pub fn log_path() -> PathBuf {
    config_dir().join("chordshark.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_config_dir() {
        let dir = config_dir();
        assert_eq!(user_config_path().parent(), Some(dir.as_path()));
        assert!(prefs_path().ends_with("prefs.json"));
        assert!(log_path().ends_with("chordshark.log"));
    }
}
