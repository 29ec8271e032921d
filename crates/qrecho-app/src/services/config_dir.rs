// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config directory resolution and settings persistence.

use std::path::{Path, PathBuf};

use qrecho_core::EchoConfig;
use qrecho_core::error::Result;
use tracing::{debug, info};

const APP_DIR: &str = "qrecho";
const CONFIG_FILE: &str = "config.json";

/// Default location of the settings file.
pub fn default_config_path() -> PathBuf {
    config_base(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
    )
    .join(APP_DIR)
    .join(CONFIG_FILE)
}

fn config_base(xdg: Option<String>, home: Option<String>) -> PathBuf {
    // XDG config dir, then ~/.config
    if let Some(xdg) = xdg.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home.filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".config");
    }
    std::env::temp_dir()
}

/// Read settings from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<EchoConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(EchoConfig::default());
    }
    let data = std::fs::read_to_string(path)?;
    let config: EchoConfig = serde_json::from_str(&data)?;
    config.validate()?;
    info!(path = %path.display(), "Config loaded");
    Ok(config)
}

/// Write settings to `path` as pretty JSON, creating parent directories.
pub fn persist_config(path: &Path, config: &EchoConfig) -> Result<()> {
    config.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "Config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrecho_core::QrEchoError;

    #[test]
    fn xdg_takes_precedence_over_home() {
        let base = config_base(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(base, PathBuf::from("/xdg"));
        let base = config_base(Some(String::new()), Some("/home/u".into()));
        assert_eq!(base, PathBuf::from("/home/u/.config"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, EchoConfig::default());
    }

    #[test]
    fn persisted_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut config = EchoConfig::default();
        config.binarizer.window_size = 15;
        config.binarizer.parallel = true;
        config.output_file = "echo.png".into();

        persist_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "binarizer": { "window_size": 21 } }"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.binarizer.window_size, 21);
        assert!(!config.binarizer.parallel);
        assert_eq!(config.output_file, "qrcode.png");
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "binarizer": { "window_size": 1 } }"#).unwrap();
        assert!(matches!(
            load_config(&path),
            Err(QrEchoError::InvalidWindowSize(1))
        ));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(QrEchoError::Serialization(_))
        ));
    }
}
