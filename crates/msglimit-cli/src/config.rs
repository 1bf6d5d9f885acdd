//! `msglimit.toml` loading.

use msglimit_core::{MsgLimitError, MsgLimitResult};
use msglimit_settings::SETTINGS_KEY;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct MsgLimitConfig {
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,
    #[serde(default = "default_extension_key")]
    pub extension_key: String,
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for MsgLimitConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            extension_key: default_extension_key(),
            save_debounce_ms: default_save_debounce_ms(),
            log_format: LogFormat::default(),
        }
    }
}

impl MsgLimitConfig {
    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    /// Resolves a relative settings path against the config file's directory.
    pub fn resolve_paths(&mut self, config_dir: &Path) {
        if self.settings_path.is_relative() {
            self.settings_path = config_dir.join(&self.settings_path);
        }
    }
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("./data/settings.json")
}
fn default_extension_key() -> String {
    SETTINGS_KEY.to_string()
}
fn default_save_debounce_ms() -> u64 {
    1000
}

/// Reads the config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> MsgLimitResult<MsgLimitConfig> {
    if !path.exists() {
        return Ok(MsgLimitConfig::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        MsgLimitError::Config(format!(
            "Failed to read config '{}': {}",
            path.display(),
            e
        ))
    })?;
    let mut config: MsgLimitConfig = toml::from_str(&content).map_err(|e| {
        MsgLimitError::Config(format!(
            "Failed to parse config '{}': {}",
            path.display(),
            e
        ))
    })?;
    let config_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    config.resolve_paths(config_dir);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_config(&tmp.path().join("msglimit.toml")).unwrap();
        assert_eq!(config.extension_key, "messageLimit");
        assert_eq!(config.save_debounce(), Duration::from_millis(1000));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_config() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp.as_file_mut(),
            r#"
settings_path = "state/ext.json"
log_format = "json"
"#
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.save_debounce_ms, 1000);
        let dir = tmp.path().parent().unwrap();
        assert_eq!(config.settings_path, dir.join("state/ext.json"));
    }

    #[test]
    fn test_absolute_settings_path_kept() {
        let mut config = MsgLimitConfig {
            settings_path: PathBuf::from("/var/lib/msglimit/settings.json"),
            ..MsgLimitConfig::default()
        };
        config.resolve_paths(Path::new("/etc"));
        assert_eq!(config.settings_path, PathBuf::from("/var/lib/msglimit/settings.json"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp.as_file_mut(), "save_debounce_ms = \"soon\"").unwrap();
        let err = load_config(tmp.path()).unwrap_err();
        assert!(matches!(err, MsgLimitError::Config(_)));
    }
}
