//! # Configuration
//!
//! Stored through the same [`KeyValueStore`] as history, under the `config`
//! key (so `config.json` on disk). A missing entry or missing fields fall
//! back to compiled defaults.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `timestamp-format` | `%Y/%-m/%-d %H:%M:%S` | strftime pattern for new history timestamps |
//! | `relative-time` | `false` | List history with "5 minutes ago" style times |

use crate::error::{ReckonError, Result};
use crate::history::is_valid_timestamp_format;
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};

pub const CONFIG_KEY: &str = "config";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y/%-m/%-d %H:%M:%S";

pub const CONFIG_KEYS: &[&str] = &["timestamp-format", "relative-time"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReckonConfig {
    /// strftime pattern used when stamping new history records
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Show history times relative to now when the stamp can be parsed back
    #[serde(default)]
    pub relative_time: bool,
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl Default for ReckonConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            relative_time: false,
        }
    }
}

impl ReckonConfig {
    /// Read the stored config. No entry means defaults.
    pub fn load<B: KeyValueStore>(store: &B) -> Result<Self> {
        match store.get(CONFIG_KEY)? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Self::default()),
        }
    }

    pub fn save<B: KeyValueStore>(&self, store: &B) -> Result<()> {
        store.set(CONFIG_KEY, &serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "timestamp-format" => Some(self.timestamp_format.clone()),
            "relative-time" => Some(self.relative_time.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "timestamp-format" => {
                if !is_valid_timestamp_format(value) {
                    return Err(ReckonError::Config(format!(
                        "Invalid timestamp format: {}",
                        value
                    )));
                }
                self.timestamp_format = value.to_string();
            }
            "relative-time" => {
                self.relative_time = match value {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    other => {
                        return Err(ReckonError::Config(format!(
                            "Expected true or false, got: {}",
                            other
                        )))
                    }
                };
            }
            other => {
                return Err(ReckonError::Config(format!(
                    "Unknown config key: {}",
                    other
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fs_backend::FsBackend;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn test_default_config() {
        let config = ReckonConfig::default();
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert!(!config.relative_time);
    }

    #[test]
    fn test_load_missing_config() {
        let config = ReckonConfig::load(&MemBackend::new()).unwrap();
        assert_eq!(config, ReckonConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let store = MemBackend::new();

        let mut config = ReckonConfig::default();
        config.set("timestamp-format", "%H:%M").unwrap();
        config.set("relative-time", "on").unwrap();
        config.save(&store).unwrap();

        let loaded = ReckonConfig::load(&store).unwrap();
        assert_eq!(loaded.timestamp_format, "%H:%M");
        assert!(loaded.relative_time);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let store = MemBackend::new();
        store.set(CONFIG_KEY, "{not json").unwrap();
        assert!(matches!(
            ReckonConfig::load(&store),
            Err(ReckonError::Serialization(_))
        ));
    }

    #[test]
    fn test_save_lands_in_config_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBackend::new(dir.path().join("data"));

        ReckonConfig::default().save(&store).unwrap();
        assert!(dir.path().join("data").join("config.json").exists());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ReckonConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReckonConfig::default());
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = ReckonConfig::default();
        assert_eq!(config.get("relative-time").as_deref(), Some("false"));
        assert_eq!(config.get("colour"), None);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = ReckonConfig::default();
        assert!(config.set("relative-time", "maybe").is_err());
        assert!(config.set("timestamp-format", "%Q").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, ReckonConfig::default());
    }
}
