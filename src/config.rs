use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum RotateType {
    // delete old history snapshots by the total number stored
    #[serde(rename = "history_count")]
    HistoryCount,
    // by bytes, delete old history snapshots by the total size of the history directory
    #[serde(rename = "total_size")]
    TotalSize,
    // keep every snapshot
    #[serde(rename = "reserved")]
    Reserved,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub rotate_type: RotateType,
    pub rotate_count: u32,
    pub rotate_size: u64,
}

impl Settings {
    pub fn new() -> Self {
        Settings {
            rotate_type: RotateType::HistoryCount,
            rotate_count: 100,
            rotate_size: 200 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub settings: Settings,
}

impl Config {
    pub fn new() -> Self {
        let config_string = match fs::read_to_string("./config/appsettings.json") {
            Ok(value) => value,
            Err(_) => {
                return Config {
                    settings: Settings::new(),
                };
            }
        };
        let config: Config = match serde_json::from_str(&config_string) {
            Ok(value) => value,
            Err(_) => {
                return Config {
                    settings: Settings::new(),
                };
            }
        };
        config
    }
}

// test module
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::new();
        assert_eq!(settings.rotate_type, RotateType::HistoryCount);
        assert!(settings.rotate_count > 0);
        assert!(settings.rotate_size > 0);
    }

    #[test]
    fn test_settings_from_json() {
        let config: Config = serde_json::from_str(
            r#"{"settings":{"rotate_type":"total_size","rotate_count":5,"rotate_size":1024}}"#,
        )
        .unwrap();
        assert_eq!(config.settings.rotate_type, RotateType::TotalSize);
        assert_eq!(config.settings.rotate_count, 5);
        assert_eq!(config.settings.rotate_size, 1024);
    }

    #[test]
    fn test_missing_config_file_falls_back_to_defaults() {
        let config = Config::new();
        assert!(config.settings.rotate_count > 0);
    }
}
