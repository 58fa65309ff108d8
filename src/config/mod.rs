// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for BeatBox.
//!
//! This module provides data structures for loading the instrument table,
//! storage settings and MIDI device selection from YAML or TOML files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::instruments::{Instrument, InstrumentTable, GM_KIT};
use crate::persistence::{PersistenceService, DEFAULT_EXTENSION, DEFAULT_PREFIX};

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// One instrument per grid row (exactly 16)
    #[serde(default = "default_instruments")]
    pub instruments: Vec<Instrument>,
    /// Where and how patterns are saved
    #[serde(default)]
    pub storage: StorageConfig,
    /// MIDI output selection
    #[serde(default)]
    pub midi: MidiDeviceConfig,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_instruments() -> Vec<Instrument> {
    GM_KIT
        .iter()
        .map(|&(name, note)| Instrument::new(name, note))
        .collect()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            instruments: default_instruments(),
            storage: StorageConfig::default(),
            midi: MidiDeviceConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a file, picking the format by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Validated instrument table
    pub fn instrument_table(&self) -> Result<InstrumentTable> {
        InstrumentTable::new(self.instruments.clone()).context("Invalid instrument table")
    }

    /// Persistence service with the configured naming and folder
    pub fn persistence(&self) -> Result<PersistenceService> {
        let mut service = PersistenceService::new()
            .with_naming(&self.storage.prefix, &self.storage.extension);
        if let Some(folder) = &self.storage.folder {
            service
                .select_folder(folder)
                .with_context(|| format!("Invalid save folder: {:?}", folder))?;
        }
        Ok(service)
    }

    /// Parsed log level
    pub fn level(&self) -> Result<Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown log level: {}", self.log_level))
    }
}

/// Pattern storage settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Folder patterns are saved into (None = must be chosen first)
    #[serde(default)]
    pub folder: Option<PathBuf>,
    /// File name prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// File extension
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}
fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            folder: None,
            prefix: default_prefix(),
            extension: default_extension(),
        }
    }
}

/// MIDI device configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MidiDeviceConfig {
    /// Port name to connect to (substring match)
    #[serde(default)]
    pub device: Option<String>,
    /// Port index, used when no name is given
    #[serde(default)]
    pub port: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_values() {
        let config = AppConfig::from_yaml("log_level: debug\n").unwrap();
        assert_eq!(config.instruments.len(), 16);
        assert_eq!(config.instruments[0], Instrument::new("Bass Drum", 35));
        assert_eq!(config.storage.prefix, "BeatBox");
        assert_eq!(config.storage.extension, "bbx");
        assert!(config.storage.folder.is_none());
        assert_eq!(config.level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
storage:
  prefix: "Groove"
midi:
  device: "IAC Driver"
"#;

        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.storage.prefix, "Groove");
        assert_eq!(config.storage.extension, "bbx");
        assert_eq!(config.midi.device, Some("IAC Driver".to_string()));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
log_level = "warn"

[midi]
port = 2

[storage]
extension = "pat"
"#;

        let config = AppConfig::from_toml(text).unwrap();
        assert_eq!(config.midi.port, Some(2));
        assert_eq!(config.storage.extension, "pat");
        assert_eq!(config.level().unwrap(), Level::WARN);
    }

    #[test]
    fn test_short_instrument_table_rejected() {
        let yaml = r#"
instruments:
  - name: "Kick"
    note: 36
  - name: "Snare"
    note: 38
"#;

        let config = AppConfig::from_yaml(yaml).unwrap();
        assert!(config.instrument_table().is_err());
    }

    #[test]
    fn test_bad_log_level() {
        let config = AppConfig::from_yaml("log_level: loud\n").unwrap();
        assert!(config.level().is_err());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("beatbox.yaml");

        let mut original = AppConfig::default();
        original.storage.folder = Some(dir.path().to_path_buf());
        original.instruments[3].note = 40;
        original.save(&path).unwrap();

        let parsed = AppConfig::load(&path).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.instrument_table().unwrap().note(3), Some(40));

        let service = parsed.persistence().unwrap();
        assert_eq!(service.folder(), Some(dir.path()));
    }

    #[test]
    fn test_missing_folder_rejected() {
        let mut config = AppConfig::default();
        config.storage.folder = Some(PathBuf::from("/definitely/not/here"));
        assert!(config.persistence().is_err());
    }
}
