//! Session configuration
//!
//! Screen dimensions and the addressing mode are supplied once when a session
//! is configured and never change while it lives. The configuration is plain
//! serde-serializable data so callers can persist profiles as JSON.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::addressing::AddressingMode;
use crate::screen::ScreenSize;

/// Fixed per-session decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub screen_size: ScreenSize,
    pub addressing: AddressingMode,
}

impl SessionConfig {
    pub fn new(screen_size: ScreenSize, addressing: AddressingMode) -> Self {
        Self {
            screen_size,
            addressing,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a session profile from a JSON file
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save the session profile to a JSON file
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(ScreenSize::Model2, AddressingMode::TwelveBit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.screen_size, ScreenSize::Model2);
        assert_eq!(config.addressing, AddressingMode::TwelveBit);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SessionConfig::new(ScreenSize::Model4, AddressingMode::FourteenBit);
        let json = config.to_json().unwrap();
        let loaded = SessionConfig::from_json(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let config = SessionConfig::new(ScreenSize::Model3, AddressingMode::TwelveBit);
        config.save(&path).unwrap();
        assert_eq!(SessionConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(SessionConfig::load(&path).is_err());
    }
}
