//! Agent configuration
//!
//! Loaded from a JSON file with serde defaults, so a partial config is fine
//! and a missing file means "all defaults". A device id is generated once
//! and written back into the returned config.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

use rambler_state::LatLng;

/// Login credentials for the upstream auth provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// "ptc" or "google"
    pub provider: String,
}

/// Protocol-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Compact version code, e.g. 5901 for client 0.59.1
    pub version: u32,
    /// Fail the session when the server minimum exceeds our version
    pub check_version: bool,
    pub country: String,
    pub language: String,
    pub timezone: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            version: 5901,
            check_version: true,
            country: "US".to_string(),
            language: "en".to_string(),
            timezone: "Europe/Paris".to_string(),
        }
    }
}

/// What the agent does on its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Throw at encountered pokemon
    pub catch: bool,
    /// Queue a release when a caught pokemon is outclassed by one we own
    pub autorelease: bool,
    /// Assign free incubators to free eggs after map refreshes
    pub incubate: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            catch: true,
            autorelease: false,
            incubate: true,
        }
    }
}

/// Full agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials: Credentials,
    /// Start position
    pub position: LatLng,
    pub device_id: String,
    /// Directory for caches and state snapshots
    pub data_dir: PathBuf,
    pub api: ApiConfig,
    pub behavior: BehaviorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            position: LatLng {
                lat: 48.8456222,
                lng: 2.3364526,
            },
            device_id: random_device_id(),
            data_dir: PathBuf::from("data"),
            api: ApiConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Config {
    /// Load from a JSON file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&text)?;
        if config.device_id.is_empty() {
            config.device_id = random_device_id();
        }
        Ok(config)
    }
}

fn random_device_id() -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..32).map(|_| HEX[rng.gen_range(0..16)] as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.version, 5901);
        assert!(config.api.check_version);
        assert_eq!(config.device_id.len(), 32);
        assert!(config.behavior.catch);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let text = r#"{"credentials": {"username": "trainer"}, "api": {"version": 4500}}"#;
        let config: Config = serde_json::from_str(text).unwrap();

        assert_eq!(config.credentials.username, "trainer");
        assert_eq!(config.api.version, 4500);
        // untouched sections keep their defaults
        assert_eq!(config.api.country, "US");
        assert!(config.behavior.incubate);
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let config = Config::load("/nonexistent/config.json").unwrap();
        assert_eq!(config.api.language, "en");
    }
}
