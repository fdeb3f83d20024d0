//! Configuration management
//!
//! Reads `settings.json` from the Cardfile data directory:
//! ```json
//! {
//!   "apiUrl": "https://contacts.example.com"
//! }
//! ```
//! The `CARDFILE_API_URL` environment variable overrides the configured
//! URL (useful for pointing a client at staging or a test server).

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::adapters::api;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api_url: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Cardfile configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Resolved backend base URL (env override already applied)
    pub api_url: String,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the data directory.
    ///
    /// Resolution order for the API URL:
    /// 1. `CARDFILE_API_URL` environment variable
    /// 2. `apiUrl` in settings.json
    /// 3. the local-development default
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let api_url = api::get_base_url(raw.api_url.as_deref());

        Ok(Self {
            api_url,
            _raw_settings: raw,
        })
    }

    /// Save config, preserving settings the client doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.api_url = Some(self.api_url.clone());

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}
