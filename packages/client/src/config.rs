//! Client configuration.

use std::path::{Path, PathBuf};

use calypso_shared::wire::{ScriptConvention, SettingsSnapshot};

use crate::error::ClientError;

/// Endpoint used when none is given
pub const DEFAULT_URL: &str = "ws://localhost:8173/";

/// Runtime configuration assembled from command-line arguments
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint
    pub url: String,
    /// How script uploads are announced
    pub script_convention: ScriptConvention,
    /// JSON file with the initial toggle states
    pub settings_file: Option<PathBuf>,
    /// File mirroring the rendered HTML log
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            script_convention: ScriptConvention::default(),
            settings_file: None,
            log_file: None,
        }
    }
}

impl ClientConfig {
    /// Initial toggle states; all off when no settings file is configured
    pub fn initial_settings(&self) -> Result<SettingsSnapshot, ClientError> {
        match &self.settings_file {
            Some(path) => load_settings(path),
            None => Ok(SettingsSnapshot::default()),
        }
    }
}

/// Load toggle states from a JSON object such as `{"hud": true}`
pub fn load_settings(path: &Path) -> Result<SettingsSnapshot, ClientError> {
    let content = std::fs::read_to_string(path).map_err(|e| ClientError::SettingsFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| ClientError::SettingsFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
