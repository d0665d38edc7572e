//! Wrapper options persisted as JSON in the user config directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ConfigError;

const CONFIG_DIR: &str = "Synth1";
const CONFIG_FILE: &str = "wrapper.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapperConfig {
    /// Forward incoming MIDI control changes to the synth. When enabled the
    /// knobs are no longer marshaled into control changes.
    pub forward_midi_cc: bool,
    /// Log note on/off events at debug level.
    pub log_note_events: bool,
    /// Top of the control-change scale knobs are mapped onto.
    pub control_scale: f32,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            forward_midi_cc: false,
            log_note_events: true,
            control_scale: 127.0,
        }
    }
}

impl WrapperConfig {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    /// `control_scale` must be finite and positive, otherwise knob values
    /// would reach the synth as NaN or infinity.
    pub fn validate(&self) -> Result<(), String> {
        if !self.control_scale.is_finite() || self.control_scale <= 0.0 {
            return Err(format!(
                "control_scale must be a positive finite number, got {}",
                self.control_scale
            ));
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Location of the per-user wrapper config.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    path.push(CONFIG_DIR);
    path.push(CONFIG_FILE);
    Ok(path)
}

/// Loads the per-user config. A missing file yields defaults; an unreadable
/// or malformed one is logged and also yields defaults.
pub fn load() -> WrapperConfig {
    let path = match default_path() {
        Ok(path) => path,
        Err(err) => {
            warn!(%err, "using default wrapper config");
            return WrapperConfig::default();
        }
    };
    if !path.exists() {
        return WrapperConfig::default();
    }
    match WrapperConfig::load_from(&path) {
        Ok(config) => {
            info!(path = %path.display(), "loaded wrapper config");
            config
        }
        Err(err) => {
            warn!(%err, "failed to load wrapper config, using defaults");
            WrapperConfig::default()
        }
    }
}

/// Writes the per-user config, creating its directory if needed.
pub fn save(config: &WrapperConfig) -> Result<PathBuf, ConfigError> {
    let path = default_path()?;
    config.save_to(&path)?;
    Ok(path)
}
