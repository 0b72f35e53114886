//! Dispatcher configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse JSON content.
    #[error("failed to parse config JSON: {source}")]
    Json {
        /// The underlying JSON parse error.
        #[from]
        source: serde_json::Error,
    },
}

/// Defaults and policy applied by the mutation dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatcherConfig {
    /// Title given to events created from a lane selection.
    #[serde(default = "default_title")]
    pub default_title: String,

    /// `editable` flag for created events.
    #[serde(default = "default_true")]
    pub default_editable: bool,

    /// `resource_editable` flag for created events.
    #[serde(default = "default_true")]
    pub default_resource_editable: bool,

    /// Whether events on the same lane may overlap.
    #[serde(default = "default_true")]
    pub allow_overlap: bool,

    /// Id generation attempts before a create gives up on collisions.
    #[serde(default = "default_max_id_attempts")]
    pub max_id_attempts: u32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            default_editable: true,
            default_resource_editable: true,
            allow_overlap: true,
            max_id_attempts: default_max_id_attempts(),
        }
    }
}

impl DispatcherConfig {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Json`] if the content is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parses configuration from a JSON string.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the title for created events.
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// Enables or disables double-booking.
    pub fn with_allow_overlap(mut self, allow: bool) -> Self {
        self.allow_overlap = allow;
        self
    }

    /// Sets the id generation attempt limit.
    pub fn with_max_id_attempts(mut self, attempts: u32) -> Self {
        self.max_id_attempts = attempts;
        self
    }
}

fn default_title() -> String {
    "A new event to be drawn".to_owned()
}

fn default_true() -> bool {
    true
}

fn default_max_id_attempts() -> u32 {
    16
}
