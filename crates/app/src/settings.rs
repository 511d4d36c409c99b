use bankac_core::ReportOptions;
use bankac_import::{StatementLayout, TypeCodes};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Couldn't read the settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Bad settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Everything that can be set from the optional TOML settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub statement: StatementLayout,
    pub type_codes: TypeCodes,
    pub report: ReportOptions,
}

impl Settings {
    /// Read settings from `path`, or fall back to the defaults when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_toml(&content).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
