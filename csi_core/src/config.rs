//! # Session Configuration
//!
//! Which engine build to talk to and how to start the model. Stored as JSON;
//! every field has a default, so `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "version": "etabs-2016",
//!   "units": "KnM",
//!   "model_path": "models/tower.csim",
//!   "user_id": "engineer@example.com",
//!   "lock_files": true
//! }
//! ```
//!
//! Two environment variables override the file: `CSI_ENGINE_VERSION` (an
//! engine id such as `sap2000-v19`) and `CSI_UNITS` (a unit label, name or
//! code).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::EngineVersion;
use crate::errors::{ApiError, ApiResult};
use crate::units::Units;

pub const ENV_ENGINE_VERSION: &str = "CSI_ENGINE_VERSION";
pub const ENV_UNITS: &str = "CSI_UNITS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Engine build whose capability table applies
    #[serde(default)]
    pub version: EngineVersion,

    /// Present units the model is initialized with
    #[serde(default)]
    pub units: Units,

    /// Model file opened at session start
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Name recorded in model file locks
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Hold an exclusive lock on every model file opened or saved
    #[serde(default)]
    pub lock_files: bool,
}

fn default_user_id() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            version: EngineVersion::default(),
            units: Units::default(),
            model_path: None,
            user_id: default_user_id(),
            lock_files: false,
        }
    }
}

impl SessionConfig {
    pub fn for_version(version: EngineVersion) -> Self {
        SessionConfig { version, ..Default::default() }
    }

    pub fn from_file(path: &Path) -> ApiResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ApiError::file_error("read config", path.display().to_string(), e.to_string()))?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> ApiResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `CSI_ENGINE_VERSION` and `CSI_UNITS` from the process environment
    pub fn with_env_overrides(self) -> ApiResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        if let Some(version) = lookup(ENV_ENGINE_VERSION) {
            self.version = version.parse()?;
            log::debug!("engine version overridden to {}", self.version.id());
        }
        if let Some(units) = lookup(ENV_UNITS) {
            self.units = Units::parse(&units)?;
            log::debug!("units overridden to {}", self.units);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config.version, EngineVersion::Sap2000V19);
        assert_eq!(config.units, Units::KipIn);
        assert!(config.model_path.is_none());
        assert!(!config.lock_files);
    }

    #[test]
    fn test_json_fields() {
        let config = SessionConfig::from_json(
            r#"{ "version": "etabs-2015", "units": "KnM", "user_id": "jd", "lock_files": true }"#,
        )
        .unwrap();
        assert_eq!(config.version, EngineVersion::Etabs2015);
        assert_eq!(config.units, Units::KnM);
        assert_eq!(config.user_id, "jd");
        assert!(config.lock_files);
    }

    #[test]
    fn test_overrides() {
        let config = SessionConfig::default()
            .with_overrides(|key| match key {
                ENV_ENGINE_VERSION => Some("ETABS-2016".to_string()),
                ENV_UNITS => Some("N, mm, C".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.version, EngineVersion::Etabs2016);
        assert_eq!(config.units, Units::NMm);
    }

    #[test]
    fn test_bad_override_rejected() {
        let err = SessionConfig::default()
            .with_overrides(|key| (key == ENV_UNITS).then(|| "furlongs".to_string()))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{ "units": 6 }"#).unwrap();
        // Units serialize by name, not code
        assert!(SessionConfig::from_file(&path).is_err());
        std::fs::write(&path, r#"{ "units": "TonM" }"#).unwrap();
        assert_eq!(SessionConfig::from_file(&path).unwrap().units, Units::TonM);
        assert!(SessionConfig::from_file(&dir.path().join("missing.json")).is_err());
    }
}
