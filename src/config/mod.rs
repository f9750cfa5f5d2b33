use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::SheetError;
use crate::time::Month;

pub const DEFAULT_START: &str = "2024-01";
pub const DEFAULT_END: &str = "2024-12";
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

const HOME_ENV: &str = "BUDGET_SHEET_HOME";
const DEFAULT_DIR_NAME: &str = ".budget_sheet";
const CONFIG_FILE: &str = "config.json";

/// Settings used to seed a new sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub default_start: Month,
    pub default_end: Month,
    pub debounce_ms: u64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            default_start: DEFAULT_START.parse().unwrap_or_default(),
            default_end: DEFAULT_END.parse().unwrap_or_default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Locates and reads `config.json` from the application directory.
///
/// The file is optional; when it is missing every field takes its default.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: impl Into<PathBuf>) -> Self {
        Self {
            path: base.into().join(CONFIG_FILE),
        }
    }

    pub fn load(&self) -> Result<SheetConfig, SheetError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(SheetConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: SheetConfig = serde_json::from_str(&data)?;
        tracing::debug!(path = %self.path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Application directory, `$BUDGET_SHEET_HOME` or `~/.budget_sheet`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_seed_range() {
        let config = SheetConfig::default();
        assert_eq!(config.default_start.to_string(), DEFAULT_START);
        assert_eq!(config.default_end.to_string(), DEFAULT_END);
        assert_eq!(config.debounce_ms, 200);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path());
        assert_eq!(manager.load().unwrap(), SheetConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{ "default_end": "2025-06" }"#).unwrap();
        let config = ConfigManager::with_base_dir(dir.path()).load().unwrap();
        assert_eq!(config.default_start.to_string(), "2024-01");
        assert_eq!(config.default_end.to_string(), "2025-06");
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn malformed_month_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{ "default_start": "2025-6" }"#).unwrap();
        let err = ConfigManager::with_base_dir(dir.path()).load().unwrap_err();
        assert!(matches!(err, SheetError::Config(_)));
    }
}
