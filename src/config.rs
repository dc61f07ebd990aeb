use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::paths::AppPaths;

/// Optional user configuration. The dashboard runs fine without a config
/// file; every field has a working default.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Config {
    /// Filter selected on startup, by its display label (e.g. "Today",
    /// "Due This Week").
    #[serde(default)]
    pub default_filter: Option<String>,

    /// Calendar pane view on startup: "day", "week" or "month".
    #[serde(default)]
    pub default_calendar_view: Option<String>,

    /// Overrides the snapshot location (normally tasks.json in the
    /// platform data directory).
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

impl Config {
    fn get_path() -> Result<PathBuf> {
        AppPaths::get_config_file_path()
    }

    pub fn load() -> Result<Self> {
        let path = Self::get_path()?;
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }
        Ok(Config::default())
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::get_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get_path_string() -> Result<String> {
        let path = Self::get_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_optional() {
        let cfg: Config = toml::from_str("").unwrap();
        assert!(cfg.default_filter.is_none());
        assert!(cfg.default_calendar_view.is_none());
        assert!(cfg.data_file.is_none());
    }

    #[test]
    fn test_parses_known_fields() {
        let cfg: Config = toml::from_str(
            r#"
            default_filter = "Due This Week"
            default_calendar_view = "month"
            data_file = "/tmp/elsewhere.json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.default_filter.as_deref(), Some("Due This Week"));
        assert_eq!(cfg.default_calendar_view.as_deref(), Some("month"));
        assert_eq!(cfg.data_file, Some(PathBuf::from("/tmp/elsewhere.json")));
    }
}
