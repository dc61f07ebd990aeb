// File: src/paths.rs
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::PathBuf;

pub struct AppPaths;

impl AppPaths {
    /// Returns the ProjectDirs struct, common to all path lookups.
    fn get_proj_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "taskdeck", "taskdeck")
    }

    /// Helper to ensure a directory exists before returning it.
    fn ensure_exists(path: PathBuf) -> Result<PathBuf> {
        if !path.exists() {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(path)
    }

    /// Determines the base directory from environment overrides or OS defaults.
    fn resolve_base(subdir: &str) -> Option<PathBuf> {
        // Override (tests, scripting)
        if let Ok(dir) = env::var("TASKDECK_DATA_DIR") {
            return Some(PathBuf::from(dir));
        }

        let proj = Self::get_proj_dirs()?;
        let dir = match subdir {
            "data" => proj.data_dir(),
            "config" => proj.config_dir(),
            _ => return None,
        };
        Some(dir.to_path_buf())
    }

    pub fn get_data_dir() -> Result<PathBuf> {
        let path = Self::resolve_base("data")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::ensure_exists(path)
    }

    pub fn get_config_dir() -> Result<PathBuf> {
        let path = Self::resolve_base("config")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::ensure_exists(path)
    }

    pub fn get_config_file_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    /// The single fixed snapshot slot every store mutation writes through to.
    pub fn get_snapshot_path() -> Result<PathBuf> {
        Ok(Self::get_data_dir()?.join("tasks.json"))
    }
}
