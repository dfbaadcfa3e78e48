use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Overrides the platform data directory.
pub const DATA_DIR_ENV: &str = "DOLEVTRACK_DATA_DIR";

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let data_dir = if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            PathBuf::from(dir)
        } else {
            let proj_dirs = ProjectDirs::from("", "", "dolevtrack")
                .context("Could not determine home directory")?;
            proj_dirs.data_dir().to_path_buf()
        };
        Self::with_data_dir(data_dir)
    }

    pub fn with_data_dir(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join("dolevtrack.db");
        Ok(Config { db_path, data_dir })
    }
}
