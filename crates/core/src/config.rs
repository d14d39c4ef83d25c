use crate::extractor::YearRange;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum YearPolicy {
    /// 1980 to 2050
    #[default]
    Wide,
    /// 2001 to 2025
    Strict,
}

impl YearPolicy {
    pub fn range(self) -> YearRange {
        match self {
            YearPolicy::Wide => YearRange::WIDE,
            YearPolicy::Strict => YearRange::STRICT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub year_range: YearPolicy,
    pub clear_unrecognized_on_start: bool,
    pub exiftool_path: String,
    pub log_file: Option<PathBuf>,
    pub unrecognized_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            year_range: YearPolicy::Wide,
            clear_unrecognized_on_start: true,
            exiftool_path: "exiftool".to_string(),
            log_file: None,
            unrecognized_file: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub log_path: PathBuf,
    pub unrecognized_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("com", "media-dater", "media-dater")
        .context("could not determine the per-user configuration directory")?;
    let config_dir = proj.config_dir().to_path_buf();
    let data_dir = proj.data_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        log_path: data_dir.join("organize_by_date.log"),
        unrecognized_path: data_dir.join("unrecognized.txt"),
        config_dir,
        data_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    load_config_from(&paths.config_path)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read config file: {}", path.display()))?;
    let config = toml::from_str::<AppConfig>(&raw)
        .with_context(|| format!("could not parse config file: {}", path.display()))?;
    Ok(config)
}
