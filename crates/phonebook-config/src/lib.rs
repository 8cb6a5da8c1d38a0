use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use phonebook_core::SortColumn;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "phonebook";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_PREVIEW_REJECTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub default_sort: SortColumn,
    pub photos_dir: Option<PathBuf>,
    pub import: ImportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// How many rejected CSV rows are printed before the rest is summarised.
    pub preview_rejections: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_sort: SortColumn::default(),
            photos_dir: None,
            import: ImportConfig {
                preview_rejections: DEFAULT_PREVIEW_REJECTIONS,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid photos_dir value: {0}")]
    InvalidPhotosDir(PathBuf),
    #[error("invalid import.preview_rejections value: {0}")]
    InvalidPreviewRejections(usize),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    default_sort: Option<SortColumn>,
    photos_dir: Option<PathBuf>,
    import: Option<ImportFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImportFile {
    preview_rejections: Option<usize>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(sort) = parsed.default_sort {
        config.default_sort = sort;
    }

    if let Some(dir) = parsed.photos_dir {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidPhotosDir(dir));
        }
        config.photos_dir = Some(dir);
    }

    if let Some(import) = parsed.import {
        if let Some(preview) = import.preview_rejections {
            if preview == 0 {
                return Err(ConfigError::InvalidPreviewRejections(preview));
            }
            config.import.preview_rejections = preview;
        }
    }

    Ok(config)
}
