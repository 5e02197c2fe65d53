//! Runtime configuration: where the databases live, the fallback language and
//! logging. Built-in defaults exist for a development checkout and for a
//! system-wide install; an optional TOML file and CLI flags refine them.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

const PROD_DATA_DIR: &str = "/usr/local/share/islamcompanion";
const DEV_DATA_DIR: &str = "source/data";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "reader.log";

/// Which set of built-in paths to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Dev,
    Prod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub hadith_db: PathBuf,
    pub quran_db: PathBuf,
    /// Language used until the settings row says otherwise.
    pub default_lang: String,
    pub log_level: String,
    pub log_file: PathBuf,
}

/// Shape of the optional TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    mode: Option<Mode>,
    hadith_db: Option<PathBuf>,
    quran_db: Option<PathBuf>,
    default_lang: Option<String>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

impl Config {
    /// Built-in settings for a mode.
    pub fn for_mode(mode: Mode) -> Self {
        let data_dir = match mode {
            Mode::Dev => PathBuf::from(DEV_DATA_DIR),
            Mode::Prod => PathBuf::from(PROD_DATA_DIR),
        };
        Self {
            mode,
            hadith_db: data_dir.join("hadith.db"),
            quran_db: data_dir.join("quran.db"),
            default_lang: "Urdu".to_string(),
            log_level: "info".to_string(),
            log_file: default_log_file(),
        }
    }

    /// Parse a TOML document on top of the built-in defaults. `mode` takes
    /// precedence over the file's own `mode` key.
    pub fn from_toml(content: &str, mode: Option<Mode>) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        let mut config = Self::for_mode(mode.or(file.mode).unwrap_or_default());
        if let Some(path) = file.hadith_db {
            config.hadith_db = path;
        }
        if let Some(path) = file.quran_db {
            config.quran_db = path;
        }
        if let Some(lang) = file.default_lang {
            config.default_lang = lang;
        }
        if let Some(level) = file.log_level {
            config.log_level = level;
        }
        if let Some(path) = file.log_file {
            config.log_file = path;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration. An explicit `path` must exist; otherwise the file
    /// in the platform config directory is used when present.
    pub fn load(path: Option<&Path>, mode: Option<Mode>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (Some(path.to_path_buf()), true),
            None => (default_config_path(), false),
        };

        let Some(path) = path else {
            return Ok(Self::for_mode(mode.unwrap_or_default()));
        };
        if !required && !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::for_mode(mode.unwrap_or_default()));
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&content, mode)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_lang.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "default_lang",
                reason: "must not be empty".into(),
            });
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_level",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_mode(Mode::default())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "islamcompanion", "islam-companion")
}

/// `config.toml` inside the platform configuration directory.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn default_log_file() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_local_dir().join(LOG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
}
