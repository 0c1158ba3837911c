//! Data directory resolution for hosts.
//!
//! # Responsibility
//! - Decide where the persisted project document lives.
//! - Keep platform path policy out of the store.
//!
//! # Invariants
//! - Resolution order: `STORYFLAME_HOME`, then `<home>/.storyflame`, then the
//!   process working directory.
//! - An explicit `STORYFLAME_HOME` must be absolute.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "STORYFLAME_HOME";
/// Default persisted document name.
pub const PROJECTS_FILE_NAME: &str = "projects.json";
const HOME_DIR_NAME: &str = ".storyflame";

/// Errors from data directory resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `STORYFLAME_HOME` was set to a relative path.
    RelativeDataDir(String),
    /// Neither home nor working directory could be determined.
    NoDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeDataDir(value) => {
                write!(f, "{DATA_DIR_ENV} must be an absolute path, got `{value}`")
            }
            Self::NoDataDir => write!(f, "could not determine a data directory"),
        }
    }
}

impl Error for ConfigError {}

/// Location of the persisted project document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the document.
    pub data_dir: PathBuf,
    /// Document file name inside `data_dir`.
    pub file_name: String,
}

impl StoreConfig {
    /// Uses `data_dir` with the default document name.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_name: PROJECTS_FILE_NAME.to_string(),
        }
    }

    /// Resolves the data directory from environment and platform defaults.
    ///
    /// # Errors
    /// - `RelativeDataDir` when the override is not absolute.
    /// - `NoDataDir` when no candidate directory exists.
    pub fn resolve() -> Result<Self, ConfigError> {
        let override_dir = std::env::var(DATA_DIR_ENV).ok();
        let current_dir = std::env::current_dir().ok();
        resolve_data_dir(override_dir.as_deref(), dirs::home_dir(), current_dir)
            .map(Self::with_data_dir)
    }

    /// Full path of the persisted document.
    pub fn projects_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

fn resolve_data_dir(
    override_dir: Option<&str>,
    home_dir: Option<PathBuf>,
    current_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(value) = override_dir.map(str::trim).filter(|value| !value.is_empty()) {
        let path = Path::new(value);
        if !path.is_absolute() {
            return Err(ConfigError::RelativeDataDir(value.to_string()));
        }
        return Ok(path.to_path_buf());
    }

    if let Some(home) = home_dir {
        return Ok(home.join(HOME_DIR_NAME));
    }

    current_dir.ok_or(ConfigError::NoDataDir)
}
