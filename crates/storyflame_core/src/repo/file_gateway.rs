//! File-backed gateway for desktop hosts.
//!
//! # Responsibility
//! - Read and write `projects.json` under the configured data directory.
//! - Emit `gateway_load` / `gateway_save` logging events with duration.
//!
//! # Invariants
//! - A missing file loads as `Ok(None)`; blank files load as `Ok(None)` too.
//! - Saves go through a sibling temp file and a rename, so a failed write
//!   never truncates the previous document.

use crate::config::StoreConfig;
use crate::repo::gateway::{GatewayError, GatewayResult, ProjectGateway};
use log::{error, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const TEMP_SUFFIX: &str = "tmp";

/// Gateway persisting the project document as one JSON file.
#[derive(Debug, Clone)]
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    /// Creates a gateway writing to `config.projects_path()`.
    pub fn new(config: &StoreConfig) -> Self {
        Self::at_path(config.projects_path())
    }

    /// Creates a gateway for an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|value| value.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(TEMP_SUFFIX);
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> GatewayError {
        GatewayError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_atomically(&self, text: &str) -> GatewayResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, text).map_err(|err| GatewayError::Io {
            path: temp_path.clone(),
            source: err,
        })?;
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io_error(err));
        }
        Ok(())
    }
}

impl ProjectGateway for FileGateway {
    fn load(&self) -> GatewayResult<Option<String>> {
        let started_at = Instant::now();
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => {
                info!(
                    "event=gateway_load module=repo status=skip reason=blank duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(None)
            }
            Ok(text) => {
                info!(
                    "event=gateway_load module=repo status=ok bytes={} duration_ms={}",
                    text.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(text))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=gateway_load module=repo status=skip reason=missing duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(None)
            }
            Err(err) => {
                error!(
                    "event=gateway_load module=repo status=error duration_ms={} error_code=read_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(self.io_error(err))
            }
        }
    }

    fn save(&self, text: &str) -> GatewayResult<()> {
        let started_at = Instant::now();
        match self.write_atomically(text) {
            Ok(()) => {
                info!(
                    "event=gateway_save module=repo status=ok bytes={} duration_ms={}",
                    text.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=gateway_save module=repo status=error duration_ms={} error_code=write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FileGateway;

    #[test]
    fn temp_path_is_a_sibling_of_the_document() {
        let gateway = FileGateway::at_path("/data/storyflame/projects.json");
        assert_eq!(
            gateway.temp_path(),
            std::path::PathBuf::from("/data/storyflame/projects.json.tmp")
        );
    }
}
