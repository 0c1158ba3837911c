//! Gateway contract between the store and durable storage.
//!
//! # Responsibility
//! - Describe load/save of the raw persisted document.
//! - Carry transport failures as typed errors for logging and status.
//!
//! # Invariants
//! - `load` returns `Ok(None)` when nothing has been persisted yet.
//! - Implementations must not panic on I/O failure.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Transport errors from a persistence gateway.
#[derive(Debug)]
pub enum GatewayError {
    /// Filesystem read/write failed for `path`.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Host storage cannot be used at all.
    Unavailable(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Unavailable(_) => None,
        }
    }
}

/// Raw read/write access to the persisted project document.
pub trait ProjectGateway {
    /// Reads the persisted document, if one exists.
    fn load(&self) -> GatewayResult<Option<String>>;
    /// Replaces the persisted document with `text`.
    fn save(&self, text: &str) -> GatewayResult<()>;
}

impl<G: ProjectGateway + ?Sized> ProjectGateway for &G {
    fn load(&self) -> GatewayResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, text: &str) -> GatewayResult<()> {
        (**self).save(text)
    }
}

impl<G: ProjectGateway + ?Sized> ProjectGateway for std::sync::Arc<G> {
    fn load(&self) -> GatewayResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, text: &str) -> GatewayResult<()> {
        (**self).save(text)
    }
}
