//! Core state and persistence for StoryFlame writing projects.
//! Hosts (desktop, mobile, CLI) drive `ProjectStore` and observe its snapshots.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::chapter::{Chapter, ChapterId};
pub use model::project::{today_key, Project, ProjectId};
pub use repo::codec::{decode_projects, encode_projects, MalformedDataError};
pub use repo::file_gateway::FileGateway;
pub use repo::gateway::{GatewayError, GatewayResult, ProjectGateway};
pub use repo::memory_gateway::MemoryGateway;
pub use service::export::{
    count_words, export_txt, export_txt_to_path, project_stats, ExportError, ProjectStats,
};
pub use service::ordering::MoveDirection;
pub use service::project_store::{PersistStatus, ProjectStore, StoreSnapshot};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
