//! JSON codec for the persisted project list.
//!
//! # Responsibility
//! - Encode the in-memory project list as pretty-printed JSON.
//! - Decode persisted text back into projects, rejecting malformed input.
//!
//! # Invariants
//! - Encoding is deterministic for the same input and preserves every field.
//! - Decoding never normalizes data; order repair belongs to the store.
//! - Id text is kept byte for byte; any string is a valid id.
//! - Duplicate project ids, or duplicate chapter ids inside one project, are
//!   schema violations.

use crate::model::project::Project;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Decode failure for persisted project text.
#[derive(Debug)]
pub enum MalformedDataError {
    /// Text is not valid JSON or does not match the project schema.
    Json(serde_json::Error),
    /// Two projects share one id.
    DuplicateProjectId(String),
    /// Two chapters inside one project share one id.
    DuplicateChapterId { project_id: String, chapter_id: String },
}

impl Display for MalformedDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed project data: {err}"),
            Self::DuplicateProjectId(id) => write!(f, "duplicate project id: {id}"),
            Self::DuplicateChapterId {
                project_id,
                chapter_id,
            } => write!(
                f,
                "duplicate chapter id {chapter_id} in project {project_id}"
            ),
        }
    }
}

impl Error for MalformedDataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::DuplicateProjectId(_) => None,
            Self::DuplicateChapterId { .. } => None,
        }
    }
}

impl From<serde_json::Error> for MalformedDataError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Encodes projects as pretty-printed JSON.
///
/// # Errors
/// - Returns the serializer error. Plain project records cannot trigger it in
///   practice; callers still treat it as a failed save.
pub fn encode_projects(projects: &[Project]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(projects)
}

/// Decodes persisted JSON into projects.
///
/// # Errors
/// - `MalformedDataError::Json` when text is not a JSON array of projects or a
///   required field is missing.
/// - `DuplicateProjectId` / `DuplicateChapterId` on identity collisions.
pub fn decode_projects(text: &str) -> Result<Vec<Project>, MalformedDataError> {
    let projects: Vec<Project> = serde_json::from_str(text)?;
    validate_identities(&projects)?;
    Ok(projects)
}

fn validate_identities(projects: &[Project]) -> Result<(), MalformedDataError> {
    let mut project_ids = HashSet::new();
    for project in projects {
        if !project_ids.insert(&project.id) {
            return Err(MalformedDataError::DuplicateProjectId(
                project.id.to_string(),
            ));
        }

        let mut chapter_ids = HashSet::new();
        for chapter in &project.chapters {
            if !chapter_ids.insert(&chapter.id) {
                return Err(MalformedDataError::DuplicateChapterId {
                    project_id: project.id.to_string(),
                    chapter_id: chapter.id.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{decode_projects, encode_projects, MalformedDataError};

    #[test]
    fn decode_rejects_non_json_text() {
        let err = decode_projects("invalid json").unwrap_err();
        assert!(matches!(err, MalformedDataError::Json(_)));
    }

    #[test]
    fn encode_empty_list_is_empty_array() {
        assert_eq!(encode_projects(&[]).unwrap(), "[]");
    }
}
