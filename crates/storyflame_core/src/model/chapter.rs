//! Chapter domain model.
//!
//! # Responsibility
//! - Define the titled unit of text owned by one project.
//! - Provide copy-on-write helpers used by store mutations.
//!
//! # Invariants
//! - `id` is generated once and never reused for another chapter.
//! - `order` is the source of truth for display sequence, not slice position.
//! - Absent `content`/`summary` decode as empty strings.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one chapter.
///
/// Persisted as plain string text and kept verbatim; new ids are UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(String);

impl ChapterId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ChapterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ChapterId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ChapterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One chapter inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Stable id, assigned at creation.
    pub id: ChapterId,
    /// Display title. Blank titles are accepted; hosts should avoid them.
    pub title: String,
    /// Zero-based display position within the owning project.
    pub order: u32,
    /// Body text, markdown or rich text serialized as HTML.
    #[serde(default)]
    pub content: String,
    /// Short free-form synopsis.
    #[serde(default)]
    pub summary: String,
}

impl Chapter {
    /// Creates a chapter with a generated id and empty body/summary.
    pub fn new(title: impl Into<String>, order: u32) -> Self {
        Self::with_id(ChapterId::generate(), title, order)
    }

    /// Creates a chapter with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: ChapterId, title: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            title: title.into(),
            order,
            content: String::new(),
            summary: String::new(),
        }
    }

    /// Returns a copy carrying `title`.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Returns a copy carrying `summary`.
    pub fn with_summary(&self, summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..self.clone()
        }
    }

    /// Returns a copy carrying `content`.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }

    /// Returns a copy placed at `order`.
    pub fn with_order(&self, order: u32) -> Self {
        Self {
            order,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Chapter, ChapterId};
    use uuid::Uuid;

    #[test]
    fn new_chapter_starts_with_empty_text_fields() {
        let chapter = Chapter::new("Opening", 3);
        assert!(Uuid::parse_str(chapter.id.as_str()).is_ok());
        assert_eq!(chapter.order, 3);
        assert!(chapter.content.is_empty());
        assert!(chapter.summary.is_empty());
    }

    #[test]
    fn with_helpers_leave_other_fields_untouched() {
        let original = Chapter::new("Opening", 0).with_content("body");
        let renamed = original.with_title("Prologue");

        assert_eq!(renamed.id, original.id);
        assert_eq!(renamed.order, original.order);
        assert_eq!(renamed.content, "body");
        assert_eq!(renamed.title, "Prologue");
        assert_eq!(original.title, "Opening");
    }

    #[test]
    fn ids_keep_their_text_verbatim() {
        let id = ChapterId::from("Chapter-ONE");
        assert_eq!(id.as_str(), "Chapter-ONE");
        assert_eq!(id.to_string(), "Chapter-ONE");
        assert_ne!(ChapterId::generate(), ChapterId::generate());
    }
}
