//! Project domain model.
//!
//! # Responsibility
//! - Define the writing project record and its exclusively owned chapters.
//! - Capture the creation timestamp once, at construction.
//! - Carry writing goals and the per-day word count history.
//!
//! # Invariants
//! - `id` and `creation_date` never change after creation.
//! - Slice order of `chapters` carries no meaning; use `chapters_in_order`.
//! - `daily_word_counts` keys are local dates formatted `YYYY-MM-DD`; each
//!   value is the project's total word count as last recorded on that day.
//! - A goal of `0` means no goal is set.

use crate::model::chapter::{Chapter, ChapterId};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CREATION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const WORD_COUNT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable identifier for one project.
///
/// Persisted as plain string text and kept verbatim; new ids are UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Key of today's entry in `Project::daily_word_counts` (local date).
pub fn today_key() -> String {
    Local::now().format(WORD_COUNT_DATE_FORMAT).to_string()
}

/// A writing work with its chapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable id, assigned at creation.
    pub id: ProjectId,
    /// Display name supplied by the user.
    pub name: String,
    /// Local timestamp captured at creation, `YYYY-MM-DDTHH:MM:SS.fff`.
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    /// Chapters owned by this project.
    pub chapters: Vec<Chapter>,
    /// Total word count recorded per local day.
    #[serde(rename = "dailyWordCounts", default)]
    pub daily_word_counts: BTreeMap<String, usize>,
    /// Words per day the writer aims for.
    #[serde(rename = "dailyWritingGoal", default)]
    pub daily_writing_goal: u32,
    /// Words the finished project should reach.
    #[serde(rename = "totalWritingGoal", default)]
    pub total_writing_goal: u32,
}

impl Project {
    /// Creates an empty project stamped with the current local time.
    pub fn new(name: impl Into<String>) -> Self {
        let creation_date = Local::now().format(CREATION_DATE_FORMAT).to_string();
        Self::with_id(ProjectId::generate(), name, creation_date)
    }

    /// Creates an empty project with caller-provided identity and timestamp.
    pub fn with_id(
        id: ProjectId,
        name: impl Into<String>,
        creation_date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            creation_date: creation_date.into(),
            chapters: Vec::new(),
            daily_word_counts: BTreeMap::new(),
            daily_writing_goal: 0,
            total_writing_goal: 0,
        }
    }

    /// Returns a copy owning `chapters`.
    pub fn with_chapters(&self, chapters: Vec<Chapter>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            creation_date: self.creation_date.clone(),
            chapters,
            daily_word_counts: self.daily_word_counts.clone(),
            daily_writing_goal: self.daily_writing_goal,
            total_writing_goal: self.total_writing_goal,
        }
    }

    /// Returns a copy carrying `name`.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns a copy carrying both writing goals.
    pub fn with_writing_goals(&self, daily: u32, total: u32) -> Self {
        Self {
            daily_writing_goal: daily,
            total_writing_goal: total,
            ..self.clone()
        }
    }

    /// Returns a copy with `words` recorded for `date`, replacing any earlier
    /// entry for that day.
    pub fn with_word_count_on(&self, date: impl Into<String>, words: usize) -> Self {
        let mut daily_word_counts = self.daily_word_counts.clone();
        daily_word_counts.insert(date.into(), words);
        Self {
            daily_word_counts,
            ..self.clone()
        }
    }

    /// Word count recorded for today, if any.
    pub fn words_today(&self) -> Option<usize> {
        self.daily_word_counts.get(&today_key()).copied()
    }

    /// Looks up one chapter by id.
    pub fn chapter(&self, chapter_id: &ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|chapter| &chapter.id == chapter_id)
    }

    /// Returns chapters sorted by `order`, ties kept in slice order.
    pub fn chapters_in_order(&self) -> Vec<Chapter> {
        let mut chapters = self.chapters.clone();
        chapters.sort_by_key(|chapter| chapter.order);
        chapters
    }
}

#[cfg(test)]
mod tests {
    use super::{today_key, Project};
    use crate::model::chapter::Chapter;

    #[test]
    fn new_project_is_empty_and_timestamped() {
        let project = Project::new("Novel");
        assert!(project.chapters.is_empty());
        assert!(project.daily_word_counts.is_empty());
        assert_eq!(project.daily_writing_goal, 0);
        assert_eq!(project.name, "Novel");
        // 2024-01-01T00:00:00.000
        assert_eq!(project.creation_date.len(), 23);
        assert_eq!(&project.creation_date[10..11], "T");
    }

    #[test]
    fn chapters_in_order_sorts_by_order_field() {
        let project = Project::new("Novel").with_chapters(vec![
            Chapter::new("Second", 1),
            Chapter::new("First", 0),
        ]);
        let titles: Vec<_> = project
            .chapters_in_order()
            .into_iter()
            .map(|chapter| chapter.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn word_count_entries_overwrite_per_day() {
        let project = Project::new("Novel")
            .with_word_count_on("2024-05-01", 10)
            .with_word_count_on("2024-05-01", 12)
            .with_word_count_on(today_key(), 3);

        assert_eq!(project.daily_word_counts.len(), 2);
        assert_eq!(project.daily_word_counts["2024-05-01"], 12);
        assert_eq!(project.words_today(), Some(3));
        // 2024-01-01
        assert_eq!(today_key().len(), 10);
    }

    #[test]
    fn chapter_replacement_keeps_goals_and_history() {
        let project = Project::new("Novel")
            .with_writing_goals(500, 80_000)
            .with_word_count_on("2024-05-01", 10);

        let updated = project.with_chapters(vec![Chapter::new("One", 0)]);

        assert_eq!(updated.daily_writing_goal, 500);
        assert_eq!(updated.total_writing_goal, 80_000);
        assert_eq!(updated.daily_word_counts, project.daily_word_counts);
    }
}
