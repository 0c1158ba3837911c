//! Project store: authoritative in-memory state plus persistence trigger.
//!
//! # Responsibility
//! - Own the project list and the selected-project pointer.
//! - Apply project/chapter use-cases as copy-on-write replacements.
//! - Publish one immutable `StoreSnapshot` per completed mutation.
//! - Write the full project list through the gateway after every mutation.
//!
//! # Invariants
//! - Observers only ever see whole snapshots; list replacement and the
//!   selected-chapters projection are swapped in one step.
//! - Chapter `order` values are dense in every published snapshot.
//! - Nothing returns an error to the caller: gateway and decode failures are
//!   logged and surfaced through `persist_status()` only.
//! - Lookups that miss by project id are silent no-ops without a save.
//! - Adding, deleting or rewriting a chapter records the project's total word
//!   count under today's date.
//!
//! Single writer: all mutating methods take `&mut self`. Hosts sharing a
//! store across threads wrap it in a `Mutex`.

use crate::model::chapter::{Chapter, ChapterId};
use crate::model::project::{today_key, Project, ProjectId};
use crate::repo::codec::{decode_projects, encode_projects};
use crate::repo::gateway::ProjectGateway;
use crate::service::export::project_stats;
use crate::service::ordering::{
    can_move, densify, is_dense, next_order, remove_and_densify, sorted_by_order, swap_adjacent,
    MoveDirection,
};
use log::{debug, error, info, warn};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

/// Immutable view of store state after one completed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Increments on every published change; `0` before `initialize`.
    pub revision: u64,
    /// All projects in display (insertion) order.
    pub projects: Vec<Project>,
    /// Currently selected project, if any.
    pub selected_project_id: Option<ProjectId>,
    /// Chapters of the selected project sorted by `order`; empty when none.
    pub selected_chapters: Vec<Chapter>,
}

impl StoreSnapshot {
    fn derive(revision: u64, projects: Vec<Project>, selected: Option<ProjectId>) -> Self {
        let selected_chapters = selected
            .as_ref()
            .and_then(|id| projects.iter().find(|project| &project.id == id))
            .map(|project| sorted_by_order(&project.chapters))
            .unwrap_or_default();
        Self {
            revision,
            projects,
            selected_project_id: selected,
            selected_chapters,
        }
    }

    /// Returns the selected project value.
    pub fn selected_project(&self) -> Option<&Project> {
        let id = self.selected_project_id.as_ref()?;
        self.projects.iter().find(|project| &project.id == id)
    }
}

/// Outcome of the most recent persistence attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    /// Nothing written since `initialize`.
    Clean,
    /// The snapshot at `revision` was written.
    Saved { revision: u64 },
    /// Writing the snapshot at `revision` failed; in-memory state is ahead of
    /// durable storage.
    Failed { revision: u64, message: String },
}

/// Single-owner state container for projects and chapters.
pub struct ProjectStore<G: ProjectGateway> {
    gateway: G,
    snapshot: Arc<StoreSnapshot>,
    subscribers: Vec<Sender<Arc<StoreSnapshot>>>,
    persist_status: PersistStatus,
}

impl<G: ProjectGateway> ProjectStore<G> {
    /// Creates an empty store without touching the gateway.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            snapshot: Arc::new(StoreSnapshot::default()),
            subscribers: Vec::new(),
            persist_status: PersistStatus::Clean,
        }
    }

    /// Creates a store and loads persisted state.
    pub fn open(gateway: G) -> Self {
        let mut store = Self::new(gateway);
        store.initialize();
        store
    }

    /// Loads persisted projects, replacing in-memory state.
    ///
    /// Missing, blank, unreadable or malformed documents all yield an empty
    /// store. Loaded projects with order drift are re-densified in memory.
    /// The first project becomes selected. Never saves.
    pub fn initialize(&mut self) {
        let started_at = Instant::now();
        let projects = match self.gateway.load() {
            Ok(Some(text)) => match decode_projects(&text) {
                Ok(projects) => repair_chapter_order(projects),
                Err(err) => {
                    warn!(
                        "event=store_init module=store status=error error_code=decode_failed error={}",
                        err
                    );
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(
                    "event=store_init module=store status=error error_code=load_failed error={}",
                    err
                );
                Vec::new()
            }
        };

        let selected = projects.first().map(|project| project.id.clone());
        info!(
            "event=store_init module=store status=ok projects={} duration_ms={}",
            projects.len(),
            started_at.elapsed().as_millis()
        );
        self.persist_status = PersistStatus::Clean;
        self.publish(projects, selected);
    }

    /// Returns the current snapshot handle.
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Registers an observer.
    ///
    /// The receiver immediately holds the current snapshot, then one snapshot
    /// per later change. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<Arc<StoreSnapshot>> {
        let (tx, rx) = mpsc::channel();
        if tx.send(self.snapshot()).is_ok() {
            self.subscribers.push(tx);
        }
        rx
    }

    /// All projects in display order.
    pub fn projects(&self) -> &[Project] {
        &self.snapshot.projects
    }

    /// Looks up one project by id.
    pub fn project(&self, project_id: &ProjectId) -> Option<&Project> {
        self.projects().iter().find(|project| &project.id == project_id)
    }

    /// Selected project id, if any.
    pub fn selected_project_id(&self) -> Option<&ProjectId> {
        self.snapshot.selected_project_id.as_ref()
    }

    /// Selected project value, if any.
    pub fn selected_project(&self) -> Option<&Project> {
        self.snapshot.selected_project()
    }

    /// Chapters of the selected project sorted by `order`.
    pub fn selected_chapters(&self) -> &[Chapter] {
        &self.snapshot.selected_chapters
    }

    /// Outcome of the most recent save.
    pub fn persist_status(&self) -> &PersistStatus {
        &self.persist_status
    }

    /// Underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Appends a new empty project; selects it when it is the only one.
    pub fn create_project(&mut self, name: impl Into<String>) -> Project {
        let project = Project::new(name);
        let mut projects = self.projects().to_vec();
        projects.push(project.clone());

        let selected = match self.selected_project_id() {
            None if projects.len() == 1 => Some(project.id.clone()),
            current => current.cloned(),
        };
        debug!(
            "event=project_create module=store status=ok project_id={} projects={}",
            project.id,
            projects.len()
        );
        self.publish(projects, selected);
        self.persist();
        project
    }

    /// Renames one project.
    pub fn rename_project(&mut self, project_id: &ProjectId, name: impl Into<String>) {
        let Some(project) = self.project(project_id) else {
            log_missing_project("project_rename", project_id);
            return;
        };
        let renamed = project.with_name(name);
        self.replace_project(renamed);
    }

    /// Sets the daily and total word goals of one project; `0` clears a goal.
    pub fn set_writing_goals(&mut self, project_id: &ProjectId, daily: u32, total: u32) {
        let Some(project) = self.project(project_id) else {
            log_missing_project("project_goals", project_id);
            return;
        };
        let updated = project.with_writing_goals(daily, total);
        debug!(
            "event=project_goals module=store status=ok project_id={} daily={} total={}",
            project_id, daily, total
        );
        self.replace_project(updated);
    }

    /// Removes one project and its chapters.
    ///
    /// When the removed project was selected, the first remaining project
    /// becomes selected (or none).
    pub fn delete_project(&mut self, project_id: &ProjectId) {
        if self.project(project_id).is_none() {
            log_missing_project("project_delete", project_id);
            return;
        }

        let projects: Vec<Project> = self
            .projects()
            .iter()
            .filter(|project| &project.id != project_id)
            .cloned()
            .collect();
        let selected = match self.selected_project_id() {
            Some(current) if current == project_id => {
                projects.first().map(|project| project.id.clone())
            }
            current => current.cloned(),
        };
        debug!(
            "event=project_delete module=store status=ok project_id={} projects={}",
            project_id,
            projects.len()
        );
        self.publish(projects, selected);
        self.persist();
    }

    /// Points the selection at `project_id`.
    ///
    /// Unknown ids keep the current selection. Never saves.
    pub fn select_project(&mut self, project_id: &ProjectId) {
        if self.project(project_id).is_none() {
            log_missing_project("project_select", project_id);
            return;
        }
        if self.selected_project_id() == Some(project_id) {
            return;
        }
        let projects = self.projects().to_vec();
        self.publish(projects, Some(project_id.clone()));
    }

    /// Appends a chapter at `order = chapter count`.
    ///
    /// Returns `None` when the project is unknown.
    pub fn add_chapter(
        &mut self,
        project_id: &ProjectId,
        title: impl Into<String>,
    ) -> Option<Chapter> {
        let Some(project) = self.project(project_id) else {
            log_missing_project("chapter_add", project_id);
            return None;
        };

        let chapter = Chapter::new(title, next_order(&project.chapters));
        let mut chapters = project.chapters.clone();
        chapters.push(chapter.clone());
        let updated = record_words_today(project.with_chapters(chapters));
        debug!(
            "event=chapter_add module=store status=ok project_id={} chapter_id={} order={}",
            project_id, chapter.id, chapter.order
        );
        self.replace_project(updated);
        Some(chapter)
    }

    /// Replaces one chapter title.
    pub fn update_chapter_title(
        &mut self,
        project_id: &ProjectId,
        chapter_id: &ChapterId,
        title: impl Into<String>,
    ) {
        let title = title.into();
        if let Some(updated) =
            self.update_chapter(project_id, chapter_id, "chapter_title", |chapter| {
                chapter.with_title(title.as_str())
            })
        {
            self.replace_project(updated);
        }
    }

    /// Replaces one chapter summary.
    pub fn update_chapter_summary(
        &mut self,
        project_id: &ProjectId,
        chapter_id: &ChapterId,
        summary: impl Into<String>,
    ) {
        let summary = summary.into();
        if let Some(updated) =
            self.update_chapter(project_id, chapter_id, "chapter_summary", |chapter| {
                chapter.with_summary(summary.as_str())
            })
        {
            self.replace_project(updated);
        }
    }

    /// Replaces one chapter body and records today's project word count.
    pub fn update_chapter_content(
        &mut self,
        project_id: &ProjectId,
        chapter_id: &ChapterId,
        content: impl Into<String>,
    ) {
        let content = content.into();
        if let Some(updated) =
            self.update_chapter(project_id, chapter_id, "chapter_content", |chapter| {
                chapter.with_content(content.as_str())
            })
        {
            self.replace_project(record_words_today(updated));
        }
    }

    /// Removes one chapter and renumbers the rest densely.
    pub fn delete_chapter(&mut self, project_id: &ProjectId, chapter_id: &ChapterId) {
        let Some(project) = self.project(project_id) else {
            log_missing_project("chapter_delete", project_id);
            return;
        };
        let chapters = remove_and_densify(&project.chapters, chapter_id);
        let updated = record_words_today(project.with_chapters(chapters));
        debug!(
            "event=chapter_delete module=store status=ok project_id={} chapter_id={} chapters={}",
            project_id,
            chapter_id,
            updated.chapters.len()
        );
        self.replace_project(updated);
    }

    /// Returns whether `move_chapter` would change anything.
    pub fn can_move_chapter(
        &self,
        project_id: &ProjectId,
        chapter_id: &ChapterId,
        direction: impl Into<MoveDirection>,
    ) -> bool {
        self.project(project_id)
            .map(|project| can_move(&project.chapters, chapter_id, direction.into()))
            .unwrap_or(false)
    }

    /// Moves one chapter a single slot up or down.
    ///
    /// Accepts a `MoveDirection` or a `move_up` flag. Edge positions and
    /// unknown ids are no-ops without a save.
    pub fn move_chapter(
        &mut self,
        project_id: &ProjectId,
        chapter_id: &ChapterId,
        direction: impl Into<MoveDirection>,
    ) {
        let direction = direction.into();
        let Some(project) = self.project(project_id) else {
            log_missing_project("chapter_move", project_id);
            return;
        };
        let Some(chapters) = swap_adjacent(&project.chapters, chapter_id, direction) else {
            debug!(
                "event=chapter_move module=store status=skip project_id={} chapter_id={} direction={:?}",
                project_id, chapter_id, direction
            );
            return;
        };
        let updated = project.with_chapters(chapters);
        debug!(
            "event=chapter_move module=store status=ok project_id={} chapter_id={} direction={:?}",
            project_id, chapter_id, direction
        );
        self.replace_project(updated);
    }

    /// Builds the project with `apply` run on the matching chapter.
    ///
    /// An unknown chapter still yields the (unchanged) project so the caller
    /// saves; only an unknown project yields `None`.
    fn update_chapter<F>(
        &self,
        project_id: &ProjectId,
        chapter_id: &ChapterId,
        event: &'static str,
        apply: F,
    ) -> Option<Project>
    where
        F: Fn(&Chapter) -> Chapter,
    {
        let Some(project) = self.project(project_id) else {
            log_missing_project(event, project_id);
            return None;
        };

        let mut found = false;
        let chapters = project
            .chapters
            .iter()
            .map(|chapter| {
                if &chapter.id == chapter_id {
                    found = true;
                    apply(chapter)
                } else {
                    chapter.clone()
                }
            })
            .collect();
        debug!(
            "event={} module=store status={} project_id={} chapter_id={}",
            event,
            if found { "ok" } else { "skip" },
            project_id,
            chapter_id
        );
        Some(project.with_chapters(chapters))
    }

    fn replace_project(&mut self, updated: Project) {
        let projects = self
            .projects()
            .iter()
            .map(|project| {
                if project.id == updated.id {
                    updated.clone()
                } else {
                    project.clone()
                }
            })
            .collect();
        let selected = self.selected_project_id().cloned();
        self.publish(projects, selected);
        self.persist();
    }

    fn publish(&mut self, projects: Vec<Project>, selected: Option<ProjectId>) {
        let revision = self.snapshot.revision + 1;
        let snapshot = Arc::new(StoreSnapshot::derive(revision, projects, selected));
        self.snapshot = Arc::clone(&snapshot);
        self.subscribers
            .retain(|subscriber| subscriber.send(Arc::clone(&snapshot)).is_ok());
    }

    fn persist(&mut self) {
        let revision = self.snapshot.revision;
        let result = encode_projects(self.projects())
            .map_err(|err| err.to_string())
            .and_then(|text| self.gateway.save(&text).map_err(|err| err.to_string()));

        self.persist_status = match result {
            Ok(()) => {
                debug!(
                    "event=store_save module=store status=ok revision={}",
                    revision
                );
                PersistStatus::Saved { revision }
            }
            Err(message) => {
                error!(
                    "event=store_save module=store status=error revision={} error={}",
                    revision, message
                );
                PersistStatus::Failed { revision, message }
            }
        };
    }
}

fn record_words_today(project: Project) -> Project {
    let words = project_stats(&project).word_count;
    project.with_word_count_on(today_key(), words)
}

fn repair_chapter_order(projects: Vec<Project>) -> Vec<Project> {
    projects
        .into_iter()
        .map(|project| {
            if is_dense(&project.chapters) {
                return project;
            }
            warn!(
                "event=store_init module=store status=repair project_id={} chapters={}",
                project.id,
                project.chapters.len()
            );
            let chapters = densify(&project.chapters);
            project.with_chapters(chapters)
        })
        .collect()
}

fn log_missing_project(event: &str, project_id: &ProjectId) {
    debug!(
        "event={} module=store status=skip reason=project_not_found project_id={}",
        event, project_id
    );
}

#[cfg(test)]
mod tests {
    use super::{PersistStatus, ProjectStore};
    use crate::repo::memory_gateway::MemoryGateway;

    #[test]
    fn new_store_is_empty_and_clean() {
        let store = ProjectStore::new(MemoryGateway::new());
        assert!(store.projects().is_empty());
        assert_eq!(store.selected_project_id(), None);
        assert_eq!(store.snapshot().revision, 0);
        assert_eq!(store.persist_status(), &PersistStatus::Clean);
    }

    #[test]
    fn every_mutation_bumps_revision_once() {
        let mut store = ProjectStore::open(MemoryGateway::new());
        let before = store.snapshot().revision;
        let project = store.create_project("Draft");
        store.add_chapter(&project.id, "One");
        assert_eq!(store.snapshot().revision, before + 2);
        assert_eq!(
            store.persist_status(),
            &PersistStatus::Saved {
                revision: before + 2
            }
        );
    }
}
