//! Plain-text manuscript export and word statistics.
//!
//! # Responsibility
//! - Count words in chapter bodies stored as markdown or HTML.
//! - Render a project as a plain-text manuscript in display order.
//!
//! # Invariants
//! - HTML tags never count as words.
//! - Export walks chapters by `order`, not by slice position.

use crate::model::project::Project;
use crate::service::ordering::sorted_by_order;
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static HTML_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(nbsp|#160);").expect("valid entity regex"));

const SEPARATOR: &str = "----------------------------------------";

/// Export failure.
#[derive(Debug)]
pub enum ExportError {
    /// Output file could not be created or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to export to `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Aggregate counters for one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub chapter_count: usize,
    pub word_count: usize,
    /// Word count recorded for today; `0` when nothing was written today.
    pub words_today: usize,
    pub daily_writing_goal: u32,
    pub total_writing_goal: u32,
}

/// Counts whitespace-separated words, ignoring HTML markup.
pub fn count_words(text: &str) -> usize {
    let without_tags = HTML_TAG_RE.replace_all(text, " ");
    let without_entities = HTML_ENTITY_RE.replace_all(&without_tags, " ");
    without_entities.split_whitespace().count()
}

/// Computes chapter and word totals plus goal progress for `project`.
pub fn project_stats(project: &Project) -> ProjectStats {
    ProjectStats {
        chapter_count: project.chapters.len(),
        word_count: project
            .chapters
            .iter()
            .map(|chapter| count_words(&chapter.content))
            .sum(),
        words_today: project.words_today().unwrap_or(0),
        daily_writing_goal: project.daily_writing_goal,
        total_writing_goal: project.total_writing_goal,
    }
}

/// Writes `project` as a plain-text manuscript.
pub fn export_txt<W: Write>(project: &Project, out: &mut W) -> std::io::Result<()> {
    let name = non_blank_or(&project.name, "Untitled Project");
    writeln!(out, "Project Title: {name}")?;
    writeln!(out)?;

    let chapters = sorted_by_order(&project.chapters);
    if chapters.is_empty() {
        writeln!(out, "This project has no chapters.")?;
        return Ok(());
    }

    for (index, chapter) in chapters.iter().enumerate() {
        writeln!(out, "{SEPARATOR}")?;
        writeln!(
            out,
            "Chapter {}: {}",
            index + 1,
            non_blank_or(&chapter.title, "Untitled Chapter")
        )?;
        writeln!(out)?;
        writeln!(out, "Summary:")?;
        writeln!(out, "{}", non_empty_or(&chapter.summary, "No summary provided."))?;
        writeln!(out)?;
        writeln!(out, "Content:")?;
        writeln!(out, "{}", non_empty_or(&chapter.content, "No content provided."))?;
        writeln!(out)?;
    }
    writeln!(out, "{SEPARATOR}")?;
    writeln!(out, "End of Project Export")?;
    Ok(())
}

/// Writes the manuscript for `project` to `path`, replacing any existing file.
///
/// # Errors
/// - `ExportError::Io` when the file cannot be created or written.
pub fn export_txt_to_path(project: &Project, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let to_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let result = File::create(path).map_err(to_error).and_then(|file| {
        let mut out = BufWriter::new(file);
        export_txt(project, &mut out)
            .and_then(|()| out.flush())
            .map_err(to_error)
    });

    match &result {
        Ok(()) => info!(
            "event=project_export module=export status=ok project_id={} chapters={}",
            project.id,
            project.chapters.len()
        ),
        Err(err) => error!(
            "event=project_export module=export status=error project_id={} error={}",
            project.id, err
        ),
    }
    result
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
