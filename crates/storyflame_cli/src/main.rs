//! Command-line host for the StoryFlame core.
//!
//! # Responsibility
//! - Drive `ProjectStore` operations from a shell against the same
//!   `projects.json` the desktop app uses.
//! - Keep output plain and line-oriented for scripting.

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use storyflame_core::{
    core_version, export_txt_to_path, init_logging, project_stats, ChapterId, FileGateway,
    LogLevel, MoveDirection, PersistStatus, Project, ProjectId, ProjectStore, StoreConfig,
};

#[derive(Debug, Parser)]
#[command(name = "storyflame", about = "Manage StoryFlame writing projects")]
struct Cli {
    /// Directory holding projects.json (defaults to $STORYFLAME_HOME or ~/.storyflame).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable rolling file logs at this level (written under <data-dir>/logs).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List projects and the chapters of each.
    List,
    /// Create an empty project.
    Create { name: String },
    /// Rename a project.
    RenameProject { project: String, name: String },
    /// Delete a project and its chapters.
    DeleteProject { project: String },
    /// Append a chapter to a project.
    AddChapter { project: String, title: String },
    /// Rename a chapter.
    RenameChapter {
        project: String,
        chapter: String,
        title: String,
    },
    /// Replace a chapter summary.
    SetSummary {
        project: String,
        chapter: String,
        summary: String,
    },
    /// Replace a chapter body with the contents of a file.
    SetContent {
        project: String,
        chapter: String,
        file: PathBuf,
    },
    /// Move a chapter one slot up or down.
    #[command(group = ArgGroup::new("direction").required(true).args(["up", "down"]))]
    MoveChapter {
        project: String,
        chapter: String,
        #[arg(long)]
        up: bool,
        #[arg(long)]
        down: bool,
    },
    /// Delete a chapter.
    DeleteChapter { project: String, chapter: String },
    /// Set the daily and total word goals (0 clears a goal).
    SetGoals {
        project: String,
        #[arg(long, default_value_t = 0)]
        daily: u32,
        #[arg(long, default_value_t = 0)]
        total: u32,
    },
    /// Print chapter and word counts with goal progress.
    Stats { project: String },
    /// Write a plain-text manuscript.
    Export { project: String, out: PathBuf },
    /// Print the core version.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Command::Version = cli.command {
        println!("storyflame_core version={}", core_version());
        return Ok(());
    }

    let config = match cli.data_dir {
        Some(dir) => StoreConfig::with_data_dir(absolute(dir)?),
        None => StoreConfig::resolve()?,
    };
    if let Some(level) = cli.log_level.as_deref() {
        let level: LogLevel = level.parse().context("invalid --log-level")?;
        init_logging(level, config.data_dir.join("logs"))
            .context("failed to start file logging")?;
    }

    let command = command_name(&cli.command);
    let mut store = ProjectStore::open(FileGateway::new(&config));
    if let Err(err) = run(&mut store, cli.command) {
        error!(
            "event=cli_command module=cli status=error command={} error_code=command_failed",
            command
        );
        return Err(err);
    }

    if let PersistStatus::Failed { revision, message } = store.persist_status() {
        error!(
            "event=cli_command module=cli status=error command={} error_code=save_failed revision={}",
            command, revision
        );
        bail!("changes were not saved: {message}");
    }
    info!(
        "event=cli_command module=cli status=ok command={} projects={}",
        command,
        store.projects().len()
    );
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List => "list",
        Command::Create { .. } => "create",
        Command::RenameProject { .. } => "rename-project",
        Command::DeleteProject { .. } => "delete-project",
        Command::AddChapter { .. } => "add-chapter",
        Command::RenameChapter { .. } => "rename-chapter",
        Command::SetSummary { .. } => "set-summary",
        Command::SetContent { .. } => "set-content",
        Command::MoveChapter { .. } => "move-chapter",
        Command::DeleteChapter { .. } => "delete-chapter",
        Command::SetGoals { .. } => "set-goals",
        Command::Stats { .. } => "stats",
        Command::Export { .. } => "export",
        Command::Version => "version",
    }
}

fn run(store: &mut ProjectStore<FileGateway>, command: Command) -> Result<()> {
    match command {
        Command::List => {
            for project in store.projects() {
                let marker = if store.selected_project_id() == Some(&project.id) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {} {}", project.id, project.name);
                for chapter in project.chapters_in_order() {
                    println!("    {:>3} {} {}", chapter.order, chapter.id, chapter.title);
                }
            }
        }
        Command::Create { name } => {
            let project = store.create_project(name);
            println!("{}", project.id);
        }
        Command::RenameProject { project, name } => {
            let project_id = find_project(store, &project)?.id.clone();
            store.rename_project(&project_id, name);
        }
        Command::DeleteProject { project } => {
            let project_id = find_project(store, &project)?.id.clone();
            store.delete_project(&project_id);
        }
        Command::AddChapter { project, title } => {
            let project_id = find_project(store, &project)?.id.clone();
            let chapter = store
                .add_chapter(&project_id, title)
                .ok_or_else(|| anyhow!("project disappeared: {project_id}"))?;
            println!("{}", chapter.id);
        }
        Command::RenameChapter {
            project,
            chapter,
            title,
        } => {
            let (project_id, chapter_id) = find_chapter(store, &project, &chapter)?;
            store.update_chapter_title(&project_id, &chapter_id, title);
        }
        Command::SetSummary {
            project,
            chapter,
            summary,
        } => {
            let (project_id, chapter_id) = find_chapter(store, &project, &chapter)?;
            store.update_chapter_summary(&project_id, &chapter_id, summary);
        }
        Command::SetContent {
            project,
            chapter,
            file,
        } => {
            let (project_id, chapter_id) = find_chapter(store, &project, &chapter)?;
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            store.update_chapter_content(&project_id, &chapter_id, content);
        }
        Command::MoveChapter {
            project,
            chapter,
            up,
            down: _,
        } => {
            let (project_id, chapter_id) = find_chapter(store, &project, &chapter)?;
            let direction = MoveDirection::from(up);
            if !store.can_move_chapter(&project_id, &chapter_id, direction) {
                bail!("chapter is already at the {} edge", if up { "top" } else { "bottom" });
            }
            store.move_chapter(&project_id, &chapter_id, direction);
        }
        Command::DeleteChapter { project, chapter } => {
            let (project_id, chapter_id) = find_chapter(store, &project, &chapter)?;
            store.delete_chapter(&project_id, &chapter_id);
        }
        Command::SetGoals {
            project,
            daily,
            total,
        } => {
            let project_id = find_project(store, &project)?.id.clone();
            store.set_writing_goals(&project_id, daily, total);
        }
        Command::Stats { project } => {
            let project = find_project(store, &project)?;
            let stats = project_stats(project);
            println!(
                "chapters={} words={} today={} daily_goal={} total_goal={}",
                stats.chapter_count,
                stats.word_count,
                stats.words_today,
                stats.daily_writing_goal,
                stats.total_writing_goal
            );
        }
        Command::Export { project, out } => {
            let project = find_project(store, &project)?;
            export_txt_to_path(project, &out)?;
            info!(
                "event=cli_export module=cli status=ok project_id={} chapters={}",
                project.id,
                project.chapters.len()
            );
        }
        Command::Version => {}
    }
    Ok(())
}

/// Resolves a project by id or exact name.
fn find_project<'a>(store: &'a ProjectStore<FileGateway>, reference: &str) -> Result<&'a Project> {
    if let Some(project) = store.project(&ProjectId::from(reference)) {
        return Ok(project);
    }

    let mut matches = store
        .projects()
        .iter()
        .filter(|project| project.name == reference);
    match (matches.next(), matches.next()) {
        (Some(project), None) => Ok(project),
        (Some(_), Some(_)) => bail!("project name `{reference}` is ambiguous; use its id"),
        (None, _) => bail!("project not found: {reference}"),
    }
}

/// Resolves a chapter by id or exact title inside a project.
fn find_chapter(
    store: &ProjectStore<FileGateway>,
    project: &str,
    reference: &str,
) -> Result<(ProjectId, ChapterId)> {
    let project = find_project(store, project)?;
    let id = ChapterId::from(reference);
    if project.chapter(&id).is_some() {
        return Ok((project.id.clone(), id));
    }

    let mut matches = project
        .chapters
        .iter()
        .filter(|chapter| chapter.title == reference);
    match (matches.next(), matches.next()) {
        (Some(chapter), None) => Ok((project.id.clone(), chapter.id.clone())),
        (Some(_), Some(_)) => bail!("chapter title `{reference}` is ambiguous; use its id"),
        (None, _) => bail!("chapter not found: {reference}"),
    }
}

fn absolute(dir: PathBuf) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir);
    }
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    Ok(cwd.join(dir))
}
