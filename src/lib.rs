// src/lib.rs

pub mod cli;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod project;
pub mod store;
pub mod types;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use tracing::debug;

use crate::cli::{CliArgs, Command};
use crate::dag::Snapshot;
use crate::engine::{Edit, EditPlan, IntegrityReport, Session};
use crate::fs::RealFileSystem;
use crate::project::default_project_path;
use crate::store::{FileStore, TaskStore};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project file resolution and ownership
/// - the file-backed store
/// - the edit session
/// - command output on stdout
pub fn run(args: CliArgs) -> Result<()> {
    let path = args
        .project
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(default_project_path);
    let owner = args.owner.clone().unwrap_or_else(default_owner);

    let store = FileStore::open_or_create(RealFileSystem, &path, &owner)?;

    if args.owner.is_some() {
        let recorded = store.load_project()?.project.owner;
        if recorded != owner {
            bail!(
                "project {} belongs to '{}', not '{}'",
                path.display(),
                recorded,
                owner
            );
        }
    }

    debug!(path = ?path, "project opened");

    let session = Session::new(store);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&session, args.command, &mut out)
}

/// Execute one CLI command against `session`, writing human-readable output
/// to `out`.
pub fn execute<S: TaskStore, W: Write>(
    session: &Session<S>,
    command: Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::List => {
            let snapshot = session.snapshot()?;
            print_tasks(&snapshot, out)?;
        }
        Command::Add {
            title,
            start,
            duration,
            id,
        } => {
            let outcome = session.apply(&Edit::Create {
                title,
                start,
                duration_days: duration,
                id,
            })?;
            for m in outcome.plan.mutations.iter() {
                writeln!(out, "created {}", m.task_id())?;
            }
        }
        Command::Shift { id, date, dry_run } => {
            let before = session.snapshot()?;
            let edit = Edit::Shift {
                id: id.clone(),
                start: date,
            };
            let plan = if dry_run {
                session.preview(&edit)?
            } else {
                session.apply(&edit)?.plan
            };
            print_shift(&before, &id, &plan, dry_run, out)?;
        }
        Command::Depend { id, parent } => {
            let outcome = session.apply(&Edit::AddDependency {
                id: id.clone(),
                parent: parent.clone(),
            })?;
            report_change(out, outcome.written, &format!("{id} now depends on {parent}"))?;
        }
        Command::Undepend { id, parent } => {
            let outcome = session.apply(&Edit::RemoveDependency {
                id: id.clone(),
                parent: parent.clone(),
            })?;
            report_change(out, outcome.written, &format!("{id} no longer depends on {parent}"))?;
        }
        Command::Rename { id, title } => {
            let outcome = session.apply(&Edit::SetTitle {
                id: id.clone(),
                title,
            })?;
            report_change(out, outcome.written, &format!("renamed {id}"))?;
        }
        Command::Duration { id, days } => {
            let outcome = session.apply(&Edit::SetDuration {
                id: id.clone(),
                days,
            })?;
            report_change(out, outcome.written, &format!("{id} now lasts {days} day(s)"))?;
        }
        Command::Delete { id } => {
            let outcome = session.apply(&Edit::Delete { id: id.clone() })?;
            report_change(out, outcome.written, &format!("deleted {id}"))?;
        }
        Command::Check => {
            let report = session.check()?;
            print_report(&report, out)?;
        }
    }
    Ok(())
}

fn default_owner() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "local".to_string())
}

fn report_change<W: Write>(out: &mut W, written: usize, message: &str) -> Result<()> {
    if written == 0 {
        writeln!(out, "no changes")?;
    } else {
        writeln!(out, "{message}")?;
    }
    Ok(())
}

/// Task table in creation order.
fn print_tasks<W: Write>(snapshot: &Snapshot, out: &mut W) -> Result<()> {
    if snapshot.is_empty() {
        writeln!(out, "no tasks")?;
        return Ok(());
    }

    let id_width = snapshot
        .iter()
        .map(|t| t.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    writeln!(
        out,
        "{:<id_width$}  {:<10}  {:<10}  {:>4}  {:<20}  TITLE",
        "ID", "START", "FINISH", "DAYS", "DEPENDS ON"
    )?;
    for task in snapshot.iter() {
        let finish = task
            .finish()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let deps = if task.depends_on.is_empty() {
            "-".to_string()
        } else {
            task.depends_on.join(",")
        };
        writeln!(
            out,
            "{:<id_width$}  {:<10}  {:<10}  {:>4}  {:<20}  {}",
            task.id, task.start, finish, task.duration_days, deps, task.title
        )?;
    }
    Ok(())
}

fn print_shift<W: Write>(
    before: &Snapshot,
    id: &str,
    plan: &EditPlan,
    dry_run: bool,
    out: &mut W,
) -> Result<()> {
    let Some(shift) = plan.shift.as_ref() else {
        if before.contains(id) {
            writeln!(out, "start date unchanged; nothing to shift")?;
        } else {
            writeln!(out, "task '{id}' not found; nothing to shift")?;
        }
        return Ok(());
    };

    let verb = if dry_run { "would shift" } else { "shifted" };
    writeln!(
        out,
        "{verb} {} task(s) by {:+} day(s):",
        shift.len(),
        shift.delta()
    )?;
    for (task, new_start) in shift.iter() {
        match before.get(task) {
            Some(old) => writeln!(out, "  {task}: {} -> {new_start}", old.start)?,
            None => writeln!(out, "  {task}: -> {new_start}")?,
        }
    }
    Ok(())
}

fn print_report<W: Write>(report: &IntegrityReport, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{} task(s), {} dependency link(s)",
        report.task_count, report.edge_count
    )?;
    for cycle in report.cycles.iter() {
        writeln!(out, "cycle: {}", cycle.join(" <-> "))?;
    }
    for d in report.dangling.iter() {
        writeln!(
            out,
            "dangling: {} depends on missing task {}",
            d.task, d.missing_parent
        )?;
    }
    if report.is_clean() {
        writeln!(out, "ok")?;
    }
    Ok(())
}
