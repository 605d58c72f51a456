//! Task dispatch.
//!
//! Runs the task table in order: resolve each task's files, then write its
//! bundle. A task never stops the loop; its result is recorded in the
//! [`RunSummary`].

use crate::bundle;
use crate::config::Config;
use crate::models::{RunSummary, SkipReason, Task, TaskOutcome, TaskStatus};
use crate::scanner;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Options for a dispatch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Resolve only; write nothing.
    pub dry_run: bool,
    /// Draw a progress bar over the tasks.
    pub show_progress: bool,
}

/// Run every task of `config`, in table order.
pub fn run_tasks(config: &Config, options: RunOptions) -> RunSummary {
    let started_at = Utc::now();
    let start = Instant::now();
    let tasks = config.tasks();

    let progress = if options.show_progress {
        let pb = ProgressBar::new(tasks.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut outcomes = Vec::with_capacity(tasks.len());

    for task in &tasks {
        progress.set_message(task.output_name.clone());

        let outcome = progress.suspend(|| run_task(task, &config.output_dir, options.dry_run));
        outcomes.push(outcome);

        progress.inc(1);
    }

    progress.finish_and_clear();

    RunSummary {
        started_at,
        base_dir: config.base_dir.clone(),
        output_dir: config.output_dir.clone(),
        dry_run: options.dry_run,
        tasks: outcomes,
        duration_seconds: start.elapsed().as_secs_f64(),
    }
}

/// Run a single task.
pub fn run_task(task: &Task, output_dir: &Path, dry_run: bool) -> TaskOutcome {
    let status = match scanner::resolve(task) {
        Err(e) => {
            warn!("{}: {}, skipping", task.output_name, e);
            TaskStatus::Skipped(SkipReason::from(e))
        }
        Ok(files) if files.is_empty() => {
            info!(
                "  -> No files found for {} with extensions [{}]",
                task.output_name,
                task.extensions_label()
            );
            TaskStatus::Skipped(SkipReason::NoMatches)
        }
        Ok(files) => {
            let output = task.output_path(output_dir);

            if dry_run {
                TaskStatus::Planned { output, files }
            } else {
                match bundle::write_bundle(&files, &output) {
                    Ok(stats) => {
                        info!(
                            "==> Wrote '{}' ({} files)",
                            output.display(),
                            stats.records
                        );
                        TaskStatus::Written {
                            output,
                            files: stats.records,
                            read_failures: stats.read_failures,
                            bytes: stats.content_bytes,
                        }
                    }
                    Err(e) => {
                        error!("{}: {}", task.output_name, e);
                        TaskStatus::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            }
        }
    };

    TaskOutcome {
        task: task.output_name.clone(),
        status,
    }
}
