//! Data models for the source bundler.
//!
//! This module contains the core data structures shared by the resolver,
//! the bundle writer and the dispatcher: tasks, pattern modes, file records
//! and the per-run summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// How a task's directory pattern is turned into a file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternMode {
    /// Glob expansion; the string is the expanded pattern without extension.
    Recursive(String),
    /// Literal subdirectory of the base directory, scanned one level deep.
    Flat(PathBuf),
}

impl PatternMode {
    /// Choose the mode for a directory pattern.
    ///
    /// Any `*` selects recursive mode. A trailing `dir/*` is widened to
    /// `dir/**/*` so that it descends into every subdirectory.
    pub fn from_dir_pattern(dir_pattern: &str) -> Self {
        if !dir_pattern.contains('*') {
            return PatternMode::Flat(PathBuf::from(dir_pattern));
        }

        let expanded = match dir_pattern.strip_suffix("/*") {
            Some(prefix) => format!("{}/**/*", prefix),
            None => dir_pattern.to_string(),
        };
        PatternMode::Recursive(expanded)
    }
}

impl fmt::Display for PatternMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternMode::Recursive(pattern) => write!(f, "recursive {}", pattern),
            PatternMode::Flat(dir) => write!(f, "flat {}", dir.display()),
        }
    }
}

/// One configured bundling task, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Name of the file written inside the output directory.
    pub output_name: String,
    /// Directory the pattern is resolved against.
    pub base_dir: PathBuf,
    /// Directory pattern as configured.
    pub dir_pattern: String,
    /// Extensions to match, including the leading dot (e.g. ".css").
    pub extensions: Vec<String>,
    /// Resolution mode derived from `dir_pattern`.
    pub mode: PatternMode,
}

impl Task {
    /// Create a task; the pattern mode is fixed here, once.
    pub fn new(
        output_name: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        dir_pattern: impl Into<String>,
        extensions: Vec<String>,
    ) -> Self {
        let dir_pattern = dir_pattern.into();
        let mode = PatternMode::from_dir_pattern(&dir_pattern);

        Self {
            output_name: output_name.into(),
            base_dir: base_dir.into(),
            dir_pattern,
            extensions,
            mode,
        }
    }

    /// Path of this task's artifact inside `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.output_name)
    }

    /// Extensions formatted for log lines.
    pub fn extensions_label(&self) -> String {
        self.extensions.join(", ")
    }
}

/// Content of a source file read for bundling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path as resolved (used verbatim in the record header).
    pub path: PathBuf,
    /// Decoded text content.
    pub content: String,
    /// True if invalid UTF-8 sequences were replaced while decoding.
    pub lossy: bool,
}

/// Error reading a single source file.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// Path of the file that failed to read.
    pub fn path(&self) -> &Path {
        match self {
            ReadError::Io { path, .. } => path,
        }
    }
}

/// Why a task produced no output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The pattern resolved, but no file matched.
    NoMatches,
    /// Flat mode: the target directory does not exist.
    MissingDirectory { path: PathBuf },
    /// Flat mode: the target directory could not be listed.
    UnreadableDirectory { path: PathBuf, error: String },
    /// Recursive mode: the glob pattern is invalid.
    InvalidPattern { pattern: String, error: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMatches => write!(f, "no matching files"),
            SkipReason::MissingDirectory { path } => {
                write!(f, "directory '{}' not found", path.display())
            }
            SkipReason::UnreadableDirectory { path, error } => {
                write!(f, "directory '{}' unreadable: {}", path.display(), error)
            }
            SkipReason::InvalidPattern { pattern, error } => {
                write!(f, "invalid pattern '{}': {}", pattern, error)
            }
        }
    }
}

/// What happened to one task during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// The bundle was written.
    Written {
        output: PathBuf,
        files: usize,
        read_failures: usize,
        bytes: u64,
    },
    /// Dry run: files that would be bundled.
    Planned { output: PathBuf, files: Vec<PathBuf> },
    /// Nothing was written; any previous artifact is untouched.
    Skipped(SkipReason),
    /// The output file could not be written.
    Failed { error: String },
}

/// Outcome of a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    /// The task's output file name.
    pub task: String,
    /// Final status.
    #[serde(flatten)]
    pub status: TaskStatus,
}

/// Summary of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Base directory shared by all tasks.
    pub base_dir: PathBuf,
    /// Output directory shared by all tasks.
    pub output_dir: PathBuf,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Per-task outcomes, in table order.
    pub tasks: Vec<TaskOutcome>,
    /// Wall-clock duration in seconds.
    pub duration_seconds: f64,
}

impl RunSummary {
    /// Number of tasks that wrote (or would write) a bundle.
    pub fn written(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| {
                matches!(
                    t.status,
                    TaskStatus::Written { .. } | TaskStatus::Planned { .. }
                )
            })
            .count()
    }

    /// Number of skipped tasks.
    pub fn skipped(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.status, TaskStatus::Skipped(_)))
            .count()
    }

    /// Number of failed tasks.
    pub fn failed(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.status, TaskStatus::Failed { .. }))
            .count()
    }

    /// Total files bundled across all written tasks.
    pub fn total_files(&self) -> usize {
        self.tasks
            .iter()
            .map(|t| match &t.status {
                TaskStatus::Written { files, .. } => *files,
                TaskStatus::Planned { files, .. } => files.len(),
                _ => 0,
            })
            .sum()
    }
}
