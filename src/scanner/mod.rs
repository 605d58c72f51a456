//! Path resolution for bundling tasks.
//!
//! A task resolves either recursively, by expanding one glob per extension
//! under the base directory, or flat, by listing the immediate children of a
//! single directory. Both modes return a deduplicated list sorted by path.

use crate::models::{PatternMode, SkipReason, Task};
use glob::MatchOptions;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Error preventing a task from resolving any file.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("directory '{}' not found", .0.display())]
    MissingDirectory(PathBuf),

    #[error("cannot read directory '{}': {source}", .path.display())]
    UnreadableDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("path '{}' is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),
}

impl From<ResolveError> for SkipReason {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::MissingDirectory(path) => SkipReason::MissingDirectory { path },
            ResolveError::UnreadableDirectory { path, source } => {
                SkipReason::UnreadableDirectory {
                    path,
                    error: source.to_string(),
                }
            }
            ResolveError::InvalidPattern { pattern, source } => SkipReason::InvalidPattern {
                pattern,
                error: source.to_string(),
            },
            ResolveError::NonUtf8Path(path) => SkipReason::InvalidPattern {
                pattern: path.to_string_lossy().to_string(),
                error: "path is not valid UTF-8".to_string(),
            },
        }
    }
}

/// Resolve a task's files.
///
/// Errors are soft: the dispatcher turns them into a skipped task.
pub fn resolve(task: &Task) -> Result<Vec<PathBuf>, ResolveError> {
    match &task.mode {
        PatternMode::Recursive(pattern) => {
            resolve_recursive(&task.base_dir, pattern, &task.extensions)
        }
        PatternMode::Flat(dir) => resolve_flat(&task.base_dir.join(dir), &task.extensions),
    }
}

/// Glob `base_dir/pattern + ext` for every extension and merge the results.
///
/// The base directory is escaped so its name is never read as glob syntax.
/// Matches are returned under the pattern's literal prefix as written, so a
/// base of `.` yields `./app/src/...` just like flat mode.
fn resolve_recursive(
    base_dir: &Path,
    pattern: &str,
    extensions: &[String],
) -> Result<Vec<PathBuf>, ResolveError> {
    let base = base_dir
        .to_str()
        .ok_or_else(|| ResolveError::NonUtf8Path(base_dir.to_path_buf()))?;
    let glob_prefix = Path::new(&glob::Pattern::escape(base)).join(pattern);
    let glob_prefix = glob_prefix.to_string_lossy();

    let literal_prefix = literal_prefix(base_dir, pattern);
    let normalized_prefix = without_cur_dir(&literal_prefix);

    // Hidden entries only match a literal leading dot
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut found: HashSet<PathBuf> = HashSet::new();

    for ext in extensions {
        let full_pattern = format!("{}{}", glob_prefix, ext);
        info!("Searching with pattern: {}", full_pattern);

        let paths = glob::glob_with(&full_pattern, options).map_err(|source| {
            ResolveError::InvalidPattern {
                pattern: full_pattern.clone(),
                source,
            }
        })?;

        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => {
                    found.insert(reprefix(&path, &literal_prefix, &normalized_prefix));
                }
                Ok(path) => debug!("Ignoring non-file match: {}", path.display()),
                Err(e) => warn!("Cannot read {}: {}", e.path().display(), e.error()),
            }
        }
    }

    let mut files: Vec<PathBuf> = found.into_iter().collect();
    sort_paths(&mut files);
    Ok(files)
}

/// `base_dir` joined with the components of `pattern` before its first
/// wildcard, spelled exactly as configured.
fn literal_prefix(base_dir: &Path, pattern: &str) -> PathBuf {
    let mut prefix = base_dir.to_path_buf();
    for part in pattern.split('/') {
        if part.contains(['*', '?', '[']) {
            break;
        }
        if !part.is_empty() {
            prefix.push(part);
        }
    }
    prefix
}

/// Drop `.` components; glob results never carry them.
fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Rewrite a glob match so it starts with the configured literal prefix.
fn reprefix(path: &Path, literal: &Path, normalized: &Path) -> PathBuf {
    match without_cur_dir(path).strip_prefix(normalized) {
        Ok(rest) => literal.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// List the regular files directly inside `dir` whose name ends with one of
/// the extensions.
fn resolve_flat(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ResolveError> {
    if !dir.is_dir() {
        return Err(ResolveError::MissingDirectory(dir.to_path_buf()));
    }

    info!(
        "Scanning directory '{}' for extensions [{}]",
        dir.display(),
        extensions.join(", ")
    );

    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ResolveError::UnreadableDirectory {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                warn!("Skipping entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy();
        if !has_extension(&name, extensions) {
            continue;
        }

        // `Path::is_file` follows symlinks, unlike the walk entry's own type
        let path = entry.into_path();
        if path.is_file() {
            files.push(path);
        }
    }

    sort_paths(&mut files);
    Ok(files)
}

/// Plain suffix match, so extensions carry their leading dot.
pub fn has_extension(name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Byte-wise ordering of the path strings.
fn sort_paths(files: &mut [PathBuf]) {
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
}
