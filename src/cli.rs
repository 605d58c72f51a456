//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values. Every flag is optional:
//! a bare `srcbundle` runs the built-in task table from the current
//! directory.

use crate::config::{DEFAULT_BASE_DIR, DEFAULT_OUTPUT_DIR};
use clap::Parser;
use std::path::PathBuf;

/// srcbundle - bundle project sources into one text file per task
///
/// Each built-in task collects the files of one or more extensions from a
/// directory (flat) or a directory tree (`dir/*`, recursive) and writes
/// them, each preceded by a header naming its path, to a single file.
///
/// Examples:
///   srcbundle
///   srcbundle --root ./my-app --output-dir bundles
///   srcbundle --only all_css.txt,all_js.txt
///   srcbundle --dry-run --format json
///   srcbundle --list-tasks
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Project directory the task patterns are resolved against
    #[arg(
        long,
        value_name = "DIR",
        default_value = DEFAULT_BASE_DIR,
        env = "SRCBUNDLE_ROOT"
    )]
    pub root: PathBuf,

    /// Directory receiving one bundle file per task
    #[arg(
        short,
        long,
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        env = "SRCBUNDLE_OUTPUT_DIR"
    )]
    pub output_dir: PathBuf,

    /// Only run these tasks (comma-separated output names)
    ///
    /// Example: --only all_css.txt,all_js.txt
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub only: Option<Vec<String>>,

    /// Resolve every task and list the matched files without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Print the task table and exit
    #[arg(long)]
    pub list_tasks: bool,

    /// Format of the end-of-run summary (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err("Output directory must not be empty".to_string());
        }

        if let Some(ref only) = self.only {
            if only.iter().any(|name| name.trim().is_empty()) {
                return Err("--only contains an empty task name".to_string());
            }
        }

        // --list-tasks does not touch the filesystem
        if self.list_tasks {
            return Ok(());
        }

        if !self.root.exists() {
            return Err(format!(
                "Root directory does not exist: {}",
                self.root.display()
            ));
        }
        if !self.root.is_dir() {
            return Err(format!(
                "Root path is not a directory: {}",
                self.root.display()
            ));
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            root: PathBuf::from("."),
            output_dir: PathBuf::from("tmp_IA"),
            only: None,
            dry_run: false,
            list_tasks: false,
            format: OutputFormat::Text,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_defaults_need_no_arguments() {
        let args = Args::try_parse_from(["srcbundle"]).unwrap();
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.output_dir, PathBuf::from("tmp_IA"));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.only.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_only_is_comma_separated() {
        let args =
            Args::try_parse_from(["srcbundle", "--only", "all_css.txt,all_js.txt"]).unwrap();
        assert_eq!(
            args.only,
            Some(vec!["all_css.txt".to_string(), "all_js.txt".to_string()])
        );
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_root() {
        let mut args = make_args();
        args.root = PathBuf::from("/definitely/not/a/real/dir");
        assert!(args.validate().is_err());

        args.list_tasks = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_task_name() {
        let mut args = make_args();
        args.only = Some(vec!["all_css.txt".to_string(), " ".to_string()]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
