//! Task table and run configuration.
//!
//! The task table is compiled in: each entry maps an output file name to a
//! source directory pattern and one or more extensions. Command-line flags
//! can move the base and output directories or select a subset of tasks,
//! but there is no configuration file.

use crate::models::Task;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Default directory the patterns are resolved against.
pub const DEFAULT_BASE_DIR: &str = ".";

/// Default directory receiving the bundles.
pub const DEFAULT_OUTPUT_DIR: &str = "tmp_IA";

/// Extensions for one table entry: a single value or a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionSpec {
    One(&'static str),
    Many(&'static [&'static str]),
}

impl ExtensionSpec {
    /// Normalize to an ordered list.
    pub fn to_vec(self) -> Vec<String> {
        match self {
            ExtensionSpec::One(ext) => vec![ext.to_string()],
            ExtensionSpec::Many(exts) => exts.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// One row of the task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskEntry {
    /// Output file name, also the task's identity.
    pub output: &'static str,
    /// Directory pattern; `dir` is scanned flat, `dir/*` recursively.
    pub dir: &'static str,
    /// Extensions to collect.
    pub extensions: ExtensionSpec,
}

/// Built-in task table, in execution order.
pub const BUILTIN_TASKS: &[TaskEntry] = &[
    // Web application
    TaskEntry {
        output: "all_html.txt",
        dir: ".",
        extensions: ExtensionSpec::One(".html"),
    },
    TaskEntry {
        output: "all_html_templates.txt",
        dir: "templates",
        extensions: ExtensionSpec::One(".html"),
    },
    TaskEntry {
        output: "all_css.txt",
        dir: "css",
        extensions: ExtensionSpec::One(".css"),
    },
    TaskEntry {
        output: "all_js.txt",
        dir: "js",
        extensions: ExtensionSpec::One(".js"),
    },
    TaskEntry {
        output: "all_texts_js.txt",
        dir: "js/texts",
        extensions: ExtensionSpec::One(".js"),
    },
    TaskEntry {
        output: "all_php.txt",
        dir: "api",
        extensions: ExtensionSpec::One(".php"),
    },
    // C++ / Qt application
    TaskEntry {
        output: "all_cpp.txt",
        dir: ".",
        extensions: ExtensionSpec::One(".cpp"),
    },
    TaskEntry {
        output: "all_h.txt",
        dir: ".",
        extensions: ExtensionSpec::One(".h"),
    },
    TaskEntry {
        output: "all_ui.txt",
        dir: ".",
        extensions: ExtensionSpec::One(".ui"),
    },
    TaskEntry {
        output: "all_qrc.txt",
        dir: ".",
        extensions: ExtensionSpec::One(".qrc"),
    },
    TaskEntry {
        output: "all_pro.txt",
        dir: ".",
        extensions: ExtensionSpec::One(".pro"),
    },
    TaskEntry {
        output: "all_plist.txt",
        dir: ".",
        extensions: ExtensionSpec::One(".plist"),
    },
    // Android application
    TaskEntry {
        output: "all_kt_java_xml.txt",
        dir: "app/src/*",
        extensions: ExtensionSpec::Many(&[".java", ".xml", ".kt"]),
    },
    TaskEntry {
        output: "all_gradle.txt",
        dir: "./*",
        extensions: ExtensionSpec::Many(&[".gradle"]),
    },
];

/// Run configuration: shared directories plus the task table.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for every task.
    pub base_dir: PathBuf,
    /// Output directory for every task.
    pub output_dir: PathBuf,
    /// Table rows to run, in order.
    pub entries: Vec<TaskEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Config {
    /// Configuration with the built-in table and default directories.
    pub fn builtin() -> Self {
        Self::with_entries(BUILTIN_TASKS.to_vec())
    }

    /// Configuration over an explicit table, with default directories.
    pub fn with_entries(entries: Vec<TaskEntry>) -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            entries,
        }
    }

    /// Names of all tasks in the table.
    pub fn task_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.output).collect()
    }

    /// Build the immutable task list, in table order.
    pub fn tasks(&self) -> Vec<Task> {
        self.entries
            .iter()
            .map(|entry| {
                Task::new(
                    entry.output,
                    self.base_dir.clone(),
                    entry.dir,
                    entry.extensions.to_vec(),
                )
            })
            .collect()
    }

    /// Apply command-line overrides.
    ///
    /// `--only` keeps the selected tasks in table order; an unknown name is
    /// an error.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) -> Result<()> {
        self.base_dir = args.root.clone();
        self.output_dir = args.output_dir.clone();

        if let Some(ref only) = args.only {
            let known = self.task_names();
            if let Some(unknown) = only.iter().find(|name| !known.contains(&name.as_str())) {
                bail!(
                    "Unknown task '{}'. Known tasks: {}",
                    unknown,
                    known.join(", ")
                );
            }
            self.entries.retain(|e| only.iter().any(|name| name == e.output));
        }

        Ok(())
    }
}
