//! srcbundle - bundle project sources into per-task text files
//!
//! A CLI tool that walks a project tree and concatenates the files of
//! each configured task into a single annotated text file, ready to be
//! fed to a text-processing pipeline.
//!
//! Exit codes:
//!   0 - Success (including skipped tasks and unreadable source files)
//!   1 - Invalid arguments or output directory cannot be created

mod bundle;
mod cli;
mod config;
mod dispatch;
mod models;
mod scanner;

use anyhow::Result;
use cli::{Args, OutputFormat};
use config::Config;
use dispatch::RunOptions;
use models::{RunSummary, TaskStatus};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mut config = Config::builtin();
    if let Err(e) = config.merge_with_args(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --list-tasks early (no logging needed)
    if args.list_tasks {
        print_task_table(&config);
        return Ok(());
    }

    // Initialize logging
    init_logging(&args);

    info!("srcbundle v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_bundle(&args, &config) {
        error!("Bundle run failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run every task and print the summary.
fn run_bundle(args: &Args, config: &Config) -> Result<()> {
    let quiet = args.quiet || args.format == OutputFormat::Json;

    if !args.dry_run && bundle::ensure_output_dir(&config.output_dir)? && !quiet {
        println!(
            "📁 Created output directory '{}'",
            config.output_dir.display()
        );
    }

    if !quiet {
        println!(
            "🚀 Bundling {} task(s) from '{}'{}\n",
            config.entries.len(),
            config.base_dir.display(),
            if args.dry_run { " (dry run)" } else { "" }
        );
    }

    let options = RunOptions {
        dry_run: args.dry_run,
        show_progress: !quiet && !args.verbose,
    };
    let summary = dispatch::run_tasks(config, options);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text if !args.quiet => print_summary(&summary),
        OutputFormat::Text => {}
    }

    Ok(())
}

/// Print the human-readable run summary.
fn print_summary(summary: &RunSummary) {
    println!("\n📊 Bundle Summary:");

    for outcome in &summary.tasks {
        match &outcome.status {
            TaskStatus::Written {
                output,
                files,
                read_failures,
                ..
            } => {
                print!("   ✅ {}: {} file(s) → {}", outcome.task, files, output.display());
                if *read_failures > 0 {
                    print!(" ({} unreadable)", read_failures);
                }
                println!();
            }
            TaskStatus::Planned { output, files } => {
                println!(
                    "   📄 {}: {} file(s) would be written to {}",
                    outcome.task,
                    files.len(),
                    output.display()
                );
                for file in files {
                    println!("        {}", file.display());
                }
            }
            TaskStatus::Skipped(reason) => {
                println!("   ⏭️  {}: skipped ({})", outcome.task, reason);
            }
            TaskStatus::Failed { error } => {
                println!("   ❌ {}: failed ({})", outcome.task, error);
            }
        }
    }

    println!(
        "\n   Written: {} | Skipped: {} | Failed: {} | Files: {}",
        summary.written(),
        summary.skipped(),
        summary.failed(),
        summary.total_files()
    );
    println!("   Duration: {:.2}s", summary.duration_seconds);

    if summary.dry_run {
        println!("\n✅ Dry run complete. Nothing was written.");
    } else {
        println!(
            "\n✅ Bundling complete! Output in: {}",
            summary.output_dir.display()
        );
    }
}

/// Print the configured tasks, one per line.
fn print_task_table(config: &Config) {
    println!("Tasks (base: {}):\n", config.base_dir.display());

    for task in config.tasks() {
        println!(
            "  {:<24} {:<28} {}",
            task.output_name,
            task.mode.to_string(),
            task.extensions_label()
        );
    }
}
