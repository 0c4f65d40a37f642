//! CLI entry point for the hygienic import consolidator.
//!
//! This binary rewrites per-component UI imports such as
//! `import { Button } from '@/shared/components/ui/button'` into a single
//! import from the barrel module.
//!
//! # Usage
//!
//! ```bash
//! hygienic [OPTIONS] [PATHS]...
//!
//! # Preview changes under src/ (dry run is the default)
//! hygienic
//!
//! # Apply changes, sorted, and write a JSON report
//! hygienic src/features --fix --sort --report
//!
//! # Fail CI when anything would change
//! hygienic --check
//!
//! # Undo the most recent --fix
//! hygienic --revert
//! ```
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | `--check` found files that would change |
//! | 2 | The run failed |
//! | 4 | The git working tree is dirty and `--force` was not given |

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Parser;
use color_eyre::eyre::WrapErr;
use hy_consolidator::{Consolidator, History, RunOutcome, RunSummary};
use hy_core::fs::{ensure_dir, write_atomic};
use hy_core::{Config, ConfigError, ConsolidationResult, RunOptions, RunRecord, RunStatus, StatePaths};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_CHECK_FAILED: u8 = 1;
const EXIT_RUN_FAILED: u8 = 2;
const EXIT_DIRTY_TREE: u8 = 4;

const HISTORY_DISPLAY_LIMIT: usize = 10;
const HISTORY_PATHS_SHOWN: usize = 3;

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Consolidates per-component UI imports into a single barrel import.
#[derive(Parser)]
#[command(name = "hygienic", version, about, long_about = None)]
struct Cli {
    /// Files or directories to process.
    #[arg(default_value = "src")]
    paths: Vec<Utf8PathBuf>,

    /// Apply changes (default is a dry run).
    #[arg(long)]
    fix: bool,

    /// Show changes without applying them, even with --fix.
    #[arg(long)]
    dry_run: bool,

    /// Sort names in the consolidated import alphabetically.
    #[arg(long)]
    sort: bool,

    /// Run even if git has uncommitted changes.
    #[arg(short, long)]
    force: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,

    /// Exit with code 1 if any file would change (for CI).
    #[arg(long)]
    check: bool,

    /// Exclude patterns, replacing the configured defaults.
    #[arg(long = "except", value_name = "PATTERNS", num_args = 1..)]
    except: Option<Vec<String>>,

    /// Only process files matching one of these patterns.
    #[arg(long, value_name = "PATTERNS", num_args = 1..)]
    include: Vec<String>,

    /// Additional barrel files, saved to the configuration.
    #[arg(long, value_name = "PATHS", num_args = 1..)]
    barrel: Vec<Utf8PathBuf>,

    /// Ignore the content cache for this run.
    #[arg(long)]
    no_cache: bool,

    /// Write a JSON report to the reports directory.
    #[arg(long)]
    report: bool,

    /// Restore the files from the most recent backup of this project.
    #[arg(long)]
    revert: bool,

    /// Print the effective configuration.
    #[arg(long)]
    config: bool,

    /// Show recent runs.
    #[arg(long)]
    history: bool,

    /// Delete the run history.
    #[arg(long)]
    clear_history: bool,

    /// Do not record this run in the history.
    #[arg(long)]
    disable_history: bool,

    /// Directory holding configuration, cache, history, backups, and reports.
    #[arg(long, env = "HYGIENIC_STATE_DIR")]
    state_dir: Option<Utf8PathBuf>,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    /// Builds the run options, resolving defaults from `config`.
    fn run_options(&self, config: &Config) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run || !self.fix,
            sort_imports: self.sort || config.sort_imports,
            use_cache: !self.no_cache,
            include_patterns: self.include.clone(),
            exclude_patterns: self.except.clone(),
        }
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level with `--verbose`, `warn` with `--quiet`, and `info` by
/// default.
fn init_tracing(verbose: bool, quiet: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose {
            "debug"
        } else if quiet {
            "warn"
        } else {
            "info"
        };
        EnvFilter::new(level)
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Resolves the state directory from `--state-dir` or the home directory.
fn state_paths(cli: &Cli) -> color_eyre::Result<StatePaths> {
    let paths = match &cli.state_dir {
        Some(dir) => StatePaths::new(dir.clone()),
        None => StatePaths::from_home()?,
    };
    paths.ensure_dirs()?;
    Ok(paths)
}

/// Loads the configuration, falling back to defaults if the file is malformed.
///
/// A malformed file is left untouched so it can be fixed by hand.
fn load_config(paths: &StatePaths) -> color_eyre::Result<Config> {
    match Config::load(paths) {
        Ok(config) => Ok(config),
        Err(e @ ConfigError::Parse { .. }) => {
            warn!(error = %e, "Configuration is malformed, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Prints the configuration and where state is kept.
fn run_show_config(config: &Config, paths: &StatePaths) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "State directory: {}", paths.root())?;
    writeln!(handle, "Config file:     {}", paths.config_file())?;
    writeln!(handle)?;
    writeln!(handle, "{}", serde_json::to_string_pretty(config)?)?;
    Ok(())
}

/// Prints the most recent runs, newest first.
fn run_show_history(paths: &StatePaths) -> color_eyre::Result<()> {
    let history = History::load(paths.history_file());
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    if history.runs().is_empty() {
        writeln!(handle, "No history found.")?;
        return Ok(());
    }

    writeln!(handle, "Recent runs:")?;
    for (index, run) in history.recent(HISTORY_DISPLAY_LIMIT).enumerate() {
        writeln!(handle, "{}", format_history_entry(index + 1, run))?;
    }
    Ok(())
}

/// Clears the run history.
fn run_clear_history(paths: &StatePaths) -> color_eyre::Result<()> {
    let mut history = History::load(paths.history_file());
    history.clear()?;
    writeln!(std::io::stdout(), "History cleared.")?;
    Ok(())
}

/// Restores the newest backup batch of the current project.
fn run_revert(consolidator: &Consolidator) -> color_eyre::Result<()> {
    let restored = consolidator.revert_latest()?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "Restored {} file(s):", restored.len())?;
    for path in &restored {
        writeln!(handle, "  {path}")?;
    }
    Ok(())
}

/// Runs the consolidation and handles history, check mode, and reports.
fn run_consolidate(
    cli: &Cli,
    consolidator: &mut Consolidator,
    paths: &StatePaths,
) -> color_eyre::Result<ExitCode> {
    consolidator.initialize_registry();

    if !consolidator.check_preconditions(cli.force) {
        writeln!(
            std::io::stderr(),
            "Error: Git has uncommitted changes. Use --force to proceed anyway."
        )?;
        return Ok(ExitCode::from(EXIT_DIRTY_TREE));
    }

    consolidator.cleanup_old_backups();

    let options = cli.run_options(consolidator.config());
    info!(
        paths = cli.paths.len(),
        dry_run = options.dry_run,
        sort = options.sort_imports,
        cache = options.use_cache,
        "Starting run"
    );

    let run = consolidator.process_files(&cli.paths, &options);

    if !cli.disable_history {
        let record = RunRecord {
            timestamp: Utc::now(),
            paths: cli.paths.iter().map(ToString::to_string).collect(),
            options: options.clone(),
            status: if run.is_ok() {
                RunStatus::Success
            } else {
                RunStatus::Error
            },
            files_changed: run.as_ref().map_or(0, |o| o.summary.files_changed),
            files_processed: run.as_ref().map_or(0, |o| o.summary.files_processed),
        };
        let mut history = History::load(paths.history_file());
        if let Err(e) = history.add_run(record) {
            warn!(error = %e, "Failed to record run in history");
        }
    }

    let outcome = match run {
        Ok(outcome) => outcome,
        Err(e) => {
            writeln!(std::io::stderr(), "Error: {e}")?;
            return Ok(ExitCode::from(EXIT_RUN_FAILED));
        }
    };

    print_summary(&outcome.summary, options.dry_run)?;

    if cli.check && outcome.summary.has_changes() {
        return Ok(ExitCode::from(EXIT_CHECK_FAILED));
    }

    if cli.report {
        let report_path = write_report(paths, &outcome)?;
        writeln!(std::io::stdout(), "Report saved to: {report_path}")?;
    }

    Ok(ExitCode::SUCCESS)
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints the run summary.
fn print_summary(summary: &RunSummary, dry_run: bool) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle)?;
    writeln!(handle, "Summary:")?;
    writeln!(handle, "  Files processed: {}", summary.files_processed)?;
    writeln!(handle, "  Files changed: {}", summary.files_changed)?;
    if summary.files_skipped > 0 {
        writeln!(handle, "  Files skipped (cached): {}", summary.files_skipped)?;
    }
    if summary.has_failures() {
        writeln!(handle, "  Files failed: {}", summary.files_failed)?;
    }
    if dry_run && summary.has_changes() {
        writeln!(handle)?;
        writeln!(handle, "Dry run: no files were written. Use --fix to apply.")?;
    }
    Ok(())
}

/// Formats one history entry:
///
/// ```text
///  1. [2026-03-01T14:05:09Z] success - 2/14 files
///     Paths: src/pages, src/features, src/widgets...
///     Options: --fix --sort
/// ```
fn format_history_entry(position: usize, run: &RunRecord) -> String {
    let mut entry = format!(
        "{position:>2}. [{}] {} - {}/{} files",
        run.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        run.status,
        run.files_changed,
        run.files_processed
    );

    let shown: Vec<&str> = run
        .paths
        .iter()
        .take(HISTORY_PATHS_SHOWN)
        .map(String::as_str)
        .collect();
    let more = if run.paths.len() > HISTORY_PATHS_SHOWN { "..." } else { "" };
    entry.push_str(&format!("\n    Paths: {}{more}", shown.join(", ")));

    let flags = run.active_flags();
    if !flags.is_empty() {
        entry.push_str(&format!("\n    Options: {}", flags.join(" ")));
    }
    entry
}

/// Report file name for a run started at `timestamp`.
fn report_file_name(timestamp: DateTime<Utc>) -> String {
    format!(
        "{}.json",
        timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-")
    )
}

/// Writes `reports/<timestamp>.json` and returns its path.
fn write_report(paths: &StatePaths, outcome: &RunOutcome) -> color_eyre::Result<Utf8PathBuf> {
    #[derive(serde::Serialize)]
    struct Report<'a> {
        timestamp: String,
        summary: &'a RunSummary,
        results: &'a [ConsolidationResult],
    }

    let now = Utc::now();
    let report = Report {
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        summary: &outcome.summary,
        results: &outcome.results,
    };

    let dir = paths.reports_dir();
    ensure_dir(&dir).wrap_err_with(|| format!("Failed to create {dir}"))?;
    let path = dir.join(report_file_name(now));
    let json = serde_json::to_string_pretty(&report)?;
    write_atomic(&path, json.as_bytes()).wrap_err_with(|| format!("Failed to write report {path}"))?;
    Ok(path)
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<ExitCode> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.quiet, cli.no_color);

    // 4. Resolve state and configuration
    let paths = state_paths(&cli)?;
    let mut config = load_config(&paths)?;

    if cli.config {
        run_show_config(&config, &paths)?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.history {
        run_show_history(&paths)?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.clear_history {
        run_clear_history(&paths)?;
        return Ok(ExitCode::SUCCESS);
    }

    if !cli.barrel.is_empty() && config.add_barrel_paths(cli.barrel.iter().cloned()) {
        config.save(&paths)?;
        info!(barrels = config.barrel_paths.len(), "Saved barrel paths to configuration");
    }

    // 5. Route to the requested operation
    let mut consolidator = Consolidator::new(config, paths.clone())?;
    if cli.revert {
        run_revert(&consolidator)?;
        return Ok(ExitCode::SUCCESS);
    }

    run_consolidate(&cli, &mut consolidator, &paths)
}
