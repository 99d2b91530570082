//! kway-merge CLI
//!
//! Merges a directory of pre-sorted integer files into one sorted file.
//!
//! Usage:
//!   kway-merge                      # merge with env/default settings
//!   kway-merge merge --input-dir TestFiles_AhmedAbdelkader --output merged_output.txt
//!   kway-merge verify merged_output.txt
//!
//! Options can also come from the environment (or a `.env` file):
//!   KWAY_MERGE_INPUT_DIR, KWAY_MERGE_OUTPUT, KWAY_MERGE_PROGRESS_INTERVAL,
//!   KWAY_MERGE_LOG

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use kway_merge::config::{self, MergeConfig};
use kway_merge::merge::DEFAULT_PROGRESS_INTERVAL;
use kway_merge::utils::{file_size, format_size};
use kway_merge::{merge_directory, verify};

#[derive(Parser)]
#[command(name = "kway-merge")]
#[command(version, about = "Streaming k-way merge of sorted integer files")]
struct Cli {
    /// Log filter (e.g. "info", "kway_merge=trace")
    #[arg(long, global = true, env = "KWAY_MERGE_LOG", default_value = "info")]
    log_level: String,

    /// Used when no subcommand is given
    #[command(flatten)]
    merge: MergeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Directory holding the sorted input files
    #[arg(long, env = "KWAY_MERGE_INPUT_DIR", default_value = config::DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,
    /// Merged output file
    #[arg(long, short, env = "KWAY_MERGE_OUTPUT", default_value = config::DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Values between progress reports (0 disables them)
    #[arg(long, env = "KWAY_MERGE_PROGRESS_INTERVAL", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress_interval: u64,
    /// Write a JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,
}

impl MergeArgs {
    fn config(&self) -> MergeConfig {
        MergeConfig {
            progress_interval: self.progress_interval,
            ..MergeConfig::new(self.input_dir.clone(), self.output.clone())
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every regular file in a directory into one sorted output (default)
    Merge(MergeArgs),
    /// Check that a merged file is in ascending order
    Verify {
        /// Merged file to check
        path: PathBuf,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<()> {
    // Optional env file; missing is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Some(Commands::Merge(args)) => run_merge(&args.config(), args.report)?,
        Some(Commands::Verify { path }) => run_verify(&path)?,
        None => run_merge(&cli.merge.config(), cli.merge.report)?,
    }

    Ok(())
}

fn run_merge(config: &MergeConfig, report_path: Option<PathBuf>) -> Result<()> {
    println!("\n{}", "═".repeat(60));
    println!("K-WAY MERGE");
    println!("{}", "═".repeat(60));
    println!("  Input dir: {}", config.input_dir.display());
    println!("  Output: {}", config.output.display());

    let report = merge_directory(config).with_context(|| {
        format!(
            "Merge of {} into {} failed",
            config.input_dir.display(),
            config.output.display()
        )
    })?;

    println!("{}", "─".repeat(60));
    println!("  ✅ Merge complete!");
    println!(
        "  Sources: {} seen, {} merged, {} skipped",
        report.sources_seen,
        report.sources_opened,
        report.skipped.len()
    );
    for skipped in &report.skipped {
        println!("    ⚠️  {}: {}", skipped.source_id, skipped.reason);
    }
    for failed in report.failed_sources() {
        println!(
            "    ⚠️  {} stopped after {} values: {}",
            failed.source_id,
            failed.values_read,
            failed.failure.as_deref().unwrap_or("read failure")
        );
    }
    println!("  Values written: {}", report.values_written);
    println!("  File size: {}", format_size(file_size(&config.output)));
    println!("  Time: {:.2}s", report.elapsed_ms as f64 / 1000.0);

    if let Some(path) = report_path {
        let json = report.to_json().context("Failed to serialize merge report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("  Report: {}", path.display());
    }

    Ok(())
}

fn run_verify(path: &std::path::Path) -> Result<()> {
    println!("Checking {} ({})...", path.display(), format_size(file_size(path)));

    let summary = verify::verify_sorted(path)?;

    match summary.first_violation {
        None => {
            println!("\n✅ Output is sorted: {} values", summary.values);
            if let (Some(min), Some(max)) = (summary.min, summary.max) {
                println!("   Range: {} ..= {}", min, max);
            }
            Ok(())
        }
        Some(violation) => {
            println!("\n❌ Output is NOT sorted!");
            println!(
                "   Line {}: {} follows {}",
                violation.line, violation.value, violation.previous
            );
            anyhow::bail!("{} is not in ascending order", path.display());
        }
    }
}
