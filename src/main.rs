use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use vaultsweep::canonical::{Canonicalizer, HeadResolver, TcpProber};
use vaultsweep::config::PipelineConfig;
use vaultsweep::dedup::DedupEngine;
use vaultsweep::report::render_deleted_report;
use vaultsweep::utils::logger::init_logger;
use vaultsweep::vault::store::{self, Checkpoint, JsonCheckpoint};

/// Normalizes and deduplicates a credential-vault export
#[derive(Debug, Parser)]
#[command(name = "vaultsweep", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Canonicalize login URIs and remove duplicate items
    Clean(CleanArgs),

    /// Render a previously written deleted-items file as readable text
    Report(ReportArgs),
}

#[derive(Debug, Args)]
struct CleanArgs {
    /// Path to the vault export JSON file
    input: PathBuf,

    /// Where to write the surviving items (defaults to <input>_output.json)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Where to write the deleted items (defaults to <input>_deleted.json)
    #[arg(long)]
    deleted: Option<PathBuf>,

    /// Where to write the readable report (defaults to <deleted>_readable.txt)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Probe and resolve timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// TCP port used by the reachability probe
    #[arg(long, default_value_t = 443)]
    probe_port: u16,

    /// Skip the after-each-item snapshot writes
    #[arg(long)]
    no_checkpoint: bool,

    /// Skip writing the readable report
    #[arg(long)]
    no_report: bool,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Path to the deleted-items JSON file
    deleted: PathBuf,

    /// Where to write the report (defaults to <deleted>_readable.txt)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;

    match Cli::parse().command {
        Command::Clean(args) => run_clean(args).await,
        Command::Report(args) => run_report(args),
    }
}

async fn run_clean(args: CleanArgs) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| store::derive_output_path(&args.input));
    let deleted = args
        .deleted
        .unwrap_or_else(|| store::derive_deleted_path(&args.input));
    let report = args
        .report
        .unwrap_or_else(|| store::derive_report_path(&deleted));

    let config = PipelineConfig::new()
        .with_probe_timeout(Duration::from_secs(args.timeout))
        .with_resolve_timeout(Duration::from_secs(args.timeout))
        .with_probe_port(args.probe_port);

    let export = store::load_vault(&args.input)?;
    let total = export.items.len();
    info!("Loaded {} items from {}", total, args.input.display());

    let prober = TcpProber::new(&config);
    let resolver = HeadResolver::new(&config)?;
    let mut engine = DedupEngine::new(Canonicalizer::new(prober, resolver));

    let checkpoint = JsonCheckpoint::new(&output, &deleted);
    let checkpoint: Option<&dyn Checkpoint> = if args.no_checkpoint {
        None
    } else {
        Some(&checkpoint)
    };

    let outcome = engine.run(export, checkpoint).await?;

    store::write_vault(&output, &outcome.export)?;
    store::write_deleted(&deleted, &outcome.deleted)?;
    if !args.no_report {
        fs::write(&report, render_deleted_report(&outcome.deleted))
            .with_context(|| format!("Failed to write report {}", report.display()))?;
    }

    println!("Processed {} items out of {}.", outcome.processed, total);
    println!("Deleted items: {}", outcome.deleted.len());

    Ok(())
}

fn run_report(args: ReportArgs) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| store::derive_report_path(&args.deleted));

    let deleted = store::load_deleted(&args.deleted)?;
    fs::write(&output, render_deleted_report(&deleted))
        .with_context(|| format!("Failed to write report {}", output.display()))?;

    println!("Readable format saved to '{}'.", output.display());

    Ok(())
}
