use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use diag_collector::cli::Args;
use diag_collector::models::{CollectionReport, Outcome};
use diag_collector::orchestrator::{run_collection, TargetNotFound};
use diag_collector::topology::Topology;
use diag_collector::utils::summary;

fn main() {
    let args = Args::parse();

    if let Err(e) = initialize_logging(args.verbose) {
        eprintln!("Failed to initialize logger: {:#}", e);
        std::process::exit(1);
    }

    std::process::exit(run(&args));
}

fn run(args: &Args) -> i32 {
    info!("Starting diagnostics collection for target '{}'", args.target);

    let topology = load_topology(args);
    let output_dir = resolve_output_dir(args);
    let dump_timeout = Duration::from_secs(args.dump_timeout_secs);

    let report = match run_collection(
        &args.target,
        &args.flags(),
        dump_timeout,
        &topology,
        &args.install_dir,
        &args.domain_root(),
        &output_dir,
    ) {
        Ok(report) => report,
        Err(e) => {
            if e.downcast_ref::<TargetNotFound>().is_some() {
                error!("Target not found: {}", e);
            } else {
                error!("Collection failed: {:#}", e);
            }
            return 1;
        }
    };

    match summary::write_collection_summary(&report) {
        Ok(path) => info!("Collection summary written to {}", path.display()),
        Err(e) => warn!("Failed to write collection summary: {:#}", e),
    }

    render_report(&report);
    0
}

/// Initialize logging with the specified verbosity level.
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Load the topology document, degrading to a DAS-only topology when it
/// is missing or unreadable; partial topology information is still
/// useful for best-effort collection.
fn load_topology(args: &Args) -> Topology {
    match &args.topology {
        None => {
            info!("No topology document supplied; assuming a DAS-only domain");
            Topology::single_das(&args.domain_name)
        }
        Some(path) => match Topology::from_yaml_file(path) {
            Ok(topology) => topology,
            Err(e) => {
                warn!(
                    "Could not load topology from {}: {:#}; continuing with a DAS-only domain",
                    path.display(),
                    e
                );
                Topology::single_das(&args.domain_name)
            }
        },
    }
}

fn resolve_output_dir(args: &Args) -> PathBuf {
    match &args.output {
        Some(output) => output.clone(),
        None => {
            let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
            env::temp_dir().join(format!("diag-collect-{}", timestamp))
        }
    }
}

fn render_report(report: &CollectionReport) {
    for entry in &report.entries {
        match &entry.outcome {
            Outcome::Collected { files } => {
                info!("{}: {} file(s) collected", entry.collector, files.len())
            }
            Outcome::Skipped { reason } => info!("{}: skipped ({})", entry.collector, reason),
            Outcome::Failed { reason } => warn!("{}: FAILED ({})", entry.collector, reason),
        }
    }
    let failed = report.failed_entries().count();
    if failed > 0 {
        warn!(
            "Collection finished with {} collector failure(s); artifacts staged in {}",
            failed,
            report.output_dir.display()
        );
    } else {
        info!(
            "Collection finished; artifacts staged in {}",
            report.output_dir.display()
        );
    }
}
