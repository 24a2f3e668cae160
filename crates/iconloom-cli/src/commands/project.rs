//! `iconloom project` - every localization of an iOS project

use super::{load_config, SpecArgs};
use anyhow::{Context, Result};
use clap::Args;
use iconloom_gen::pipeline::{BatchReport, IconPipeline, PipelineOptions};
use iconloom_gen::providers::create_backend;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code when `--fail-on-partial` is set and a locale failed
const PARTIAL_FAILURE_EXIT: u8 = 2;

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Path to the iOS project
    pub path: PathBuf,

    #[command(flatten)]
    pub spec: SpecArgs,

    /// Output directory for the icon sets and previews
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Locales generated at once (overrides config)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Image backend (overrides config)
    #[arg(long)]
    pub provider: Option<String>,

    /// Write the batch report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Exit with status 2 if any locale failed
    #[arg(long)]
    pub fail_on_partial: bool,
}

pub fn run(args: ProjectArgs) -> Result<ExitCode> {
    let config = load_config()?;
    let spec = args.spec.to_spec(&config.generation)?;

    let provider = args
        .provider
        .as_deref()
        .unwrap_or(&config.generation.provider);
    let backend = create_backend(provider, &config)?;

    let mut options = PipelineOptions::from_config(&args.output, &config.generation);
    if let Some(concurrency) = args.concurrency {
        options.concurrency = concurrency.max(1);
    }
    let pipeline = IconPipeline::new(backend, options);

    println!(
        "Generating icon sets for {} via {}...",
        args.path.display(),
        pipeline.backend_name()
    );
    let report = pipeline.generate_for_project(&args.path, &spec)?;
    print_summary(&report);

    if let Some(path) = &args.report {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Report: {}", path.display());
    }

    if args.fail_on_partial && !report.is_complete_success() {
        return Ok(ExitCode::from(PARTIAL_FAILURE_EXIT));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_summary(report: &BatchReport) {
    let succeeded = report.succeeded();
    let failed = report.failed();

    println!("\n{} succeeded, {} failed", succeeded.len(), failed.len());
    for result in report.results.values() {
        match result.output_path() {
            Some(path) => println!("  OK    {:<10} {}", result.locale, path.display()),
            None => println!(
                "  FAIL  {:<10} {}",
                result.locale,
                result.error().unwrap_or_default()
            ),
        }
    }
    if report.cancelled {
        println!("Batch was cancelled; remaining locales were not started.");
    }
}
