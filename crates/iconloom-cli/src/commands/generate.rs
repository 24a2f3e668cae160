//! `iconloom generate` - a single icon set

use super::{load_config, SpecArgs};
use anyhow::{bail, Result};
use clap::Args;
use iconloom_gen::pipeline::{IconPipeline, Outcome, PipelineOptions};
use iconloom_gen::providers::create_backend;
use iconloom_l10n::get_context;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub spec: SpecArgs,

    /// Locale to generate for (defaults to the configured default locale)
    #[arg(long)]
    pub locale: Option<String>,

    /// iOS project to read localization context from
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Output directory for the icon set and preview
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Image backend (overrides config)
    #[arg(long)]
    pub provider: Option<String>,
}

pub fn run(args: GenerateArgs) -> Result<ExitCode> {
    let config = load_config()?;
    if args.spec.name.is_none() && args.project.is_none() {
        bail!("Either --name or --project is required");
    }

    let mut spec = args.spec.to_spec(&config.generation)?;
    if let Some(locale) = args.locale {
        spec.locale = locale;
    }

    let provider = args
        .provider
        .as_deref()
        .unwrap_or(&config.generation.provider);
    let backend = create_backend(provider, &config)?;
    let pipeline = IconPipeline::new(
        backend,
        PipelineOptions::from_config(&args.output, &config.generation),
    );

    let context = args
        .project
        .as_deref()
        .map(|root| get_context(root, &spec.locale));

    println!(
        "Generating '{}' icon set via {}...",
        spec.locale,
        pipeline.backend_name()
    );
    let result = pipeline.generate_icon(&spec, context.as_ref());
    println!("  App name: {}", result.app_name);

    match &result.outcome {
        Outcome::Rendered(bundle) => {
            println!("  Icon set: {}", bundle.bundle_dir.display());
            println!("  Preview: {}", bundle.preview_path.display());
            println!("  Files: {}", bundle.files.len());
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failed { error, .. } => bail!("Generation failed for '{}': {}", result.locale, error),
    }
}
