//! iconloom CLI - Command-line interface for localized icon generation

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{generate, locales, project, prompt};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "iconloom")]
#[command(about = "Generate localized iOS app icon sets from project metadata", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a single icon set
    Generate(generate::GenerateArgs),

    /// Generate an icon set for every localization of an iOS project
    Project(project::ProjectArgs),

    /// Preview the prompt for every locale without generating
    Prompt(prompt::PromptArgs),

    /// List discovered locales and their resolved context
    Locales {
        /// Path to the iOS project
        path: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Project(args) => project::run(args),
        Commands::Prompt(args) => prompt::run(args).map(|_| ExitCode::SUCCESS),
        Commands::Locales { path } => locales::run(&path).map(|_| ExitCode::SUCCESS),
    }
}
