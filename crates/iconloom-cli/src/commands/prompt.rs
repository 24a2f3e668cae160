//! `iconloom prompt` - dry-run prompt preview

use super::{load_config, SpecArgs};
use anyhow::Result;
use clap::Args;
use iconloom_gen::pipeline::preview_prompts;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Path to the iOS project
    pub path: PathBuf,

    #[command(flatten)]
    pub spec: SpecArgs,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

pub fn run(args: PromptArgs) -> Result<()> {
    let config = load_config()?;
    let spec = args.spec.to_spec(&config.generation)?;
    let prompts = preview_prompts(&args.path, &spec, &config.generation.default_locale)?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&prompts)?);
        return Ok(());
    }

    for (locale, prompt) in &prompts {
        println!("=== {} ===", locale);
        println!("{}\n", prompt);
    }
    Ok(())
}
