//! Per-locale generation pipeline
//!
//! For every locale of a project: resolve context, compose the prompt, call
//! the image backend, then render and publish the bundle. Each locale moves
//! through `Pending -> ContextResolved -> PromptBuilt -> Generating` and ends
//! `Rendered` or `Failed`. A failed locale never stops its siblings.

use crate::config::GenerationConfig;
use crate::prompt::{build_prompt, effective_app_name};
use crate::provider::{CancelToken, ImageBackend, ImageRequest};
use crate::render::{render_bundle, BundleTarget, RenderedBundle};
use crate::sizes::CANONICAL_SIZES;
use crate::spec::PromptSpec;
use iconloom_core::{IconloomError, Result};
use iconloom_l10n::{find_all_localizations, get_context, LocalizationContext};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lifecycle of one locale within a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleState {
    Pending,
    ContextResolved,
    PromptBuilt,
    Generating,
    Rendered,
    Failed,
}

impl LocaleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LocaleState::Rendered | LocaleState::Failed)
    }
}

impl fmt::Display for LocaleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LocaleState::Pending => "pending",
            LocaleState::ContextResolved => "context resolved",
            LocaleState::PromptBuilt => "prompt built",
            LocaleState::Generating => "generating",
            LocaleState::Rendered => "rendered",
            LocaleState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Which step a failed locale stopped at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Backend,
    Render,
}

/// Terminal outcome for one locale
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Rendered(RenderedBundle),
    Failed { stage: FailureStage, error: String },
}

/// Result of generating one locale's bundle
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub locale: String,
    pub app_name: String,
    pub prompt: String,
    pub outcome: Outcome,
}

impl GenerationResult {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Rendered(_))
    }

    pub fn state(&self) -> LocaleState {
        match self.outcome {
            Outcome::Rendered(_) => LocaleState::Rendered,
            Outcome::Failed { .. } => LocaleState::Failed,
        }
    }

    /// The published bundle directory; present only on success
    pub fn output_path(&self) -> Option<&Path> {
        match &self.outcome {
            Outcome::Rendered(bundle) => Some(&bundle.bundle_dir),
            Outcome::Failed { .. } => None,
        }
    }

    /// Failure detail; present only on failure
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Rendered(_) => None,
            Outcome::Failed { error, .. } => Some(error),
        }
    }
}

/// Aggregated results of a batch, one entry per attempted locale
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub results: BTreeMap<String, GenerationResult>,
    /// True when the batch was cancelled before every locale started
    pub cancelled: bool,
}

impl BatchReport {
    pub fn succeeded(&self) -> Vec<&str> {
        self.results
            .values()
            .filter(|r| r.succeeded())
            .map(|r| r.locale.as_str())
            .collect()
    }

    /// Failed locales with their error
    pub fn failed(&self) -> Vec<(&str, &str)> {
        self.results
            .values()
            .filter_map(|r| r.error().map(|e| (r.locale.as_str(), e)))
            .collect()
    }

    pub fn is_complete_success(&self) -> bool {
        !self.cancelled && !self.results.is_empty() && self.results.values().all(|r| r.succeeded())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Output and scheduling options for a pipeline
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub output_dir: PathBuf,
    pub prefix: String,
    pub default_locale: String,
    /// Locales generated at once; 1 runs them in order on the calling thread
    pub concurrency: usize,
    pub cancel: CancelToken,
}

impl PipelineOptions {
    pub fn new(output_dir: &Path) -> Self {
        Self::from_config(output_dir, &GenerationConfig::default())
    }

    pub fn from_config(output_dir: &Path, generation: &GenerationConfig) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            prefix: generation.prefix.clone(),
            default_locale: generation.default_locale.clone(),
            concurrency: generation.concurrency.max(1),
            cancel: CancelToken::new(),
        }
    }
}

/// Drives generation for one or many locales with an eagerly constructed backend
pub struct IconPipeline {
    backend: Box<dyn ImageBackend>,
    options: PipelineOptions,
}

impl IconPipeline {
    pub fn new(backend: Box<dyn ImageBackend>, options: PipelineOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Generate a single icon bundle for `spec.locale`
    pub fn generate_icon(
        &self,
        spec: &PromptSpec,
        context: Option<&LocalizationContext>,
    ) -> GenerationResult {
        let app_name = effective_app_name(&spec.app_name, context);
        let spec = spec.for_locale(&spec.locale, &app_name);
        let prompt = build_prompt(&spec, context);
        transition(&spec.locale, LocaleState::PromptBuilt);
        self.execute(&spec, prompt)
    }

    /// Generate a bundle for every localization of an iOS project.
    ///
    /// A project with no `.lproj` directories gets a single bundle for the
    /// default locale, built without localization context.
    pub fn generate_for_project(
        &self,
        project_root: &Path,
        base_spec: &PromptSpec,
    ) -> Result<BatchReport> {
        let discovered = find_all_localizations(project_root)?;
        let with_context = !discovered.is_empty();
        let locales: Vec<String> = if with_context {
            discovered.into_iter().collect()
        } else {
            warn!(
                "No localizations found in {}, generating default '{}' icon",
                project_root.display(),
                self.options.default_locale
            );
            vec![self.options.default_locale.clone()]
        };
        info!("Generating {} locale(s): {}", locales.len(), locales.join(", "));

        let context_root = with_context.then_some(project_root);
        let run = |locale: &String| self.run_locale(context_root, locale, base_spec);

        let results: Vec<GenerationResult> = if self.options.concurrency <= 1 {
            locales.iter().filter_map(&run).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.concurrency)
                .build()
                .map_err(|e| {
                    IconloomError::ConfigurationError(format!("Failed to start workers: {}", e))
                })?;
            pool.install(|| locales.par_iter().filter_map(&run).collect())
        };

        let report = BatchReport {
            cancelled: self.options.cancel.is_cancelled(),
            results: results
                .into_iter()
                .map(|r| (r.locale.clone(), r))
                .collect(),
        };
        info!(
            "Batch finished: {} succeeded, {} failed",
            report.succeeded().len(),
            report.failed().len()
        );
        Ok(report)
    }

    /// `None` when the batch was cancelled before this locale started
    fn run_locale(
        &self,
        project_root: Option<&Path>,
        locale: &str,
        base_spec: &PromptSpec,
    ) -> Option<GenerationResult> {
        if self.options.cancel.is_cancelled() {
            debug!("Skipping '{}': batch cancelled", locale);
            return None;
        }
        transition(locale, LocaleState::Pending);

        let context = project_root.map(|root| get_context(root, locale));
        transition(locale, LocaleState::ContextResolved);

        let app_name = effective_app_name(&base_spec.app_name, context.as_ref());
        let spec = base_spec.for_locale(locale, &app_name);
        let prompt = build_prompt(&spec, context.as_ref());
        transition(locale, LocaleState::PromptBuilt);

        Some(self.execute(&spec, prompt))
    }

    fn execute(&self, spec: &PromptSpec, prompt: String) -> GenerationResult {
        let locale = spec.locale.as_str();
        info!("Generating icon for '{}' ({})", spec.app_name, locale);
        transition(locale, LocaleState::Generating);

        let request = ImageRequest::new(spec.model, &prompt);
        let outcome = match self.backend.generate(&request, &self.options.cancel) {
            Err(e) => Outcome::Failed {
                stage: FailureStage::Backend,
                error: e.to_string(),
            },
            Ok(image) => {
                let target = BundleTarget::for_locale(
                    &self.options.output_dir,
                    &self.options.prefix,
                    locale,
                    &self.options.default_locale,
                );
                match render_bundle(&image, &CANONICAL_SIZES, &target) {
                    Ok(bundle) => Outcome::Rendered(bundle),
                    Err(e) => Outcome::Failed {
                        stage: FailureStage::Render,
                        error: e.to_string(),
                    },
                }
            }
        };

        let result = GenerationResult {
            locale: locale.to_string(),
            app_name: spec.app_name.clone(),
            prompt,
            outcome,
        };
        if let Some(error) = result.error() {
            warn!("Locale '{}' failed: {}", locale, error);
        }
        transition(locale, result.state());
        result
    }
}

fn transition(locale: &str, state: LocaleState) {
    debug!("[{}] {}", locale, state);
}

/// Compose the prompt for every locale without calling a backend
pub fn preview_prompts(
    project_root: &Path,
    base_spec: &PromptSpec,
    default_locale: &str,
) -> Result<BTreeMap<String, String>> {
    let locales = find_all_localizations(project_root)?;
    if locales.is_empty() {
        let spec = base_spec.for_locale(default_locale, &effective_app_name(&base_spec.app_name, None));
        return Ok(BTreeMap::from([(default_locale.to_string(), build_prompt(&spec, None))]));
    }

    Ok(locales
        .into_iter()
        .map(|locale| {
            let context = get_context(project_root, &locale);
            let app_name = effective_app_name(&base_spec.app_name, Some(&context));
            let prompt = build_prompt(&base_spec.for_locale(&locale, &app_name), Some(&context));
            (locale, prompt)
        })
        .collect())
}
