use anyhow::{Result, Context, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, debug};
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::{AppError, ProviderError, TranslationError};
use crate::file_utils::FileManager;
use crate::translation::{
    PipelineConfig, PipelineEvent, TranslationOutcome, TranslationPipeline, TranslationService, Translator,
};

// @module: Application controller for document translation

/// One document translation job
#[derive(Debug, Clone)]
pub struct TranslateJob {
    /// Document to translate
    pub input_file: PathBuf,

    /// Where to write the translation; derived from the input when missing
    pub output_file: Option<PathBuf>,

    /// Language to translate into
    pub target_language: String,

    /// Overwrite an existing translation
    pub force_overwrite: bool,

    /// Show per-segment progress while the translation streams in
    pub stream: bool,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Translation capability shared by every job
    translator: Arc<dyn Translator>,
}

impl Controller {
    // @method: Create a controller backed by the configured provider
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(AppError::from)?;

        let service = TranslationService::new(config.translation.clone()).map_err(AppError::from)?;
        info!(
            "Using {} with model {}",
            config.translation.provider.display_name(),
            service.model()
        );

        Ok(Self::with_translator(config, Arc::new(service)))
    }

    // @method: Create a controller around any translator
    pub fn with_translator(config: Config, translator: Arc<dyn Translator>) -> Self {
        Self { config, translator }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the pipeline for this configuration
    pub fn pipeline(&self) -> TranslationPipeline {
        TranslationPipeline::new(Arc::clone(&self.translator), PipelineConfig::from_config(&self.config))
    }

    /// Run one job, writing the translation to disk
    ///
    /// Returns `None` when the output already exists and overwriting was not requested.
    pub async fn run(&self, job: &TranslateJob) -> Result<Option<TranslationOutcome>> {
        if !FileManager::file_exists(&job.input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", job.input_file));
        }

        let output_file = job
            .output_file
            .clone()
            .unwrap_or_else(|| FileManager::generate_output_path(&job.input_file, &job.target_language));
        if output_file.exists() && !job.force_overwrite {
            warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", output_file);
            return Ok(None);
        }

        let document = FileManager::read_to_string(&job.input_file)?;

        // Fail before any document text is sent
        self.translator
            .check_connection()
            .await
            .map_err(AppError::from)
            .context("Translation provider is not reachable")?;

        info!("Translating {:?} into {}", job.input_file, job.target_language);

        let pipeline = self.pipeline();
        let outcome = if job.stream {
            Self::run_streaming(&pipeline, document, &job.target_language).await?
        } else {
            pipeline
                .translate(&document, &job.target_language)
                .await
                .map_err(failure_with_hint)?
        };

        FileManager::write_to_file(&output_file, &outcome.translated_document)
            .context("Failed to write translated document")?;
        info!("Translation written to {:?}", output_file);

        Ok(Some(outcome))
    }

    // @returns: Outcome of an incremental translation, showing a progress bar over segments
    async fn run_streaming(
        pipeline: &TranslationPipeline,
        document: String,
        target_language: &str,
    ) -> Result<TranslationOutcome> {
        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let mut events = pipeline.translate_incremental(document, target_language);
        let mut received_chars = 0usize;

        while let Some(event) = events.recv().await {
            match event {
                PipelineEvent::CoverPage { .. } => progress_bar.set_message("cover page"),
                PipelineEvent::SegmentStarted { index, total } => {
                    progress_bar.set_length(total as u64);
                    progress_bar.set_position(index as u64);
                }
                PipelineEvent::Increment(text) => {
                    received_chars += text.chars().count();
                    progress_bar.set_message(format!("{} chars", received_chars));
                }
                PipelineEvent::Completed(outcome) => {
                    progress_bar.set_position(outcome.stats.segments_total as u64);
                    progress_bar.finish_with_message("done");
                    return Ok(outcome);
                }
                PipelineEvent::Failed(e) => {
                    progress_bar.abandon_with_message("failed");
                    return Err(failure_with_hint(e));
                }
            }
        }

        debug!("Event stream closed without a terminal event");
        progress_bar.abandon();
        Err(anyhow!("Translation stopped before completion"))
    }
}

// @returns: Error for a failed translation, logging what the user can do about it
fn failure_with_hint(error: TranslationError) -> anyhow::Error {
    match error.provider_error() {
        Some(ProviderError::AuthenticationError(_)) => {
            warn!("The provider rejected the credentials, check the API key in the config or environment");
        }
        Some(ProviderError::RateLimitExceeded(_)) => {
            warn!("The provider kept rate limiting after all retries, lower rate_limit or raise retry_backoff_ms");
        }
        Some(e) if e.is_transient() => {
            warn!("The provider failure looks temporary, running the job again may succeed");
        }
        _ => {}
    }
    AppError::from(error).into()
}
