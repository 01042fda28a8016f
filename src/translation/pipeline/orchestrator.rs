/*!
 * Pipeline orchestrator for translating legal documents.
 *
 * One invocation runs through fixed stages:
 * 1. Protect: signature images are swapped for tokens
 * 2. Split: the optional cover page is set aside, the body is cut into segments
 * 3. Translate: segments go to the translator one at a time, in order
 * 4. Reassemble: translated bodies are joined with the original separators
 * 5. Restore: tokens are replaced by the original images
 * 6. Validate: structural marker counts are compared with the source
 *
 * The first failed segment abandons the whole document. Nothing is kept
 * between invocations.
 */

use futures::StreamExt;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use super::outcome::{PipelineEvent, TranslationOutcome, TranslationStats};
use crate::app_config::{Config, CoverFailurePolicy};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::translation::cover::CoverSplit;
use crate::translation::markup::{self, COVER_SEPARATOR};
use crate::translation::protector::ArtifactProtector;
use crate::translation::splitter::{DEFAULT_MAX_SEGMENT_SIZE, SectionSplitter, Segment};
use crate::translation::{TranslationRequest, Translator};
use crate::validation::{FidelityValidator, FidelityWarning, ValidationReport};

/// Default body length under which a document is translated in one call
pub const DEFAULT_SINGLE_CALL_THRESHOLD: usize = 50_000;

/// Buffered events per incremental translation
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Configuration for the translation pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Language documents are written in
    pub source_language: String,

    /// Maximum segment size, in chars
    pub max_segment_size: usize,

    /// Bodies shorter than this many chars are sent in one call
    pub single_call_threshold: usize,

    /// What to do when the cover page call fails
    pub cover_failure: CoverFailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_language: "English".to_string(),
            max_segment_size: DEFAULT_MAX_SEGMENT_SIZE,
            single_call_threshold: DEFAULT_SINGLE_CALL_THRESHOLD,
            cover_failure: CoverFailurePolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Pipeline settings taken from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_language: config.source_language.clone(),
            max_segment_size: config.pipeline.max_segment_size,
            single_call_threshold: config.pipeline.single_call_threshold,
            cover_failure: config.pipeline.cover_failure,
        }
    }

    /// Set the source language.
    pub fn with_source_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = source_language.into();
        self
    }

    /// Set the maximum segment size.
    pub fn with_max_segment_size(mut self, max_segment_size: usize) -> Self {
        self.max_segment_size = max_segment_size;
        self
    }

    /// Set the single call threshold.
    pub fn with_single_call_threshold(mut self, single_call_threshold: usize) -> Self {
        self.single_call_threshold = single_call_threshold;
        self
    }

    /// Set the cover page failure policy.
    pub fn with_cover_failure(mut self, cover_failure: CoverFailurePolicy) -> Self {
        self.cover_failure = cover_failure;
        self
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self::from_config(config)
    }
}

type EventSender = mpsc::Sender<PipelineEvent>;

/// Send an event, failing when the receiver is gone
async fn emit(events: &EventSender, event: PipelineEvent) -> Result<(), TranslationError> {
    events.send(event).await.map_err(|_| TranslationError::Cancelled)
}

/// Send a non-empty text increment
async fn emit_text(events: &EventSender, text: &str) -> Result<(), TranslationError> {
    if text.is_empty() {
        return Ok(());
    }
    emit(events, PipelineEvent::Increment(text.to_string())).await
}

/// Clean up raw model output for one piece of text
fn normalize_output(raw: &str) -> String {
    markup::strip_code_fence(raw).to_string()
}

/// The translation pipeline orchestrator.
#[derive(Clone)]
pub struct TranslationPipeline {
    translator: Arc<dyn Translator>,
    config: PipelineConfig,
}

impl std::fmt::Debug for TranslationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TranslationPipeline {
    /// Create a new pipeline around a translator.
    pub fn new(translator: Arc<dyn Translator>, config: PipelineConfig) -> Self {
        Self { translator, config }
    }

    /// Get the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Translate a document and wait for the result.
    pub async fn translate(&self, document: &str, target_language: &str) -> Result<TranslationOutcome, TranslationError> {
        self.run(document, target_language, None).await
    }

    /// Translate a document, reporting progress as events.
    ///
    /// The returned receiver yields cover, segment and increment events
    /// followed by exactly one `Completed` or `Failed`. Dropping it stops
    /// the translation: no further segment is requested.
    pub fn translate_incremental(
        &self,
        document: impl Into<String>,
        target_language: impl Into<String>,
    ) -> mpsc::Receiver<PipelineEvent> {
        let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let pipeline = self.clone();
        let document = document.into();
        let target_language = target_language.into();

        tokio::spawn(async move {
            let terminal = match pipeline.run(&document, &target_language, Some(&sender)).await {
                Ok(outcome) => PipelineEvent::Completed(outcome),
                Err(TranslationError::Cancelled) => {
                    info!("Incremental translation cancelled by the receiver");
                    return;
                }
                Err(e) => PipelineEvent::Failed(e),
            };
            // A receiver dropped at this point has nothing left to miss
            let _ = sender.send(terminal).await;
        });

        receiver
    }

    /// Split a body the way the pipeline would
    pub fn plan_segments(&self, body: &str) -> Vec<Segment> {
        if markup::char_len(body) < self.config.single_call_threshold {
            vec![Segment::whole(body)]
        } else {
            SectionSplitter::new(self.config.max_segment_size).split(body)
        }
    }

    async fn run(
        &self,
        document: &str,
        target_language: &str,
        events: Option<&EventSender>,
    ) -> Result<TranslationOutcome, TranslationError> {
        let start_time = Instant::now();
        let target = language_utils::resolve_language_name(target_language)
            .map_err(|e| TranslationError::Configuration(format!("Invalid target language: {}", e)))?;

        let mut stats = TranslationStats {
            source_chars: markup::char_len(document),
            ..Default::default()
        };

        if language_utils::languages_match(&target, &self.config.source_language) {
            info!("Target language {} is the source language, returning document unchanged", target);
            if let Some(events) = events {
                emit_text(events, document).await?;
            }
            stats.translated_chars = stats.source_chars;
            stats.duration_ms = start_time.elapsed().as_millis() as u64;
            return Ok(TranslationOutcome {
                translated_document: document.to_string(),
                report: ValidationReport::unchanged(document),
                stats,
            });
        }

        info!("Translating document of {} chars to {}", stats.source_chars, target);

        // Protect
        let protected = ArtifactProtector::protect(document);
        stats.artifacts_protected = protected.artifacts.len();

        // Cover page
        let split = CoverSplit::detect(&protected.text);
        stats.cover_detected = split.has_cover();
        let mut stage_warnings = Vec::new();

        let translated_cover = match split.cover {
            Some(cover_page) => {
                let text = self.translate_cover(cover_page, &target, &mut stats, &mut stage_warnings).await?;
                if let Some(events) = events {
                    emit_text(events, split.leading).await?;
                    emit(events, PipelineEvent::CoverPage { text: text.clone() }).await?;
                    emit_text(events, &format!("{}{}", split.trailing, COVER_SEPARATOR)).await?;
                }
                Some(text)
            }
            None => None,
        };

        // Split
        let segments = self.plan_segments(split.body);
        stats.segments_total = segments.len();
        stats.single_call = segments.len() == 1;
        info!("Body split into {} segment(s)", segments.len());

        // Translate each, in order
        let total = segments.len();
        let mut translated_body = String::with_capacity(split.body.len());
        for segment in &segments {
            if segment.is_blank() {
                debug!("Segment {}/{} is blank, keeping it as is", segment.index + 1, total);
                stats.segments_skipped += 1;
                if let Some(events) = events {
                    emit_text(events, &segment.original_text()).await?;
                }
                translated_body.push_str(&segment.original_text());
                continue;
            }

            if let Some(events) = events {
                emit(events, PipelineEvent::SegmentStarted { index: segment.index, total }).await?;
                emit_text(events, &segment.leading).await?;
            }

            debug!(
                "Translating segment {}/{} ({} chars)",
                segment.index + 1,
                total,
                markup::char_len(&segment.body)
            );
            let request = TranslationRequest::document(segment.body.as_str(), target.as_str());
            let position = segment.index + 1;
            let raw = self
                .call_translator(&request, events, |source| TranslationError::Service {
                    segment: position,
                    total,
                    source,
                })
                .await?;
            stats.translator_calls += 1;
            stats.segments_translated += 1;

            if let Some(events) = events {
                emit_text(events, &segment.trailing).await?;
            }
            translated_body.push_str(&segment.reassemble(&normalize_output(&raw)));
        }

        // Reassemble
        let reassembled = match translated_cover {
            Some(cover_text) => split.reassemble(&cover_text, &translated_body),
            None => translated_body,
        };

        // Restore
        let restore = ArtifactProtector::restore(&reassembled, &protected.artifacts);
        stats.record_restore(&restore);

        // Validate
        let mut report = FidelityValidator::validate(document, &restore.text);
        report.extend_warnings(restore.warnings);
        report.extend_warnings(stage_warnings);

        stats.translated_chars = markup::char_len(&restore.text);
        stats.duration_ms = start_time.elapsed().as_millis() as u64;
        info!("Translation finished: {}", stats.summary());
        if !report.is_clean() {
            warn!("Translation finished with {} fidelity warning(s)", report.warnings.len());
        }

        Ok(TranslationOutcome {
            translated_document: restore.text,
            report,
            stats,
        })
    }

    /// Translate the cover page, applying the failure policy
    async fn translate_cover(
        &self,
        cover_page: &str,
        target: &str,
        stats: &mut TranslationStats,
        warnings: &mut Vec<FidelityWarning>,
    ) -> Result<String, TranslationError> {
        info!("Translating cover page ({} chars)", markup::char_len(cover_page));
        let request = TranslationRequest::html_fragment(cover_page, target);
        let result = self.translator.translate(&request).await;
        stats.translator_calls += 1;

        match result {
            Ok(raw) => Ok(normalize_output(&raw)),
            Err(e) => match self.config.cover_failure {
                CoverFailurePolicy::Abort => Err(TranslationError::Cover(e)),
                CoverFailurePolicy::KeepOriginal => {
                    warn!("Cover page translation failed, keeping the original: {}", e);
                    warnings.push(FidelityWarning::CoverPageKeptOriginal { reason: e.to_string() });
                    Ok(cover_page.to_string())
                }
            },
        }
    }

    /// Translate one piece of text, forwarding increments when streaming
    async fn call_translator(
        &self,
        request: &TranslationRequest,
        events: Option<&EventSender>,
        on_error: impl Fn(ProviderError) -> TranslationError,
    ) -> Result<String, TranslationError> {
        let Some(events) = events else {
            return self.translator.translate(request).await.map_err(on_error);
        };

        let mut stream = self.translator.translate_stream(request).await.map_err(&on_error)?;
        let mut text = String::new();
        loop {
            let next = tokio::select! {
                _ = events.closed() => return Err(TranslationError::Cancelled),
                next = stream.next() => next,
            };

            match next {
                Some(Ok(delta)) => {
                    text.push_str(&delta);
                    emit_text(events, &delta).await?;
                }
                Some(Err(e)) => return Err(on_error(e)),
                None => return Ok(text),
            }
        }
    }
}
