/*!
 * Translation of structurally rich legal documents.
 *
 * This module contains everything between a source document and its
 * translated counterpart:
 *
 * - `markup`: matchers for headings, signature images, tokens and markers
 * - `splitter`: lossless splitting of documents into bounded segments
 * - `protector`: swapping signature images for tokens and back
 * - `cover`: detection of the optional HTML cover page
 * - `prompts`: prompts sent to the language model
 * - `core`: the provider-backed `TranslationService`
 * - `pipeline`: the orchestrator tying all of the above together
 */

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::fmt;

use crate::errors::ProviderError;

// Submodules
pub mod core;
pub mod cover;
pub mod markup;
pub mod pipeline;
pub mod prompts;
pub mod protector;
pub mod splitter;

// Re-export main types for easier usage
pub use self::core::TranslationService;
pub use self::cover::CoverSplit;
pub use self::pipeline::{PipelineConfig, PipelineEvent, TranslationOutcome, TranslationPipeline, TranslationStats};
pub use self::protector::{ArtifactProtector, ProtectedDocument, RestoreMethod, RestoreOutcome, StructuralArtifact};
pub use self::splitter::{SectionSplitter, Segment, join_segments};

/// Stream of translated text increments
pub type TextStream = BoxStream<'static, Result<String, ProviderError>>;

/// What kind of text a request carries, which decides the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Markdown legal document text
    Document,
    /// Standalone HTML fragment such as a cover page
    HtmlFragment,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::HtmlFragment => write!(f, "html fragment"),
        }
    }
}

/// A single call to the translation capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Text to translate
    pub text: String,

    /// Human readable target language name
    pub target_language: String,

    /// Kind of content
    pub content: ContentKind,
}

impl TranslationRequest {
    /// Request for a piece of document text
    pub fn document(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_language: target_language.into(),
            content: ContentKind::Document,
        }
    }

    /// Request for an HTML fragment
    pub fn html_fragment(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_language: target_language.into(),
            content: ContentKind::HtmlFragment,
        }
    }
}

/// External translation capability used by the pipeline
///
/// Implementations carry their own credentials and model settings; the
/// pipeline only ever sees this trait.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate text in one call
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Translate text as a stream of increments
    ///
    /// The concatenation of all increments is the translation. The default
    /// yields the blocking result as a single increment.
    async fn translate_stream(&self, request: &TranslationRequest) -> Result<TextStream, ProviderError> {
        let text = self.translate(request).await?;
        Ok(stream::once(async move { Ok(text) }).boxed())
    }

    /// Check that the translator can be reached before any document is sent
    async fn check_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
