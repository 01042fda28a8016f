/*!
 * Results and events produced by the translation pipeline.
 */

use serde::Serialize;

use crate::errors::TranslationError;
use crate::translation::protector::{RestoreMethod, RestoreOutcome};
use crate::validation::ValidationReport;

/// Statistics collected during one pipeline invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    /// Segments the body was split into
    pub segments_total: usize,

    /// Segments sent to the translator
    pub segments_translated: usize,

    /// Whitespace-only segments passed through untouched
    pub segments_skipped: usize,

    /// Calls made to the translator, cover page included
    pub translator_calls: usize,

    /// Whether the body went out in a single call
    pub single_call: bool,

    /// Whether a cover page was found
    pub cover_detected: bool,

    /// Signature images swapped for tokens
    pub artifacts_protected: usize,

    /// Artifacts whose token survived translation
    pub artifacts_restored_exact: usize,

    /// Artifacts put back at the signatures anchor
    pub artifacts_restored_anchor: usize,

    /// Artifacts that could not be placed
    pub artifacts_lost: usize,

    /// Source document length in chars
    pub source_chars: usize,

    /// Translated document length in chars
    pub translated_chars: usize,

    /// Wall clock time of the invocation
    pub duration_ms: u64,
}

impl TranslationStats {
    /// Record how artifacts were restored
    pub fn record_restore(&mut self, restore: &RestoreOutcome) {
        self.artifacts_restored_exact = restore.count(RestoreMethod::Exact);
        self.artifacts_restored_anchor = restore.count(RestoreMethod::SignaturesAnchor);
        self.artifacts_lost = restore.count(RestoreMethod::Lost);
    }

    /// One-line summary for logs and the CLI
    pub fn summary(&self) -> String {
        format!(
            "{} segment(s), {} translated, {} call(s), {} image(s) protected ({} exact, {} anchored, {} lost) in {:.2}s",
            self.segments_total,
            self.segments_translated,
            self.translator_calls,
            self.artifacts_protected,
            self.artifacts_restored_exact,
            self.artifacts_restored_anchor,
            self.artifacts_lost,
            self.duration_ms as f64 / 1000.0
        )
    }
}

/// Final result of translating a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationOutcome {
    /// The translated document with artifacts restored
    pub translated_document: String,

    /// Fidelity findings
    pub report: ValidationReport,

    /// Run statistics
    pub stats: TranslationStats,
}

/// Event emitted by an incremental translation
///
/// Increments are a live preview: their concatenation is the raw model
/// output with the original separators. The authoritative document, with
/// fences stripped and artifacts restored, arrives in `Completed`.
#[derive(Debug)]
pub enum PipelineEvent {
    /// The translated cover page (or the original one, if it was kept)
    CoverPage { text: String },

    /// A body segment is about to be translated
    SegmentStarted {
        /// 0-based segment index
        index: usize,
        /// Number of body segments
        total: usize,
    },

    /// A piece of translated text or an original separator
    Increment(String),

    /// The translation finished
    Completed(TranslationOutcome),

    /// The translation was abandoned
    Failed(TranslationError),
}

impl PipelineEvent {
    /// Whether no further events follow this one
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }
}
