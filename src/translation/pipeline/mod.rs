/*!
 * Translation pipeline for legal documents.
 *
 * The pipeline runs a document through protection, splitting, sequential
 * segment translation, reassembly, artifact restoration and fidelity
 * validation. It can either return the finished translation or stream
 * progress events while it works.
 */

pub mod orchestrator;
pub mod outcome;

// Re-export types used externally
pub use orchestrator::{DEFAULT_SINGLE_CALL_THRESHOLD, PipelineConfig, TranslationPipeline};
pub use outcome::{PipelineEvent, TranslationOutcome, TranslationStats};
