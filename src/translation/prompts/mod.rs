/*!
 * Prompt engineering for legal document translation.
 *
 * This module provides:
 * - System and user prompt templates for document text and HTML fragments
 * - Rendering of templates for a target language
 */

pub mod templates;

// Re-export main types
pub use templates::{PromptTemplate, RenderedPrompt};
