/*!
 * Validation of translated documents.
 *
 * - `markers`: counts structural markers (citation links, blank
 *   placeholders, inline images)
 * - `fidelity`: compares counts between source and translation and
 *   builds the `ValidationReport`
 */

pub mod markers;
pub mod fidelity;

// Re-export main types
pub use fidelity::{FidelityValidator, FidelityWarning, MarkerMismatch, ValidationReport};
pub use markers::{MarkerKind, StructuralMarkerCounts};
