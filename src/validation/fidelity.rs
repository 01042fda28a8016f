/*!
 * Fidelity validation of a translated document against its source.
 *
 * The validator never modifies or blocks a translation. It compares marker
 * counts and reports differences as warnings that callers can surface to a
 * human reviewer.
 */

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::markers::{MarkerKind, StructuralMarkerCounts};

/// A count difference for one marker kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerMismatch {
    pub kind: MarkerKind,
    pub source: usize,
    pub translated: usize,
}

impl fmt::Display for MarkerMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {{source: {}, translated: {}}}", self.kind, self.source, self.translated)
    }
}

/// Non-fatal anomaly found in a translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FidelityWarning {
    /// Marker counts differ between source and translation
    StructuralMismatch(MarkerMismatch),

    /// An artifact token was lost and no anchor was found to put the block back
    ArtifactRestore {
        artifact_id: usize,
        token: String,
    },

    /// The cover page call failed and the untranslated cover was kept
    CoverPageKeptOriginal {
        reason: String,
    },
}

impl fmt::Display for FidelityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StructuralMismatch(mismatch) => write!(f, "Marker count mismatch, {}", mismatch),
            Self::ArtifactRestore { artifact_id, token } => {
                write!(f, "Signature image {} could not be restored (token {})", artifact_id, token)
            }
            Self::CoverPageKeptOriginal { reason } => {
                write!(f, "Cover page left untranslated: {}", reason)
            }
        }
    }
}

/// Outcome of comparing a translation with its source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub source_counts: StructuralMarkerCounts,
    pub translated_counts: StructuralMarkerCounts,
    pub warnings: Vec<FidelityWarning>,
}

impl ValidationReport {
    /// Report for an untouched document
    pub fn unchanged(document: &str) -> Self {
        let counts = StructuralMarkerCounts::count(document);
        Self {
            source_counts: counts,
            translated_counts: counts,
            warnings: Vec::new(),
        }
    }

    /// Whether no warnings were raised
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Only the marker count mismatches
    pub fn mismatches(&self) -> Vec<MarkerMismatch> {
        self.warnings
            .iter()
            .filter_map(|warning| match warning {
                FidelityWarning::StructuralMismatch(mismatch) => Some(*mismatch),
                _ => None,
            })
            .collect()
    }

    /// Mismatch for a given marker kind, if any
    pub fn mismatch(&self, kind: MarkerKind) -> Option<MarkerMismatch> {
        self.mismatches().into_iter().find(|mismatch| mismatch.kind == kind)
    }

    /// Append warnings raised by earlier pipeline stages
    pub fn extend_warnings(&mut self, warnings: impl IntoIterator<Item = FidelityWarning>) {
        self.warnings.extend(warnings);
    }
}

/// Compares structural marker counts
pub struct FidelityValidator;

impl FidelityValidator {
    /// Compare marker counts of a source document and its translation
    pub fn validate(source: &str, translated: &str) -> ValidationReport {
        let source_counts = StructuralMarkerCounts::count(source);
        let translated_counts = StructuralMarkerCounts::count(translated);

        let warnings: Vec<FidelityWarning> = MarkerKind::ALL
            .iter()
            .filter_map(|&kind| {
                let mismatch = MarkerMismatch {
                    kind,
                    source: source_counts.get(kind),
                    translated: translated_counts.get(kind),
                };
                (mismatch.source != mismatch.translated).then_some(mismatch)
            })
            .inspect(|mismatch| warn!("Translation fidelity check failed, {}", mismatch))
            .map(FidelityWarning::StructuralMismatch)
            .collect();

        if warnings.is_empty() {
            info!(
                "Translation fidelity check passed ({} markers: {} links, {} placeholders, {} images)",
                source_counts.total(),
                source_counts.citation_links,
                source_counts.blank_placeholders,
                source_counts.embedded_images
            );
        }

        ValidationReport {
            source_counts,
            translated_counts,
            warnings,
        }
    }
}
