/*!
 * Protection of embedded signature images across translation.
 *
 * Inline base64 images are far too large and fragile to hand to a language
 * model. `ArtifactProtector::protect` swaps every signature image block for a
 * short opaque token before translation; `ArtifactProtector::restore` puts
 * the original blocks back afterwards. Tokens the translator dropped or
 * mangled are recovered into the signatures section when one can be found,
 * and reported otherwise.
 */

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::markup;
use crate::validation::FidelityWarning;

/// An embedded block replaced by a token during translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralArtifact {
    /// Discovery index, left to right
    pub id: usize,

    /// The exact matched block
    pub original_text: String,

    /// Token substituted for the block
    pub placeholder_token: String,
}

/// A document with its artifacts swapped for tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedDocument {
    /// The document text containing tokens
    pub text: String,

    /// Artifacts in discovery order
    pub artifacts: Vec<StructuralArtifact>,
}

/// How an artifact made it back into the translated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreMethod {
    /// The token survived and was replaced in place
    Exact,
    /// The token was lost; the block was spliced into the signatures section
    SignaturesAnchor,
    /// The block could not be placed
    Lost,
}

/// Result of restoring artifacts into a translated document
#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    /// The translated text with artifacts restored
    pub text: String,

    /// Restore method per artifact, indexed by artifact id
    pub methods: Vec<RestoreMethod>,

    /// One warning per lost artifact
    pub warnings: Vec<FidelityWarning>,
}

impl RestoreOutcome {
    /// Whether every artifact was put back
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Count of artifacts restored with the given method
    pub fn count(&self, method: RestoreMethod) -> usize {
        self.methods.iter().filter(|m| **m == method).count()
    }
}

/// Swaps signature image blocks for tokens and back
pub struct ArtifactProtector;

impl ArtifactProtector {
    /// Replace every signature image block with a unique token
    pub fn protect(document: &str) -> ProtectedDocument {
        let spans = markup::signature_images(document);
        if spans.is_empty() {
            return ProtectedDocument {
                text: document.to_string(),
                artifacts: Vec::new(),
            };
        }

        let discriminator = Self::discriminator_for(document, spans.len());
        let mut text = document.to_string();
        let mut artifacts = Vec::with_capacity(spans.len());

        for (id, span) in spans.into_iter().enumerate() {
            let original_text = document[span].to_string();
            let placeholder_token = markup::placeholder_token(id, discriminator.as_deref());
            text = text.replacen(&original_text, &placeholder_token, 1);
            artifacts.push(StructuralArtifact {
                id,
                original_text,
                placeholder_token,
            });
        }

        info!("Protected {} signature image(s) for translation", artifacts.len());

        ProtectedDocument { text, artifacts }
    }

    /// Put artifacts back into a translated document
    pub fn restore(translated: &str, artifacts: &[StructuralArtifact]) -> RestoreOutcome {
        let mut text = translated.to_string();
        let mut methods = vec![RestoreMethod::Lost; artifacts.len()];
        let mut missing = Vec::new();

        for artifact in artifacts {
            if text.contains(&artifact.placeholder_token) {
                text = text.replace(&artifact.placeholder_token, &artifact.original_text);
                methods[artifact.id] = RestoreMethod::Exact;
                debug!("Restored artifact {} in place", artifact.id);
            } else {
                warn!(
                    "Placeholder {} for artifact {} not found in translation",
                    artifact.placeholder_token, artifact.id
                );
                missing.push(artifact);
            }
        }

        let mut warnings = Vec::new();
        if !missing.is_empty() {
            match markup::signatures_anchor(&text) {
                Some(anchor) => {
                    let mut spliced = String::new();
                    for artifact in &missing {
                        spliced.push('\n');
                        spliced.push_str(&artifact.original_text);
                        methods[artifact.id] = RestoreMethod::SignaturesAnchor;
                    }
                    text.insert_str(anchor, &spliced);
                    info!("Restored {} artifact(s) into the signatures section", missing.len());
                }
                None => {
                    for artifact in &missing {
                        warn!(
                            "Could not find signatures section, artifact {} is missing from the translation",
                            artifact.id
                        );
                        warnings.push(FidelityWarning::ArtifactRestore {
                            artifact_id: artifact.id,
                            token: artifact.placeholder_token.clone(),
                        });
                    }
                }
            }
        }

        RestoreOutcome {
            text,
            methods,
            warnings,
        }
    }

    /// Random tag for tokens when the plain token shape already occurs in the document
    fn discriminator_for(document: &str, count: usize) -> Option<String> {
        let collides = |tag: Option<&str>| (0..count).any(|id| document.contains(&markup::placeholder_token(id, tag)));

        if !collides(None) {
            return None;
        }

        loop {
            let tag = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
            if !collides(Some(&tag)) {
                debug!("Using token discriminator {} to avoid collisions", tag);
                return Some(tag);
            }
        }
    }
}
