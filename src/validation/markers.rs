/*!
 * Structural marker counting.
 *
 * Counts the three kinds of markers whose number must not change between a
 * document and its translation: citation hyperlinks, blank-fill placeholders
 * and inline binary images.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::translation::markup;

/// Kinds of structural markers tracked across translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// `<a href="..." target="_blank">` opening tags
    CitationLink,
    /// `(_____________)` fill-in markers
    BlankPlaceholder,
    /// `src="data:image/..."` references
    EmbeddedImage,
}

impl MarkerKind {
    /// All kinds, in report order
    pub const ALL: [MarkerKind; 3] = [Self::CitationLink, Self::BlankPlaceholder, Self::EmbeddedImage];

    /// Short name used in logs and warnings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CitationLink => "link",
            Self::BlankPlaceholder => "placeholder",
            Self::EmbeddedImage => "image",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker counts for one text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralMarkerCounts {
    pub citation_links: usize,
    pub blank_placeholders: usize,
    pub embedded_images: usize,
}

impl StructuralMarkerCounts {
    /// Count every marker kind in a text
    pub fn count(text: &str) -> Self {
        Self {
            citation_links: markup::count_citation_links(text),
            blank_placeholders: markup::count_blank_placeholders(text),
            embedded_images: markup::count_inline_images(text),
        }
    }

    /// Count for a single kind
    pub fn get(&self, kind: MarkerKind) -> usize {
        match kind {
            MarkerKind::CitationLink => self.citation_links,
            MarkerKind::BlankPlaceholder => self.blank_placeholders,
            MarkerKind::EmbeddedImage => self.embedded_images,
        }
    }

    /// Total markers of all kinds
    pub fn total(&self) -> usize {
        self.citation_links + self.blank_placeholders + self.embedded_images
    }
}
