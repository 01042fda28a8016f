/*!
 * Optional HTML cover page ahead of the document body.
 */

use super::markup::{self, COVER_SEPARATOR};

/// A document split at its cover page separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverSplit<'a> {
    /// Whitespace ahead of the cover fragment
    pub leading: &'a str,

    /// Cover fragment, trimmed
    pub cover: Option<&'a str>,

    /// Whitespace between the cover fragment and the separator
    pub trailing: &'a str,

    /// Everything after the first separator, or the whole document
    pub body: &'a str,
}

impl<'a> CoverSplit<'a> {
    /// Detect a cover page
    ///
    /// The text before the first separator counts as a cover only when it
    /// starts with a `<div` and carries a `page-break-after` style.
    pub fn detect(document: &'a str) -> Self {
        if let Some(position) = document.find(COVER_SEPARATOR) {
            let head = &document[..position];
            let candidate = head.trim();
            if markup::looks_like_cover_page(candidate) {
                let start = head.len() - head.trim_start().len();
                return Self {
                    leading: &head[..start],
                    cover: Some(candidate),
                    trailing: &head[start + candidate.len()..],
                    body: &document[position + COVER_SEPARATOR.len()..],
                };
            }
        }

        Self {
            leading: "",
            cover: None,
            trailing: "",
            body: document,
        }
    }

    /// Whether a cover page was found
    pub fn has_cover(&self) -> bool {
        self.cover.is_some()
    }

    /// Join a translated cover and body, keeping the original whitespace and separator
    pub fn reassemble(&self, cover: &str, body: &str) -> String {
        let mut document = String::with_capacity(
            self.leading.len() + cover.len() + self.trailing.len() + COVER_SEPARATOR.len() + body.len(),
        );
        document.push_str(self.leading);
        document.push_str(cover);
        document.push_str(self.trailing);
        document.push_str(COVER_SEPARATOR);
        document.push_str(body);
        document
    }
}
