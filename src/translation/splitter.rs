/*!
 * Section-aware splitting of large documents into translation segments.
 *
 * Segments are contiguous slices of the document: the text between the
 * segments is never discarded, it is kept as the segment's leading and
 * trailing whitespace so that joining the segments restores the input
 * byte for byte. Lengths are measured in chars.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::markup::{self, PARAGRAPH_BREAK};

/// Default maximum segment size, in chars
pub const DEFAULT_MAX_SEGMENT_SIZE: usize = 40_000;

/// A paragraph break is accepted as a cut point only this far into the window
const MIN_BREAK_RATIO: f64 = 0.7;

/// One order-tagged slice of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Position of the segment in the document (0-based)
    pub index: usize,

    /// Whitespace preceding the body
    pub leading: String,

    /// Text sent to the translator
    pub body: String,

    /// Whitespace following the body (the separator to the next segment)
    pub trailing: String,
}

impl Segment {
    /// Build a segment from a slice, separating surrounding whitespace
    fn from_slice(index: usize, slice: &str) -> Self {
        let without_trailing = slice.trim_end();
        let body = without_trailing.trim_start();
        let leading_len = without_trailing.len() - body.len();

        Self {
            index,
            leading: without_trailing[..leading_len].to_string(),
            body: body.to_string(),
            trailing: slice[without_trailing.len()..].to_string(),
        }
    }

    /// The whole document as one segment
    pub fn whole(document: &str) -> Self {
        Self::from_slice(0, document)
    }

    /// Whether there is nothing to translate in this segment
    pub fn is_blank(&self) -> bool {
        self.body.is_empty()
    }

    /// The segment as it appeared in the document
    pub fn original_text(&self) -> String {
        self.reassemble(&self.body)
    }

    /// The segment with its body replaced, keeping the original separators
    pub fn reassemble(&self, body: &str) -> String {
        let mut text = String::with_capacity(self.leading.len() + body.len() + self.trailing.len());
        text.push_str(&self.leading);
        text.push_str(body);
        text.push_str(&self.trailing);
        text
    }

    /// Length of the whole slice, in chars
    pub fn char_len(&self) -> usize {
        markup::char_len(&self.leading) + markup::char_len(&self.body) + markup::char_len(&self.trailing)
    }
}

/// Concatenate segments back into a document
pub fn join_segments(segments: &[Segment]) -> String {
    segments.iter().map(Segment::original_text).collect()
}

/// Splits documents at `##` section boundaries under a size budget
#[derive(Debug, Clone)]
pub struct SectionSplitter {
    max_segment_size: usize,
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SEGMENT_SIZE)
    }
}

impl SectionSplitter {
    /// Create a splitter; a zero size is treated as one char
    pub fn new(max_segment_size: usize) -> Self {
        Self {
            max_segment_size: max_segment_size.max(1),
        }
    }

    /// Maximum segment size, in chars
    pub fn max_segment_size(&self) -> usize {
        self.max_segment_size
    }

    /// Split a document into ordered segments
    pub fn split(&self, document: &str) -> Vec<Segment> {
        let ranges = self.split_ranges(document);

        debug!(
            "Split document of {} chars into {} segment(s) (limit {})",
            markup::char_len(document),
            ranges.len(),
            self.max_segment_size
        );

        ranges
            .into_iter()
            .enumerate()
            .map(|(index, range)| Segment::from_slice(index, &document[range]))
            .collect()
    }

    /// Byte ranges of the segments; contiguous and covering the whole document
    fn split_ranges(&self, document: &str) -> Vec<Range<usize>> {
        if document.is_empty() {
            return Vec::new();
        }

        if markup::char_len(document) <= self.max_segment_size {
            return vec![0..document.len()];
        }

        let tokens = markup::token_spans(document);
        let headings = markup::heading_starts(document);

        if headings.is_empty() {
            return self.cut_by_size(document, 0..document.len(), &tokens);
        }

        let mut chunks: Vec<Range<usize>> = Vec::new();

        for (i, &start) in headings.iter().enumerate() {
            let end = headings.get(i + 1).copied().unwrap_or(document.len());
            let section = start..end;
            let section_len = markup::char_len(&document[section.clone()]);

            if section_len > self.max_segment_size {
                chunks.extend(self.subdivide(document, section, &tokens));
                continue;
            }

            match chunks.last_mut() {
                Some(last) if markup::char_len(&document[last.clone()]) + section_len <= self.max_segment_size => {
                    last.end = section.end;
                }
                _ => chunks.push(section),
            }
        }

        let first_heading = headings[0];
        if first_heading > 0 {
            let preamble_len = markup::char_len(&document[..first_heading]);
            let first_len = markup::char_len(&document[chunks[0].clone()]);
            if preamble_len + first_len <= self.max_segment_size {
                chunks[0].start = 0;
            } else {
                let mut pieces = self.cut_by_size(document, 0..first_heading, &tokens);
                pieces.append(&mut chunks);
                chunks = pieces;
            }
        }

        chunks
    }

    /// Fixed-size cuts with no regard for paragraphs
    fn cut_by_size(&self, document: &str, range: Range<usize>, tokens: &[Range<usize>]) -> Vec<Range<usize>> {
        let mut pieces = Vec::new();
        let mut start = range.start;

        while start < range.end {
            let limit = markup::advance_chars(document, start, self.max_segment_size).min(range.end);
            let end = if limit < range.end {
                avoid_token_interior(limit, start, tokens)
            } else {
                limit
            };
            pieces.push(start..end);
            start = end;
        }

        pieces
    }

    /// Cut an oversized section at paragraph breaks where possible
    fn subdivide(&self, document: &str, section: Range<usize>, tokens: &[Range<usize>]) -> Vec<Range<usize>> {
        let mut pieces = Vec::new();
        let mut start = section.start;
        let min_break_chars = (self.max_segment_size as f64 * MIN_BREAK_RATIO).ceil() as usize;

        while start < section.end {
            let limit = markup::advance_chars(document, start, self.max_segment_size).min(section.end);
            let mut end = limit;

            if limit < section.end {
                let window = &document[start..limit];
                let paragraph_cut = window
                    .rfind(PARAGRAPH_BREAK)
                    .filter(|&offset| markup::char_len(&window[..offset]) >= min_break_chars)
                    .map(|offset| start + offset + PARAGRAPH_BREAK.len());

                end = match paragraph_cut {
                    Some(cut) => cut,
                    None => avoid_token_interior(limit, start, tokens),
                };
            }

            pieces.push(start..end);
            start = end;
        }

        pieces
    }
}

/// Move a hard cut back to the start of a placeholder token it would split
fn avoid_token_interior(cut: usize, piece_start: usize, tokens: &[Range<usize>]) -> usize {
    tokens
        .iter()
        .find(|token| token.start < cut && cut < token.end && token.start > piece_start)
        .map(|token| token.start)
        .unwrap_or(cut)
}
