/*!
 * Pattern matchers for the structural elements of generated legal documents.
 *
 * Everything the pipeline needs to recognize in semi-structured markup lives
 * here, so that "what counts as a heading" or "what counts as a signature
 * image" can be tested on its own:
 *
 * - `##` section headings (segment boundaries)
 * - signature image blocks (`<div style=...><img src="data:image/..."></div>`)
 * - artifact placeholder tokens substituted for those blocks
 * - the signatures section anchor used when a token is lost
 * - citation links, blank placeholders and inline images (fidelity markers)
 * - the cover page separator and its structural checks
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Fixed marker for legal content that must be filled in later
pub const BLANK_PLACEHOLDER: &str = "(_____________)";

/// Separator placed between an HTML cover page and the document body
pub const COVER_SEPARATOR: &str = "\n\n---\n\n";

/// Paragraph break used when subdividing oversized sections
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// Prefix shared by every artifact placeholder token
pub const TOKEN_PREFIX: &str = "__SIGNATURE_IMAGE_PLACEHOLDER_";

/// Suffix closing every artifact placeholder token
pub const TOKEN_SUFFIX: &str = "__";

static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^##[ \t]+\S.*$").expect("Invalid heading regex")
});

static SIGNATURE_IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<div[^>]*style="[^"]*"[^>]*>\s*<img[^>]*src="data:image/[^"]+?"[^>]*>\s*</div>"#)
        .expect("Invalid signature image regex")
});

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"__SIGNATURE_IMAGE_PLACEHOLDER_(?:[0-9a-f]+_)?\d+__").expect("Invalid token regex")
});

static SIGNATURES_ANCHOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)##[ \t]+[^\n]*SIGNATURES?[^\n]*\n[^<]*<div[^>]*style="[^"]*"[^>]*>"#)
        .expect("Invalid signatures anchor regex")
});

static CITATION_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<a\s+href="[^"]+"\s+target="_blank">"#).expect("Invalid citation link regex")
});

static INLINE_IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)src="data:image/[^"]+?""#).expect("Invalid inline image regex")
});

static CODE_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z]*[ \t]*\n?(.*?)\n?```\z").expect("Invalid code fence regex")
});

static OPENING_FENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A```[A-Za-z]*[ \t]*\n").expect("Invalid opening fence regex"));

/// Byte offsets of every `##` heading line start, in document order
pub fn heading_starts(text: &str) -> Vec<usize> {
    HEADING_REGEX.find_iter(text).map(|m| m.start()).collect()
}

/// Every signature image block, left to right
pub fn signature_images(text: &str) -> Vec<Range<usize>> {
    SIGNATURE_IMAGE_REGEX.find_iter(text).map(|m| m.range()).collect()
}

/// Build the placeholder token for an artifact
pub fn placeholder_token(id: usize, discriminator: Option<&str>) -> String {
    match discriminator {
        Some(tag) => format!("{}{}_{}{}", TOKEN_PREFIX, tag, id, TOKEN_SUFFIX),
        None => format!("{}{}{}", TOKEN_PREFIX, id, TOKEN_SUFFIX),
    }
}

/// Spans of all placeholder tokens present in the text
pub fn token_spans(text: &str) -> Vec<Range<usize>> {
    TOKEN_REGEX.find_iter(text).map(|m| m.range()).collect()
}

/// Byte offset just past the opening container of the signatures section
pub fn signatures_anchor(text: &str) -> Option<usize> {
    SIGNATURES_ANCHOR_REGEX.find(text).map(|m| m.end())
}

/// Number of citation hyperlinks
pub fn count_citation_links(text: &str) -> usize {
    CITATION_LINK_REGEX.find_iter(text).count()
}

/// Number of blank-fill placeholders
pub fn count_blank_placeholders(text: &str) -> usize {
    text.matches(BLANK_PLACEHOLDER).count()
}

/// Number of inline binary image references
pub fn count_inline_images(text: &str) -> usize {
    INLINE_IMAGE_REGEX.find_iter(text).count()
}

/// Whether a fragment has the structure of a cover page
pub fn looks_like_cover_page(fragment: &str) -> bool {
    fragment.starts_with("<div") && fragment.contains("page-break-after")
}

/// Remove a markdown code fence wrapping the whole text, if present
///
/// Truncated output may open a fence and never close it; the opening
/// line is dropped on its own in that case.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(inner) = CODE_FENCE_REGEX.captures(trimmed).and_then(|caps| caps.get(1)) {
        return inner.as_str().trim();
    }
    match OPENING_FENCE_REGEX.find(trimmed) {
        Some(opening) => trimmed[opening.end()..].trim(),
        None => trimmed,
    }
}

/// Number of chars in a string slice
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset reached by advancing `chars` chars from `from`, clamped to the text end
pub fn advance_chars(text: &str, from: usize, chars: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(chars)
        .map(|(offset, _)| from + offset)
        .unwrap_or(text.len())
}
