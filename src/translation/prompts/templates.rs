/*!
 * Prompt templates for legal document translation.
 *
 * Two kinds of content are sent to the model: markdown document text (with
 * embedded HTML, placeholders and artifact tokens) and standalone HTML
 * fragments such as the cover page. Each has its own system and user prompt.
 */

use crate::translation::ContentKind;
use crate::translation::markup::{BLANK_PLACEHOLDER, TOKEN_PREFIX};

/// System and user prompt template for one kind of content.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system: &'static str,
    user: &'static str,
}

/// A rendered prompt ready to be sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// System message
    pub system: String,
    /// User message, including the text to translate
    pub user: String,
}

impl PromptTemplate {
    /// System prompt for document text.
    pub const DOCUMENT_SYSTEM: &'static str = "You are a professional legal translator. \
You MUST translate the document to {target_language}. The entire output must be in \
{target_language}, not in English or any other language.";

    /// User prompt for document text.
    pub const DOCUMENT_USER: &'static str = r#"Translate the following legal contract text to {target_language} while keeping its formatting and legal meaning exact.

## Target language
- The entire output must be in {target_language}, including section titles
- Only the items listed under "Keep as-is" stay untranslated

## Formatting
- Keep all markdown syntax exactly: ##, ###, **, -, 1., (a)
- Keep every heading, list item, paragraph break and blank line
- Keep the order of sections and sub-sections unchanged

## Keep as-is
- Party names, dates, currency amounts, addresses, emails, phone numbers and URLs
- The fill-in placeholder {blank_placeholder}, exactly as written, every time it appears
- Tokens starting with {token_prefix}, exactly as written, in the same position

## HTML
- Keep every HTML tag and attribute exactly: <div>, <img>, <a>, <p>, <span>, style, src, href, target
- For links such as [<a href="http://example.com" target="_blank">Source: Act 1872</a>] translate only the link text
- Never change inline CSS or base64 image data

## Legal terminology
- Use formal legal terminology customary in {target_language} legal documents
- Translate legal concepts precisely and keep a formal tone

Return ONLY the translated text, without explanations and without wrapping it in code blocks.

Text to translate:
{text}"#;

    /// System prompt for HTML fragments.
    pub const HTML_SYSTEM: &'static str = "You are a professional translator. \
You MUST translate the HTML content to {target_language}. The entire visible text must be in \
{target_language}. Preserve all HTML tags exactly.";

    /// User prompt for HTML fragments.
    pub const HTML_USER: &'static str = r#"Translate the following HTML content to {target_language}.

Rules:
1. Keep all HTML tags, attributes and inline styles exactly as they are
2. Translate only the visible text inside the tags
3. Keep the structure and nesting unchanged
4. Do not translate numbers, dates or party names
5. Do not wrap the output in markdown code blocks

HTML content to translate:
{text}

Return ONLY the translated HTML."#;

    /// Template for the given content kind.
    pub fn for_content(content: ContentKind) -> Self {
        match content {
            ContentKind::Document => Self {
                system: Self::DOCUMENT_SYSTEM,
                user: Self::DOCUMENT_USER,
            },
            ContentKind::HtmlFragment => Self {
                system: Self::HTML_SYSTEM,
                user: Self::HTML_USER,
            },
        }
    }

    /// Render the template for a target language and text.
    pub fn render(&self, target_language: &str, text: &str) -> RenderedPrompt {
        let fill = |template: &str| {
            template
                .replace("{target_language}", target_language)
                .replace("{blank_placeholder}", BLANK_PLACEHOLDER)
                .replace("{token_prefix}", TOKEN_PREFIX)
        };

        // The text goes in last so that braces inside it are never substituted
        RenderedPrompt {
            system: fill(self.system),
            user: fill(self.user).replace("{text}", text),
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::for_content(ContentKind::Document)
    }
}
