//! Language utilities for turning user input into language names
//!
//! The translation prompt needs a human readable language name. Users may
//! pass ISO 639-1 codes (`bn`), ISO 639-2 codes (`ben`, `ger`), English
//! names in any case (`bengali`) or common aliases (`bangla`).

use anyhow::{Result, anyhow};
use isolang::Language;

/// Informal names that ISO tables do not carry
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("bangla", "Bengali"),
    ("farsi", "Persian"),
    ("mandarin", "Chinese"),
];

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        // ISO 639-2/B codes that differ from their 639-2/T form
        let part2t = match normalized_code.as_str() {
            "fre" => "fra",
            "ger" => "deu",
            "dut" => "nld",
            "gre" => "ell",
            "chi" => "zho",
            "cze" => "ces",
            "ice" => "isl",
            "alb" => "sqi",
            "arm" => "hye",
            "baq" => "eus",
            "bur" => "mya",
            "per" => "fas",
            "geo" => "kat",
            "may" => "msa",
            "mac" => "mkd",
            "rum" => "ron",
            "slo" => "slk",
            "wel" => "cym",
            _ => "",
        };
        if !part2t.is_empty() {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Resolve user input to the language name sent to the translator
///
/// Aliases win over codes, codes over English names. Anything else is used
/// verbatim so that less common names still reach the model unchanged.
pub fn resolve_language_name(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Language must not be empty"));
    }

    let key = trimmed.to_lowercase();

    if let Some((_, name)) = LANGUAGE_ALIASES.iter().find(|(alias, _)| *alias == key) {
        return Ok((*name).to_string());
    }

    if let Ok(name) = get_language_name(&key) {
        return Ok(name);
    }

    if let Some(lang) = Language::from_name(&title_case(&key)) {
        return Ok(lang.to_name().to_string());
    }

    Ok(trimmed.to_string())
}

/// Whether two inputs name the same language
pub fn languages_match(first: &str, second: &str) -> bool {
    match (resolve_language_name(first), resolve_language_name(second)) {
        (Ok(a), Ok(b)) => a.eq_ignore_ascii_case(&b),
        _ => false,
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
