/*!
 * Tests for language resolution
 */

use fidelis::language_utils::{get_language_name, normalize_to_part2t, resolve_language_name};
use fidelis::languages_match;

#[test]
fn test_normalize_withBibliographicCodes_shouldReturnTerminologyCodes() {
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("FRE").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("de").unwrap(), "deu");
    assert!(normalize_to_part2t("german").is_err());
}

#[test]
fn test_getLanguageName_withTwoAndThreeLetterCodes_shouldAgree() {
    assert_eq!(get_language_name("bn").unwrap(), "Bengali");
    assert_eq!(get_language_name("ben").unwrap(), "Bengali");
    assert_eq!(get_language_name("ger").unwrap(), "German");
}

#[test]
fn test_resolveLanguageName_withAliases_shouldUseCanonicalName() {
    assert_eq!(resolve_language_name("Bangla").unwrap(), "Bengali");
    assert_eq!(resolve_language_name("FARSI").unwrap(), "Persian");
}

/// Unknown names reach the model as typed
#[test]
fn test_resolveLanguageName_withFreeFormName_shouldKeepOriginalCasing() {
    assert_eq!(resolve_language_name("  Brazilian Portuguese ").unwrap(), "Brazilian Portuguese");
}

#[test]
fn test_languagesMatch_withMixedForms_shouldCompareByName() {
    assert!(languages_match("hi", "Hindi"));
    assert!(languages_match("ger", "de"));
    assert!(languages_match("Brazilian Portuguese", "brazilian portuguese"));
    assert!(!languages_match("hi", "bn"));
    assert!(!languages_match("   ", "   "));
}
