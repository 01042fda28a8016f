/*!
 * Tests for structural marker validation
 */

use fidelis::translation::markup::BLANK_PLACEHOLDER;
use fidelis::validation::{FidelityValidator, FidelityWarning, MarkerKind, StructuralMarkerCounts};

use crate::common::documents;

#[test]
fn test_count_withAgreement_shouldFindEveryMarkerKind() {
    let counts = StructuralMarkerCounts::count(&documents::service_agreement());

    assert_eq!(counts.citation_links, 1);
    assert_eq!(counts.blank_placeholders, 4);
    assert_eq!(counts.embedded_images, 2);
}

#[test]
fn test_validate_withIdenticalText_shouldBeClean() {
    let document = documents::service_agreement();
    let report = FidelityValidator::validate(&document, &document);

    assert!(report.is_clean());
    assert_eq!(report.source_counts, report.translated_counts);
}

#[test]
fn test_validate_withDroppedPlaceholder_shouldReportFourToThree() {
    let translated = documents::FOUR_PLACEHOLDERS.replacen(BLANK_PLACEHOLDER, "", 1);
    let report = FidelityValidator::validate(documents::FOUR_PLACEHOLDERS, &translated);

    let mismatch = report.mismatch(MarkerKind::BlankPlaceholder).unwrap();
    assert_eq!(mismatch.to_string(), "placeholder: {source: 4, translated: 3}");
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_validate_withAlteredLinkAndImage_shouldReportEachKind() {
    let document = documents::service_agreement();
    let translated = document
        .replace("target=\"_blank\"", "target=\"_self\"")
        .replacen("src=\"data:image/png", "src=\"https://cdn.example.org/img", 1);

    let report = FidelityValidator::validate(&document, &translated);

    assert_eq!(report.mismatches().len(), 2);
    assert!(report.mismatch(MarkerKind::CitationLink).is_some());
    assert_eq!(report.mismatch(MarkerKind::EmbeddedImage).unwrap().translated, 1);
    assert!(report.mismatch(MarkerKind::BlankPlaceholder).is_none());
}

#[test]
fn test_report_shouldSerializeWarningsWithTypeTag() {
    let translated = documents::FOUR_PLACEHOLDERS.replacen(BLANK_PLACEHOLDER, "", 1);
    let mut report = FidelityValidator::validate(documents::FOUR_PLACEHOLDERS, &translated);
    report.extend_warnings([FidelityWarning::CoverPageKeptOriginal {
        reason: "timeout".to_string(),
    }]);

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["source_counts"]["blank_placeholders"], 4);
    assert_eq!(json["warnings"][0]["type"], "structural_mismatch");
    assert_eq!(json["warnings"][0]["kind"], "blank_placeholder");
    assert_eq!(json["warnings"][1]["type"], "cover_page_kept_original");
}
