/*!
 * Tests for the mock translator used throughout the suite
 */

use fidelis::errors::ProviderError;
use fidelis::providers::mock::{MockFailure, MockTranslator};
use fidelis::translation::{ContentKind, TranslationRequest, Translator};
use futures::TryStreamExt;

#[tokio::test]
async fn test_clone_shouldShareRecordedCalls() {
    let mock = MockTranslator::identity();
    let clone = mock.clone();

    clone.translate(&TranslationRequest::document("first", "Hindi")).await.unwrap();
    clone.translate(&TranslationRequest::html_fragment("<p>second</p>", "Hindi")).await.unwrap();

    assert_eq!(mock.call_count(), 2);
    assert_eq!(mock.call_texts(), vec!["first", "<p>second</p>"]);
    assert_eq!(mock.calls()[1].content, ContentKind::HtmlFragment);
}

#[tokio::test]
async fn test_withTransform_shouldSeeTargetLanguage() {
    let mock = MockTranslator::with_transform(|request| format!("[{}] {}", request.target_language, request.text));

    let output = mock.translate(&TranslationRequest::document("Hello", "Bengali")).await.unwrap();
    assert_eq!(output, "[Bengali] Hello");
}

#[tokio::test]
async fn test_failures_shouldMapOntoProviderTaxonomy() {
    let mock = MockTranslator::identity()
        .failing_on_call(1, MockFailure::Status(429))
        .failing_on_call(2, MockFailure::Status(401))
        .failing_on_call(3, MockFailure::Timeout);
    let request = TranslationRequest::document("x", "Arabic");

    let rate_limited = mock.translate(&request).await.unwrap_err();
    assert!(matches!(rate_limited, ProviderError::RateLimitExceeded(_)));
    assert!(rate_limited.is_transient());

    let unauthorized = mock.translate(&request).await.unwrap_err();
    assert!(matches!(unauthorized, ProviderError::AuthenticationError(_)));
    assert!(!unauthorized.is_transient());

    assert!(matches!(mock.translate(&request).await, Err(ProviderError::Timeout(_))));
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_alwaysFailing_shouldFailStreamsToo() {
    let mock = MockTranslator::identity().always_failing(MockFailure::Connection);
    let request = TranslationRequest::document("x", "Hindi");

    assert!(matches!(mock.translate_stream(&request).await, Err(ProviderError::ConnectionError(_))));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_translateStream_withoutChunking_shouldYieldWholeOutput() {
    let mock = MockTranslator::prefixing("T:");
    let request = TranslationRequest::document("ক খ গ", "Bengali");

    let pieces: Vec<String> = mock.translate_stream(&request).await.unwrap().try_collect().await.unwrap();
    assert_eq!(pieces, vec!["T:ক খ গ"]);
}
