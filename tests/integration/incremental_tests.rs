/*!
 * Tests for incremental translation events and cancellation
 */

use std::time::Duration;

use fidelis::errors::{ProviderError, TranslationError};
use fidelis::providers::mock::{MockFailure, MockTranslator};
use fidelis::translation::markup::COVER_SEPARATOR;
use fidelis::translation::{PipelineConfig, PipelineEvent};

use crate::common::{self, documents};

fn document_with_cover() -> String {
    format!("{}{}{}", documents::COVER_PAGE, COVER_SEPARATOR, documents::FOUR_PLACEHOLDERS)
}

#[tokio::test]
async fn test_translateIncremental_withCover_shouldEmitEventsInOrder() {
    common::init_logging();
    let mock = MockTranslator::identity();
    let pipeline = common::pipeline_with(&mock, PipelineConfig::default());

    let events = common::collect_events(pipeline.translate_incremental(document_with_cover(), "Hindi")).await;

    assert!(matches!(&events[0], PipelineEvent::CoverPage { text } if text == documents::COVER_PAGE));
    assert!(matches!(&events[1], PipelineEvent::Increment(text) if text == COVER_SEPARATOR));
    assert!(matches!(events[2], PipelineEvent::SegmentStarted { index: 0, total: 1 }));
    assert!(matches!(events.last(), Some(PipelineEvent::Completed(_))));
    assert_eq!(events.iter().filter(|event| event.is_terminal()).count(), 1);
}

/// The preview matches the final document when nothing needs restoring
#[tokio::test]
async fn test_translateIncremental_withChunks_shouldPreviewFinalDocument() {
    let mock = MockTranslator::prefixing("[T]").with_stream_chunks(7);
    let pipeline = common::pipeline_with(&mock, PipelineConfig::default());

    let events = common::collect_events(pipeline.translate_incremental(document_with_cover(), "Bengali")).await;

    let cover = match &events[0] {
        PipelineEvent::CoverPage { text } => text.clone(),
        other => panic!("expected the cover page first, got {:?}", other),
    };
    let outcome = match events.last() {
        Some(PipelineEvent::Completed(outcome)) => outcome,
        other => panic!("expected completion, got {:?}", other),
    };

    assert_eq!(format!("{}{}", cover, common::increments_text(&events)), outcome.translated_document);
    assert!(outcome.translated_document.starts_with("[T]<div"));
}

#[tokio::test]
async fn test_translateIncremental_withWhitespaceAroundCover_shouldPreviewIt() {
    let mock = MockTranslator::identity().with_stream_chunks(9);
    let pipeline = common::pipeline_with(&mock, PipelineConfig::default());
    let document = format!("\n  {}  {}{}", documents::COVER_PAGE, COVER_SEPARATOR, documents::FOUR_PLACEHOLDERS);

    let events = common::collect_events(pipeline.translate_incremental(document.clone(), "Hindi")).await;

    assert!(matches!(&events[0], PipelineEvent::Increment(text) if text == "\n  "));
    assert!(matches!(&events[1], PipelineEvent::CoverPage { text } if text == documents::COVER_PAGE));
    assert!(matches!(&events[2], PipelineEvent::Increment(text) if *text == format!("  {}", COVER_SEPARATOR)));

    let preview: String = events
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::CoverPage { text } | PipelineEvent::Increment(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(preview, document);
    assert!(matches!(events.last(), Some(PipelineEvent::Completed(outcome)) if outcome.translated_document == document));
}

#[tokio::test]
async fn test_translateIncremental_withSegments_shouldAnnounceEachInOrder() {
    let mock = MockTranslator::identity().with_stream_chunks(10);
    let pipeline = common::splitting_pipeline(&mock, 80);

    let events = common::collect_events(pipeline.translate_incremental(documents::THREE_SPLITTABLE_SECTIONS, "Hindi")).await;

    let started: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::SegmentStarted { index, total } => Some((*index, *total)),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![(0, 3), (1, 3), (2, 3)]);
    assert_eq!(common::increments_text(&events), documents::THREE_SPLITTABLE_SECTIONS);
    assert!(events.iter().all(|event| !matches!(event, PipelineEvent::Increment(text) if text.is_empty())));
}

#[tokio::test]
async fn test_translateIncremental_withFailingProvider_shouldEndWithFailed() {
    let mock = MockTranslator::identity().always_failing(MockFailure::Status(503));
    let pipeline = common::pipeline_with(&mock, PipelineConfig::default());

    let events = common::collect_events(pipeline.translate_incremental(documents::THREE_SHORT_SECTIONS, "Hindi")).await;

    assert!(matches!(
        events.last(),
        Some(PipelineEvent::Failed(TranslationError::Service { segment: 1, total: 1, .. }))
    ));
    assert!(!events.iter().any(|event| matches!(event, PipelineEvent::Completed(_))));
}

/// A stream that breaks after its first increment abandons the document
#[tokio::test]
async fn test_translateIncremental_withStreamBreakingMidway_shouldEndWithFailed() {
    let mock = MockTranslator::identity()
        .with_stream_chunks(4)
        .failing_mid_stream(1, MockFailure::Timeout);
    let pipeline = common::pipeline_with(&mock, PipelineConfig::default());

    let events = common::collect_events(pipeline.translate_incremental(documents::THREE_SHORT_SECTIONS, "Hindi")).await;

    match events.as_slice() {
        [
            PipelineEvent::SegmentStarted { index: 0, total: 1 },
            PipelineEvent::Increment(text),
            PipelineEvent::Failed(TranslationError::Service { segment: 1, total: 1, source }),
        ] => {
            assert_eq!(text, "## 1");
            assert!(matches!(source, ProviderError::Timeout(_)));
        }
        other => panic!("unexpected events: {:?}", other),
    }
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_translateIncremental_withSplitDocumentAndBrokenStream_shouldStopAtFirstSegment() {
    let mock = MockTranslator::identity()
        .with_stream_chunks(5)
        .failing_mid_stream(3, MockFailure::Connection);
    let pipeline = common::splitting_pipeline(&mock, 80);

    let events = common::collect_events(pipeline.translate_incremental(documents::THREE_SPLITTABLE_SECTIONS, "Hindi")).await;

    assert!(matches!(
        events.last(),
        Some(PipelineEvent::Failed(TranslationError::Service { segment: 1, total: 3, .. }))
    ));
    assert!(!events.iter().any(|event| matches!(event, PipelineEvent::Completed(_))));
    assert_eq!(events.iter().filter(|event| event.is_terminal()).count(), 1);
    assert_eq!(mock.call_count(), 1);
}

/// Increments follow segment order even when outputs differ greatly in size
#[tokio::test]
async fn test_translateIncremental_withWildlyDifferentLengths_shouldPreviewInOrder() {
    let mock = MockTranslator::with_transform(|request| {
        let heading = request.text.lines().next().unwrap_or_default();
        match heading {
            "## 1. DEFINITIONS" => "১".repeat(900),
            "## 2. PAYMENT" => "২".to_string(),
            _ => "৩".repeat(120),
        }
    })
    .with_stream_chunks(64);
    let pipeline = common::splitting_pipeline(&mock, 80);

    let events = common::collect_events(pipeline.translate_incremental(documents::THREE_SPLITTABLE_SECTIONS, "Bengali")).await;

    let expected = format!("{}\n\n২\n\n{}\n", "১".repeat(900), "৩".repeat(120));
    assert_eq!(common::increments_text(&events), expected);
    assert!(matches!(events.last(), Some(PipelineEvent::Completed(outcome)) if outcome.translated_document == expected));
}

#[tokio::test]
async fn test_translateIncremental_withEmptyTarget_shouldFailWithConfiguration() {
    let mock = MockTranslator::identity();
    let pipeline = common::pipeline_with(&mock, PipelineConfig::default());

    let events = common::collect_events(pipeline.translate_incremental(documents::THREE_SHORT_SECTIONS, "")).await;

    assert!(matches!(events.as_slice(), [PipelineEvent::Failed(TranslationError::Configuration(_))]));
    assert_eq!(mock.call_count(), 0);
}

/// Dropping the receiver stops the run before the next segment is requested
#[tokio::test]
async fn test_translateIncremental_whenReceiverDropped_shouldStopRequestingSegments() {
    let mock = MockTranslator::identity()
        .with_stream_chunks(1)
        .with_chunk_delay(Duration::from_millis(20));
    let pipeline = common::splitting_pipeline(&mock, 80);

    let mut events = pipeline.translate_incremental(documents::THREE_SPLITTABLE_SECTIONS, "Hindi");
    while let Some(event) = events.recv().await {
        if matches!(event, PipelineEvent::SegmentStarted { .. }) {
            break;
        }
    }
    drop(events);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_translateIncremental_withSourceLanguage_shouldEchoDocument() {
    let mock = MockTranslator::prefixing("X");
    let pipeline = common::pipeline_with(&mock, PipelineConfig::default());

    let events = common::collect_events(pipeline.translate_incremental(documents::THREE_SHORT_SECTIONS, "English")).await;

    match events.as_slice() {
        [PipelineEvent::Increment(text), PipelineEvent::Completed(outcome)] => {
            assert_eq!(text, documents::THREE_SHORT_SECTIONS);
            assert_eq!(outcome.translated_document, documents::THREE_SHORT_SECTIONS);
        }
        other => panic!("unexpected events: {:?}", other),
    }
    assert_eq!(mock.call_count(), 0);
}
