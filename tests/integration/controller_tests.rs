/*!
 * Tests for file based translation jobs
 */

use std::fs;
use std::path::Path;
use std::sync::Arc;

use fidelis::app_config::Config;
use fidelis::app_controller::{Controller, TranslateJob};
use fidelis::providers::mock::{MockFailure, MockTranslator};

use crate::common::{self, documents};

fn job(input_file: &Path, stream: bool) -> TranslateJob {
    TranslateJob {
        input_file: input_file.to_path_buf(),
        output_file: None,
        target_language: "Hindi".to_string(),
        force_overwrite: false,
        stream,
    }
}

#[tokio::test]
async fn test_run_withMockTranslator_shouldWriteOutputNextToInput() {
    common::init_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "agreement.md", &documents::service_agreement()).unwrap();

    let mock = MockTranslator::identity();
    let controller = Controller::with_translator(Config::default(), Arc::new(mock.clone()));

    let outcome = controller.run(&job(&input, false)).await.unwrap().unwrap();

    let output = temp_dir.path().join("agreement.hindi.md");
    assert_eq!(fs::read_to_string(&output).unwrap(), outcome.translated_document);
    assert_eq!(outcome.translated_document, documents::service_agreement());
    assert_eq!(mock.call_count(), 2);
    assert_eq!(mock.connection_checks(), 1);
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "terms.md", documents::THREE_SHORT_SECTIONS).unwrap();
    common::create_test_file(temp_dir.path(), "terms.hindi.md", "old translation").unwrap();

    let mock = MockTranslator::prefixing("[T]");
    let controller = Controller::with_translator(Config::default(), Arc::new(mock.clone()));

    assert!(controller.run(&job(&input, false)).await.unwrap().is_none());
    assert_eq!(mock.call_count(), 0);

    let mut forced = job(&input, false);
    forced.force_overwrite = true;
    assert!(controller.run(&forced).await.unwrap().is_some());
    assert!(fs::read_to_string(temp_dir.path().join("terms.hindi.md")).unwrap().starts_with("[T]## 1."));
}

#[tokio::test]
async fn test_run_withStreaming_shouldWriteSameDocumentAsBlocking() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "agreement.md", &documents::service_agreement()).unwrap();

    let mock = MockTranslator::dropping_tokens().with_stream_chunks(16);
    let controller = Controller::with_translator(Config::default(), Arc::new(mock));

    let mut streaming = job(&input, true);
    streaming.output_file = Some(temp_dir.path().join("streamed.md"));
    let streamed = controller.run(&streaming).await.unwrap().unwrap();

    let mut blocking = job(&input, false);
    blocking.output_file = Some(temp_dir.path().join("blocking.md"));
    let blocked = controller.run(&blocking).await.unwrap().unwrap();

    assert_eq!(streamed.translated_document, blocked.translated_document);
    assert_eq!(streamed.stats.artifacts_restored_anchor, 2);
    assert!(streamed.report.is_clean());
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = Controller::with_translator(Config::default(), Arc::new(MockTranslator::identity()));

    assert!(controller.run(&job(&temp_dir.path().join("missing.md"), false)).await.is_err());
}

#[tokio::test]
async fn test_run_withFailingProvider_shouldNotWriteOutput() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "terms.md", documents::THREE_SHORT_SECTIONS).unwrap();
    let mock = MockTranslator::identity().always_failing(MockFailure::Status(500));
    let controller = Controller::with_translator(Config::default(), Arc::new(mock));

    for stream in [false, true] {
        assert!(controller.run(&job(&input, stream)).await.is_err());
    }
    assert!(!temp_dir.path().join("terms.hindi.md").exists());
}

#[tokio::test]
async fn test_run_withUnreachableProvider_shouldFailBeforeTranslating() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "terms.md", documents::THREE_SHORT_SECTIONS).unwrap();
    let mock = MockTranslator::identity().unreachable(MockFailure::Connection);
    let controller = Controller::with_translator(Config::default(), Arc::new(mock.clone()));

    let error = controller.run(&job(&input, false)).await.unwrap_err();

    assert!(error.to_string().contains("not reachable"));
    assert_eq!(mock.connection_checks(), 1);
    assert_eq!(mock.call_count(), 0);
    assert!(!temp_dir.path().join("terms.hindi.md").exists());
}
