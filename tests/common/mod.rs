/*!
 * Common test utilities for the fidelis test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Result;
use tempfile::TempDir;
use tokio::sync::mpsc;

use fidelis::providers::mock::MockTranslator;
use fidelis::translation::{PipelineConfig, PipelineEvent, TranslationPipeline};

// Sample legal documents
pub mod documents;

/// Route library logs to the test output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Pipeline around a mock; the mock keeps recording calls through its clone
pub fn pipeline_with(mock: &MockTranslator, config: PipelineConfig) -> TranslationPipeline {
    TranslationPipeline::new(Arc::new(mock.clone()), config)
}

/// Pipeline that splits every body with the given segment limit
pub fn splitting_pipeline(mock: &MockTranslator, max_segment_size: usize) -> TranslationPipeline {
    pipeline_with(
        mock,
        PipelineConfig::default()
            .with_max_segment_size(max_segment_size)
            .with_single_call_threshold(0),
    )
}

/// Drain an event stream until it closes
pub async fn collect_events(mut events: mpsc::Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
    let mut collected = Vec::new();
    while let Some(event) = events.recv().await {
        collected.push(event);
    }
    collected
}

/// Concatenation of every increment in an event list
pub fn increments_text(events: &[PipelineEvent]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::Increment(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}
