/*!
 * Mock translator for testing.
 *
 * This module provides a deterministic `Translator` that simulates
 * different behaviors:
 * - `MockTranslator::identity()` - returns the input unchanged
 * - `MockTranslator::prefixing(..)` - marks every output with a prefix
 * - `MockTranslator::dropping_tokens()` - loses every artifact placeholder
 * - `.failing_on_call(n, ..)` - fails the n-th call with a chosen error
 * - `.failing_mid_stream(n, ..)` - breaks every stream after n increments
 * - `.unreachable(..)` - fails the connection check
 *
 * Every request is recorded so tests can assert on call order and content.
 */

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::translation::{TextStream, TranslationRequest, Translator, markup};

/// Output transformation applied by the mock
#[derive(Clone)]
pub enum MockBehavior {
    /// Echo the input
    Identity,
    /// Prepend a fixed marker
    Prefix(String),
    /// Remove every artifact placeholder token
    DropTokens,
    /// Arbitrary transformation
    Custom(Arc<dyn Fn(&TranslationRequest) -> String + Send + Sync>),
}

impl std::fmt::Debug for MockBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => write!(f, "Identity"),
            Self::Prefix(prefix) => write!(f, "Prefix({:?})", prefix),
            Self::DropTokens => write!(f, "DropTokens"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Error a scripted failure produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// HTTP error with the given status
    Status(u16),
    /// Request timeout
    Timeout,
    /// Connection refused
    Connection,
}

impl MockFailure {
    fn to_error(self) -> ProviderError {
        match self {
            Self::Status(status) => ProviderError::from_status(status, "mock failure".to_string()),
            Self::Timeout => ProviderError::Timeout("mock timeout".to_string()),
            Self::Connection => ProviderError::ConnectionError("mock connection refused".to_string()),
        }
    }
}

/// Deterministic translator for tests
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    /// 1-based call numbers that fail, with their error
    failures: Vec<(usize, MockFailure)>,
    /// Fail every call
    always_fail: Option<MockFailure>,
    /// Chars per streamed increment; `None` streams the output in one piece
    stream_chunk_chars: Option<usize>,
    /// Delay before each streamed increment
    chunk_delay: Option<Duration>,
    /// Increments yielded before a stream breaks, with its error
    stream_failure: Option<(usize, MockFailure)>,
    /// Error returned by the connection check
    connection_failure: Option<MockFailure>,
    connection_checks: Arc<AtomicUsize>,
    call_count: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<TranslationRequest>>>,
}

impl MockTranslator {
    /// Create a mock with the given behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            failures: Vec::new(),
            always_fail: None,
            stream_chunk_chars: None,
            chunk_delay: None,
            stream_failure: None,
            connection_failure: None,
            connection_checks: Arc::new(AtomicUsize::new(0)),
            call_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock that returns its input unchanged
    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    /// Mock that prepends a marker to every output
    pub fn prefixing(prefix: impl Into<String>) -> Self {
        Self::new(MockBehavior::Prefix(prefix.into()))
    }

    /// Mock that drops every artifact placeholder token
    pub fn dropping_tokens() -> Self {
        Self::new(MockBehavior::DropTokens)
    }

    /// Mock with a custom transformation
    pub fn with_transform<F>(transform: F) -> Self
    where
        F: Fn(&TranslationRequest) -> String + Send + Sync + 'static,
    {
        Self::new(MockBehavior::Custom(Arc::new(transform)))
    }

    /// Fail the n-th call (1-based)
    pub fn failing_on_call(mut self, call: usize, failure: MockFailure) -> Self {
        self.failures.push((call, failure));
        self
    }

    /// Fail every call
    pub fn always_failing(mut self, failure: MockFailure) -> Self {
        self.always_fail = Some(failure);
        self
    }

    /// Stream outputs in increments of at most `chars` chars
    pub fn with_stream_chunks(mut self, chars: usize) -> Self {
        self.stream_chunk_chars = Some(chars.max(1));
        self
    }

    /// Wait before yielding each streamed increment
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    /// Break every stream after `increments` increments
    pub fn failing_mid_stream(mut self, increments: usize, failure: MockFailure) -> Self {
        self.stream_failure = Some((increments, failure));
        self
    }

    /// Fail the connection check
    pub fn unreachable(mut self, failure: MockFailure) -> Self {
        self.connection_failure = Some(failure);
        self
    }

    /// Number of connection checks made so far
    pub fn connection_checks(&self) -> usize {
        self.connection_checks.load(Ordering::SeqCst)
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every request received, in order
    pub fn calls(&self) -> Vec<TranslationRequest> {
        self.calls.lock().clone()
    }

    /// Texts of every request received, in order
    pub fn call_texts(&self) -> Vec<String> {
        self.calls.lock().iter().map(|request| request.text.clone()).collect()
    }

    fn record(&self, request: &TranslationRequest) -> Result<(), ProviderError> {
        self.calls.lock().push(request.clone());
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(failure) = self.always_fail {
            return Err(failure.to_error());
        }
        match self.failures.iter().find(|(n, _)| *n == call) {
            Some((_, failure)) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn output_for(&self, request: &TranslationRequest) -> String {
        match &self.behavior {
            MockBehavior::Identity => request.text.clone(),
            MockBehavior::Prefix(prefix) => format!("{}{}", prefix, request.text),
            MockBehavior::DropTokens => {
                let mut text = request.text.clone();
                for span in markup::token_spans(&request.text).into_iter().rev() {
                    text.replace_range(span, "");
                }
                text
            }
            MockBehavior::Custom(transform) => transform(request),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        self.record(request)?;
        Ok(self.output_for(request))
    }

    async fn translate_stream(&self, request: &TranslationRequest) -> Result<TextStream, ProviderError> {
        self.record(request)?;
        let output = self.output_for(request);

        let pieces: Vec<String> = match self.stream_chunk_chars {
            Some(size) => {
                let chars: Vec<char> = output.chars().collect();
                chars.chunks(size).map(|chunk| chunk.iter().collect()).collect()
            }
            None => vec![output],
        };

        let mut items: Vec<Result<String, ProviderError>> = pieces.into_iter().map(Ok).collect();
        if let Some((increments, failure)) = self.stream_failure {
            items.truncate(increments);
            items.push(Err(failure.to_error()));
        }

        let delay = self.chunk_delay;
        Ok(stream::iter(items)
            .then(move |item| async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                item
            })
            .boxed())
    }

    async fn check_connection(&self) -> Result<(), ProviderError> {
        self.connection_checks.fetch_add(1, Ordering::SeqCst);
        match self.connection_failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}
