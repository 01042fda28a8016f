/*!
 * Error types for the fidelis library.
 *
 * Only configuration problems and translation service failures propagate as
 * errors. Structural anomalies found after a successful translation are
 * reported as `FidelityWarning`s inside the validation report instead.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::Timeout(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::RequestFailed(_) | Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }

    /// Map a reqwest transport error onto the provider taxonomy
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }

    /// Map a non-success HTTP status and body onto the provider taxonomy
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Errors that abort a translation pipeline invocation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// No usable translation credentials or settings; never retried
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The external service failed for one segment; the whole document is abandoned
    #[error("Error translating segment {segment}/{total}: {source}")]
    Service {
        /// 1-based position of the failed segment
        segment: usize,
        /// Number of segments in the document body
        total: usize,
        /// Underlying provider failure
        #[source]
        source: ProviderError,
    },

    /// The cover page call failed and the policy forbids keeping the original
    #[error("Error translating cover page: {0}")]
    Cover(#[source] ProviderError),

    /// The caller stopped listening before the translation finished
    #[error("Translation cancelled by caller")]
    Cancelled,
}

impl TranslationError {
    /// The provider failure behind this error, if any
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Service { source, .. } | Self::Cover(source) => Some(source),
            Self::Configuration(_) | Self::Cancelled => None,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
