//! Error types for the chat bot factories.
//!
//! Every failure of a `build` call surfaces as a [`ChatBotError`]. Callers that
//! only care about the broad category can match on [`ChatBotError::kind`].

use std::fmt;
use thiserror::Error;

use crate::config::RetryConfig;

/// The main error type for chat bot operations.
#[derive(Debug, Error)]
pub enum ChatBotError {
    /// The HTTP call could not be completed (connection, timeout, body read).
    #[error("Network error for {url}: {message}")]
    Network {
        /// The requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },

    /// The remote service answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// The response status code.
        status: u16,
    },

    /// The remote service returned nothing to build a bot from.
    #[error("No results: {0}")]
    EmptyResult(String),

    /// The response did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid configuration or injected collaborator.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport or HTTP status failure.
    Network,
    /// Zero results or zero candidates.
    EmptyResult,
    /// Missing keys or wrong types in a response.
    MalformedResponse,
    /// Bad configuration, including local IO while loading it.
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Network => "network",
            Self::EmptyResult => "empty_result",
            Self::MalformedResponse => "malformed_response",
            Self::Configuration => "configuration",
        };
        write!(f, "{s}")
    }
}

impl ChatBotError {
    /// Creates a network error.
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates an empty-result error.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::EmptyResult(message.into())
    }

    /// Creates a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::HttpStatus { .. } => ErrorKind::Network,
            Self::EmptyResult(_) => ErrorKind::EmptyResult,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Configuration(_) | Self::Io(_) => ErrorKind::Configuration,
        }
    }

    /// Whether retrying the same request could succeed.
    ///
    /// Transport failures always qualify. Status failures qualify when the
    /// retry configuration lists the status.
    #[must_use]
    pub fn is_retryable(&self, retry: &RetryConfig) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::HttpStatus { status, .. } => retry.should_retry_status(*status),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ChatBotError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(ToString::to_string).unwrap_or_default();
        match err.status() {
            Some(status) => Self::HttpStatus {
                url,
                status: status.as_u16(),
            },
            None if err.is_decode() => Self::MalformedResponse(format!("{url}: {err}")),
            None => Self::Network {
                url,
                message: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for ChatBotError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ChatBotError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ChatBotError::network("u", "refused").kind(), ErrorKind::Network);
        assert_eq!(
            ChatBotError::HttpStatus { url: "u".into(), status: 404 }.kind(),
            ErrorKind::Network
        );
        assert_eq!(ChatBotError::empty("none").kind(), ErrorKind::EmptyResult);
        assert_eq!(ChatBotError::malformed("x").kind(), ErrorKind::MalformedResponse);
        assert_eq!(ChatBotError::configuration("x").kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_retryable() {
        let retry = RetryConfig {
            retry_status_codes: [503].into_iter().collect::<HashSet<u16>>(),
            ..RetryConfig::default()
        };
        assert!(ChatBotError::network("u", "reset").is_retryable(&retry));
        assert!(ChatBotError::HttpStatus { url: "u".into(), status: 503 }.is_retryable(&retry));
        assert!(!ChatBotError::HttpStatus { url: "u".into(), status: 500 }.is_retryable(&retry));
        assert!(!ChatBotError::empty("none").is_retryable(&retry));
    }

    #[test]
    fn test_display() {
        let err = ChatBotError::HttpStatus {
            url: "https://example.org/search".into(),
            status: 502,
        };
        assert_eq!(err.to_string(), "HTTP 502 from https://example.org/search");
        assert_eq!(ErrorKind::EmptyResult.to_string(), "empty_result");
    }

    #[test]
    fn test_from_serde_json() {
        let err: ChatBotError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }
}
