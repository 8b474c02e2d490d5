//! Error types for the network dispatcher.
//!
//! # Design
//! `ConnectionError` is the only error a caller ever observes, and only as
//! the `Failure` variant of a `ConnectionResult`. It is never returned from
//! `connect_async` directly. `UrlError` explains why validation rejected a
//! URL, and `ConfigError` covers loading a `DispatcherConfig`.

use thiserror::Error;

/// Failure delivered to a completion handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// The URL failed validation; no network call was attempted.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: UrlError },

    /// The transport could not establish a connection.
    #[error("Could not connect to the server.")]
    ConnectionFailed(String),

    /// The connect or read timeout elapsed before completion.
    #[error("The request timed out.")]
    Timeout,

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Why a request URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("malformed URL: {0}")]
    Malformed(String),

    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("missing host")]
    MissingHost,

    #[error("insecure scheme 'http' while secure-only mode is enabled")]
    InsecureScheme,
}

/// Errors raised while loading a `DispatcherConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidEnv { name: &'static str, value: String },

    #[error("config document could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable() {
        assert_eq!(
            ConnectionError::ConnectionFailed("refused".to_string()).to_string(),
            "Could not connect to the server."
        );
        assert_eq!(ConnectionError::Timeout.to_string(), "The request timed out.");
    }

    #[test]
    fn invalid_url_message_names_url_and_reason() {
        let err = ConnectionError::InvalidUrl {
            url: "ftp://example.com".to_string(),
            reason: UrlError::UnsupportedScheme("ftp".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "invalid URL 'ftp://example.com': unsupported scheme 'ftp'"
        );
    }
}
