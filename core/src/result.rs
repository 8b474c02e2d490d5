//! The normalized outcome of a call.
//!
//! # Design
//! Transports report back in a loose shape (`TransportOutcome`: optional
//! bytes, optional metadata, optional failure). The dispatcher folds that
//! into `ConnectionResult`, which is either a success payload or an error and
//! never both. The folding rules:
//!
//! - any transport failure wins, and its data/metadata are dropped;
//! - otherwise, data or metadata present means success (missing data
//!   becomes an empty body);
//! - an outcome with nothing in it is a `Transport` error.

use crate::error::ConnectionError;
use crate::http::ResponseMetadata;
use crate::transport::{TransportFailure, TransportOutcome};

/// Callback that receives the result of one call, exactly once.
pub type CompletionHandler = Box<dyn FnOnce(ConnectionResult) + Send + 'static>;

/// Outcome delivered to a completion handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionResult {
    Success {
        data: Vec<u8>,
        response: Option<ResponseMetadata>,
    },
    Failure(ConnectionError),
}

impl ConnectionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ConnectionResult::Success { .. })
    }

    pub fn data(&self) -> Option<&[u8]> {
        match self {
            ConnectionResult::Success { data, .. } => Some(data),
            ConnectionResult::Failure(_) => None,
        }
    }

    pub fn response(&self) -> Option<&ResponseMetadata> {
        match self {
            ConnectionResult::Success { response, .. } => response.as_ref(),
            ConnectionResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ConnectionError> {
        match self {
            ConnectionResult::Success { .. } => None,
            ConnectionResult::Failure(err) => Some(err),
        }
    }
}

impl From<ConnectionError> for ConnectionResult {
    fn from(err: ConnectionError) -> Self {
        ConnectionResult::Failure(err)
    }
}

impl From<TransportFailure> for ConnectionError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Timeout => ConnectionError::Timeout,
            TransportFailure::ConnectionFailed(msg) => ConnectionError::ConnectionFailed(msg),
            TransportFailure::Other(msg) => ConnectionError::Transport(msg),
        }
    }
}

impl From<TransportOutcome> for ConnectionResult {
    fn from(outcome: TransportOutcome) -> Self {
        if let Some(failure) = outcome.error {
            return ConnectionResult::Failure(failure.into());
        }
        match (outcome.data, outcome.response) {
            (None, None) => ConnectionResult::Failure(ConnectionError::Transport(
                "transport completed without data or a response".to_string(),
            )),
            (data, response) => ConnectionResult::Success {
                data: data.unwrap_or_default(),
                response,
            },
        }
    }
}
