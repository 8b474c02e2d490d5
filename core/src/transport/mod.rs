//! The seam between the dispatcher and whatever performs network I/O.
//!
//! # Design
//! A `Transport` is a factory: for every call the dispatcher asks it for a
//! fresh `Session` configured with that request's timeouts, then submits a
//! fully prepared `Submission`. The session reports back once through a
//! `TransportCallback`, on whatever thread it likes. Timeouts are enforced
//! here, not by the dispatcher.
//!
//! `UreqTransport` is the default implementation; tests plug in recording
//! doubles.

pub mod ureq_transport;

use std::time::Duration;

use url::Url;

use crate::http::{CachePolicy, Headers, HttpMethod, ResponseMetadata};

pub use ureq_transport::UreqTransport;

/// Raw completion callback handed to a session.
pub type TransportCallback = Box<dyn FnOnce(TransportOutcome) + Send + 'static>;

/// Creates sessions for individual calls.
pub trait Transport: Send + Sync {
    fn create_session(&self, connect_timeout: Duration, read_timeout: Duration) -> Box<dyn Session>;
}

/// A single-use handle that executes one submission.
pub trait Session: Send {
    /// Start the call and return without waiting for it. `on_complete` must
    /// be invoked at most once.
    fn submit(self: Box<Self>, submission: Submission, on_complete: TransportCallback);
}

/// Everything a session needs to put one request on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
    pub cache_policy: CachePolicy,
}

/// What a session observed, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOutcome {
    pub data: Option<Vec<u8>>,
    pub response: Option<ResponseMetadata>,
    pub error: Option<TransportFailure>,
}

impl TransportOutcome {
    pub fn received(data: Vec<u8>, response: ResponseMetadata) -> Self {
        Self {
            data: Some(data),
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(error: TransportFailure) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

/// Transport-level failure categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    ConnectionFailed(String),
    Other(String),
}
