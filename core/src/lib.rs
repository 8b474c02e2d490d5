//! Asynchronous HTTP dispatch core with runtime request interception.
//!
//! # Overview
//! `NetworkService` validates a `NetworkRequest`, runs it through a
//! `Transport`, and reports one normalized `ConnectionResult` to the caller's
//! completion handler. A `Performer` registered in an `OverrideRegistry` can
//! claim requests by URL and execute them itself instead.
//!
//! # Design
//! - Results are a tagged union: success payload or `ConnectionError`,
//!   never both. Errors only travel through the completion handler.
//! - The registry is an explicit `Arc<OverrideRegistry>` handed to each
//!   service, not a process global.
//! - Network I/O lives behind `Transport`/`Session`; `UreqTransport` is the
//!   default, tests substitute recording doubles.
//! - Overridden requests are passed to the performer exactly as built; the
//!   default headers only apply to the transport path.

pub mod config;
pub mod error;
pub mod http;
pub mod overrider;
pub mod request;
pub mod result;
pub mod service;
pub mod transport;
pub mod validate;

pub use config::DispatcherConfig;
pub use error::{ConfigError, ConnectionError, UrlError};
pub use http::{CachePolicy, Headers, HttpMethod, ResponseMetadata};
pub use overrider::{OverrideRegistry, Performer};
pub use request::{NetworkRequest, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT};
pub use result::{CompletionHandler, ConnectionResult};
pub use service::NetworkService;
pub use transport::{
    Session, Submission, Transport, TransportCallback, TransportFailure, TransportOutcome,
    UreqTransport,
};
pub use validate::validate_url;
