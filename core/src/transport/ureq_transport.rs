//! Default `Transport` backed by a blocking `ureq` agent.
//!
//! # Design
//! Every session owns its own agent so the per-request connect and read
//! timeouts can be set on the agent config. `submit` moves the blocking call
//! onto a dedicated thread and returns at once; the completion callback runs
//! on that thread.
//!
//! Status codes are never turned into errors: a 404 or 500 is a response
//! like any other and reaches the caller as a success with metadata. Response
//! bodies are read without a size limit.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};
use ureq::{Agent, RequestBuilder};

use super::{Session, Submission, Transport, TransportCallback, TransportFailure, TransportOutcome};
use crate::http::{CachePolicy, Headers, HttpMethod, ResponseMetadata};

/// Production transport performing real HTTP over `ureq`.
#[derive(Debug, Clone, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for UreqTransport {
    fn create_session(&self, connect_timeout: Duration, read_timeout: Duration) -> Box<dyn Session> {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(connect_timeout))
            .timeout_recv_response(Some(read_timeout))
            .timeout_recv_body(Some(read_timeout))
            .build()
            .new_agent();
        Box::new(UreqSession { agent })
    }
}

struct UreqSession {
    agent: Agent,
}

type PendingCallback = Arc<Mutex<Option<TransportCallback>>>;

fn take_callback(pending: &PendingCallback) -> Option<TransportCallback> {
    pending.lock().unwrap_or_else(PoisonError::into_inner).take()
}

impl Session for UreqSession {
    fn submit(self: Box<Self>, submission: Submission, on_complete: TransportCallback) {
        let pending: PendingCallback = Arc::new(Mutex::new(Some(on_complete)));
        let worker = Arc::clone(&pending);
        let agent = self.agent;

        let spawned = thread::Builder::new()
            .name("netservice-transport".to_string())
            .spawn(move || {
                let outcome = execute(&agent, submission);
                if let Some(callback) = take_callback(&worker) {
                    callback(outcome);
                }
            });

        if let Err(err) = spawned {
            warn!(error = %err, "could not start transport thread");
            if let Some(callback) = take_callback(&pending) {
                callback(TransportOutcome::failed(TransportFailure::Other(format!(
                    "could not start transport thread: {err}"
                ))));
            }
        }
    }
}

/// Headers actually sent: the submission's headers plus the wire form of the
/// cache policy, unless the caller already chose a `Cache-Control`.
fn wire_headers(submission: &Submission) -> Headers {
    let mut headers = submission.headers.clone();
    match submission.cache_policy {
        CachePolicy::ReloadIgnoringCache => {
            if !headers.contains("Cache-Control") {
                headers.insert("Cache-Control", "no-cache");
                headers.insert("Pragma", "no-cache");
            }
        }
    }
    headers
}

fn apply_headers<B>(mut builder: RequestBuilder<B>, headers: &Headers) -> RequestBuilder<B> {
    for (name, value) in headers.iter() {
        builder = builder.header(name, value);
    }
    builder
}

fn execute(agent: &Agent, submission: Submission) -> TransportOutcome {
    let headers = wire_headers(&submission);
    let url = submission.url.as_str();
    let body = submission.body.as_deref();

    let sent = match submission.method {
        HttpMethod::Get => apply_headers(agent.get(url), &headers).call(),
        HttpMethod::Head => apply_headers(agent.head(url), &headers).call(),
        HttpMethod::Delete => apply_headers(agent.delete(url), &headers).call(),
        HttpMethod::Options => apply_headers(agent.options(url), &headers).call(),
        HttpMethod::Post => send(apply_headers(agent.post(url), &headers), body),
        HttpMethod::Put => send(apply_headers(agent.put(url), &headers), body),
        HttpMethod::Patch => send(apply_headers(agent.patch(url), &headers), body),
    };

    let mut response = match sent {
        Ok(response) => response,
        Err(err) => return TransportOutcome::failed(classify(err)),
    };

    let status = response.status().as_u16();
    let response_headers = collect_headers(response.headers());

    // No size cap: ureq's default 10 MiB limit would fail large responses.
    match response.body_mut().with_config().limit(u64::MAX).read_to_vec() {
        Ok(data) => {
            debug!(url = %submission.url, status, bytes = data.len(), "response received");
            TransportOutcome::received(
                data,
                ResponseMetadata {
                    status,
                    headers: response_headers,
                },
            )
        }
        Err(err) => TransportOutcome::failed(classify(err)),
    }
}

/// Copy response headers, keeping repeated names as separate entries.
fn collect_headers(map: &ureq::http::HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        headers.append(
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    headers
}

fn send(
    builder: RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&[u8]>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}

fn classify(err: ureq::Error) -> TransportFailure {
    match &err {
        ureq::Error::Timeout(_) => TransportFailure::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportFailure::ConnectionFailed(err.to_string())
        }
        ureq::Error::Io(io_err) => match io_err.kind() {
            io::ErrorKind::TimedOut => TransportFailure::Timeout,
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::AddrNotAvailable => TransportFailure::ConnectionFailed(err.to_string()),
            _ => TransportFailure::Other(err.to_string()),
        },
        _ => TransportFailure::Other(err.to_string()),
    }
}
