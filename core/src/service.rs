//! The default dispatcher for outbound requests.
//!
//! # Design
//! `NetworkService` runs every call through the same three steps:
//!
//! 1. validate the URL; invalid URLs fail with `InvalidUrl` and go no
//!    further,
//! 2. offer the parsed URL to the active performer, if one is registered;
//!    a performer that claims the request receives it untouched together
//!    with the completion handler, and the service is done,
//! 3. otherwise open a session on the transport with the request's
//!    timeouts and submit it with default headers merged in and a fresh
//!    fetch forced.
//!
//! `connect_async` never blocks: the handler runs later, on whatever thread
//! the transport (or performer) completes on. The transport is a type
//! parameter; the performer is looked up per call because it can change at
//! any time.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::DispatcherConfig;
use crate::error::ConnectionError;
use crate::http::{CachePolicy, Headers};
use crate::overrider::OverrideRegistry;
use crate::request::NetworkRequest;
use crate::result::{CompletionHandler, ConnectionResult};
use crate::transport::{Submission, Transport};
use crate::validate::validate_url;

/// Asynchronous HTTP dispatcher with runtime override support.
pub struct NetworkService<T: Transport> {
    transport: T,
    registry: Arc<OverrideRegistry>,
    config: DispatcherConfig,
    default_headers: Headers,
}

impl<T: Transport> NetworkService<T> {
    pub fn new(transport: T, registry: Arc<OverrideRegistry>) -> Self {
        Self::with_config(transport, registry, DispatcherConfig::default())
    }

    pub fn with_config(transport: T, registry: Arc<OverrideRegistry>, config: DispatcherConfig) -> Self {
        let default_headers = config.default_headers();
        Self {
            transport,
            registry,
            config,
            default_headers,
        }
    }

    pub fn registry(&self) -> &Arc<OverrideRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Start `request` and return immediately. `completion`, when given, is
    /// invoked exactly once with the result; without it the result is
    /// dropped.
    pub fn connect_async(&self, request: NetworkRequest, completion: Option<CompletionHandler>) {
        let request_id = Uuid::new_v4();

        let url = match validate_url(request.url(), self.config.secure_only) {
            Ok(url) => url,
            Err(reason) => {
                warn!(%request_id, url = request.url(), %reason, "rejecting request with invalid URL");
                let err = ConnectionError::InvalidUrl {
                    url: request.url().to_string(),
                    reason,
                };
                complete(completion, ConnectionResult::Failure(err));
                return;
            }
        };

        if let Some(performer) = self.registry.active() {
            if performer.should_override(&url) {
                debug!(%request_id, %url, "request delegated to override performer");
                performer.connect_async(request, completion);
                return;
            }
        }

        let submission = Submission {
            method: request.method(),
            headers: request.headers().merged_with_defaults(&self.default_headers),
            body: if request.method().allows_body() {
                request.body().map(<[u8]>::to_vec)
            } else {
                None
            },
            cache_policy: CachePolicy::ReloadIgnoringCache,
            url,
        };
        debug!(
            %request_id,
            url = %submission.url,
            method = %submission.method,
            "submitting request to transport"
        );

        let session = self
            .transport
            .create_session(request.connect_timeout(), request.read_timeout());
        session.submit(
            submission,
            Box::new(move |outcome| {
                let result = ConnectionResult::from(outcome);
                match &result {
                    ConnectionResult::Success { data, response } => debug!(
                        %request_id,
                        status = response.as_ref().map(|r| r.status),
                        bytes = data.len(),
                        "request completed"
                    ),
                    ConnectionResult::Failure(err) => {
                        warn!(%request_id, error = %err, "request failed")
                    }
                }
                complete(completion, result);
            }),
        );
    }

    /// Awaitable form of `connect_async`. The call starts immediately; the
    /// returned future resolves with its result.
    pub fn connect(&self, request: NetworkRequest) -> impl Future<Output = ConnectionResult> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.connect_async(
            request,
            Some(Box::new(move |result| {
                // The receiver may already be gone if the caller dropped the future.
                let _ = tx.send(result);
            })),
        );
        async move {
            rx.await.unwrap_or_else(|_| {
                ConnectionResult::Failure(ConnectionError::Transport(
                    "completion handler dropped without a result".to_string(),
                ))
            })
        }
    }
}

fn complete(completion: Option<CompletionHandler>, result: ConnectionResult) {
    if let Some(handler) = completion {
        handler(result);
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for NetworkService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkService")
            .field("transport", &self.transport)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
