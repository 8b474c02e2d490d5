//! Runtime interception of outbound requests.
//!
//! # Design
//! A `Performer` can claim any request whose URL it recognizes and run it
//! through its own execution path. The `OverrideRegistry` holds at most one
//! active performer. It is an ordinary value shared through an `Arc` with
//! every `NetworkService` that should honour it, so tests and embedders each
//! get their own independent registry.
//!
//! The slot is an `RwLock<Option<Arc<dyn Performer>>>`: requests only take a
//! read lock long enough to clone the `Arc`, then call the performer with no
//! lock held. Replacing the performer therefore never affects calls already
//! delegated to the previous one.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;
use url::Url;

use crate::request::NetworkRequest;
use crate::result::CompletionHandler;

/// Caller-supplied interceptor for outbound requests.
pub trait Performer: Send + Sync {
    /// Whether this performer takes over the request for `url`. Only ever
    /// called with URLs that passed validation.
    fn should_override(&self, url: &Url) -> bool;

    /// Execute `request` in place of the default transport. The performer
    /// owns the call from here on, including invoking `completion` exactly
    /// once when one is given.
    fn connect_async(&self, request: NetworkRequest, completion: Option<CompletionHandler>);
}

/// Holds the single active `Performer`, if any.
#[derive(Default)]
pub struct OverrideRegistry {
    active: RwLock<Option<Arc<dyn Performer>>>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `performer` the active one, replacing any previous performer.
    pub fn enable_override(&self, performer: Arc<dyn Performer>) {
        let mut slot = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = slot.replace(performer).is_some();
        info!(replaced, "network override enabled");
    }

    /// Clear the active performer.
    pub fn reset(&self) {
        let mut slot = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let cleared = slot.take().is_some();
        info!(cleared, "network override reset");
    }

    /// Snapshot of the active performer.
    pub fn active(&self) -> Option<Arc<dyn Performer>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_active(&self) -> bool {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl std::fmt::Debug for OverrideRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideRegistry")
            .field("active", &self.is_active())
            .finish()
    }
}
