//! Lifecycle manager binding a backend to the connection registry
//!
//! State machine per managed instance:
//!
//! ```text
//! Stopped --(acquire -> count 1)--> Running --(release -> count 0)--> Stopped
//! ```
//!
//! ## Before/After Sequence
//!
//! ```text
//! before():
//!   1. Take the key's start guard (serializes same-key fixtures)
//!   2. If nobody leases the key: do_start(), propagate failure WITHOUT
//!      acquiring (a failed start must never fool the registry)
//!   3. acquire(key)
//! after():
//!   1. Take the key's start guard
//!   2. release(key)
//!   3. If the count reached 0: do_stop(), log and swallow any error
//! ```
//!
//! do_start runs at most once while any lease is outstanding; do_stop runs
//! exactly once per transition to zero leases.

use crate::registry::ConnectionRegistry;
use seedbed_core::{LifecycleState, SeedbedResult, ServerLifecycle};
use std::sync::Arc;
use tracing::{debug, warn};

/// Drives one backend's start/stop behind the shared reference count
///
/// Each fixture owns its own manager (and backend instance); sharing
/// happens through the registry. Two fixtures with the same connection key
/// share one running server even though each holds its own manager.
pub struct LifecycleManager<L: ServerLifecycle> {
    backend: L,
    registry: Arc<ConnectionRegistry>,
}

impl<L: ServerLifecycle> LifecycleManager<L> {
    /// Create a manager backed by the process-wide registry
    pub fn new(backend: L) -> Self {
        Self::with_registry(backend, ConnectionRegistry::global())
    }

    /// Create a manager with an injected registry
    pub fn with_registry(backend: L, registry: Arc<ConnectionRegistry>) -> Self {
        Self { backend, registry }
    }

    /// The wrapped backend
    pub fn backend(&self) -> &L {
        &self.backend
    }

    /// The wrapped backend, mutably
    pub fn backend_mut(&mut self) -> &mut L {
        &mut self.backend
    }

    /// Lifecycle state derived from the registry
    pub fn state(&self) -> LifecycleState {
        if self.registry.is_leased(&self.backend.connection_key()) {
            LifecycleState::Running
        } else {
            LifecycleState::Stopped
        }
    }

    /// Acquire a lease, starting the instance if this is the first one
    ///
    /// Blocks while another fixture is starting or stopping the same key.
    ///
    /// # Errors
    ///
    /// Propagates the backend's startup error; in that case no lease is
    /// registered and the next fixture retries a fresh start.
    pub fn before(&mut self) -> SeedbedResult<()> {
        let key = self.backend.connection_key();
        let guard = self.registry.start_guard(&key);
        let _serialized = guard.lock();

        if !self.registry.is_leased(&key) {
            debug!(%key, "starting backend instance");
            self.backend.do_start()?;
        }
        let count = self.registry.acquire(&key);
        debug!(%key, count, "lease acquired");
        Ok(())
    }

    /// Release the lease, stopping the instance if it was the last one
    ///
    /// Stop failures are logged and swallowed so lease bookkeeping never
    /// gets stuck.
    pub fn after(&mut self) {
        let key = self.backend.connection_key();
        let guard = self.registry.start_guard(&key);
        let _serialized = guard.lock();

        let remaining = self.registry.release(&key);
        debug!(%key, remaining, "lease released");
        if remaining == 0 {
            if let Err(err) = self.backend.do_stop() {
                warn!(%key, error = %err, "ignoring backend stop failure");
            }
        }
    }
}
