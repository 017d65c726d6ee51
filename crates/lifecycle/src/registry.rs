//! Reference-counted registry of shared server leases
//!
//! Many independent fixtures may point at the same (host, port). The
//! registry counts outstanding leases per key so the lifecycle manager can
//! start an instance exactly once and stop it exactly when nobody needs it.
//!
//! Uses parking_lot::Mutex instead of std::sync::Mutex to avoid cascading
//! panics from mutex poisoning when a test thread dies mid-assertion.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use seedbed_core::ConnectionKey;
use std::collections::HashMap;
use std::sync::Arc;

/// Process-wide registry shared by fixtures that do not inject their own
static GLOBAL_REGISTRY: Lazy<Arc<ConnectionRegistry>> =
    Lazy::new(|| Arc::new(ConnectionRegistry::new()));

/// Table of active (host, port) leases with counts
///
/// Invariant: a key is present in the count map iff its count > 0; absence
/// means "not leased by anyone". All count operations are atomic with
/// respect to each other, because parallel test runners share one registry.
pub struct ConnectionRegistry {
    /// Lease counts, guarded by a single mutex
    counts: Mutex<HashMap<ConnectionKey, usize>>,
    /// Per-key serialization locks for start/stop sections
    start_guards: DashMap<ConnectionKey, Arc<Mutex<()>>>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            start_guards: DashMap::new(),
        }
    }

    /// The process-wide shared registry
    ///
    /// Fixtures created without an explicit registry share this instance,
    /// which is what makes cross-fixture server sharing work by default.
    /// Prefer injecting an `Arc<ConnectionRegistry>` where the test layout
    /// allows it.
    pub fn global() -> Arc<ConnectionRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Increment the lease count for `key`, creating the entry at 1
    ///
    /// Returns the new count.
    pub fn acquire(&self, key: &ConnectionKey) -> usize {
        let mut counts = self.counts.lock();
        let count = counts.entry(key.clone()).or_insert(0);
        *count += 1;
        *count
    }

    /// Decrement the lease count for `key`
    ///
    /// Removes the entry when the count reaches zero and returns 0.
    /// Releasing an absent key is a no-op returning 0.
    pub fn release(&self, key: &ConnectionKey) -> usize {
        let mut counts = self.counts.lock();
        match counts.get_mut(key) {
            Some(count) if *count > 1 => {
                *count -= 1;
                *count
            }
            Some(_) => {
                counts.remove(key);
                0
            }
            None => 0,
        }
    }

    /// Whether any fixture currently leases `key`
    pub fn is_leased(&self, key: &ConnectionKey) -> bool {
        self.counts.lock().contains_key(key)
    }

    /// Current lease count for `key` (0 when absent)
    pub fn lease_count(&self, key: &ConnectionKey) -> usize {
        self.counts.lock().get(key).copied().unwrap_or(0)
    }

    /// The per-key lock serializing start/stop sections for `key`
    ///
    /// Concurrent `before()` calls for the same key must hold this lock so
    /// only one of them observes "not leased" and performs the actual
    /// start. Unrelated keys proceed in parallel.
    pub fn start_guard(&self, key: &ConnectionKey) -> Arc<Mutex<()>> {
        self.start_guards
            .entry(key.clone())
            .or_default()
            .clone()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
