//! Contracts between the harness core and backend adapters
//!
//! Two trait seams connect the backend-agnostic core to a concrete store:
//! [`DatabaseOperation`] (dataset application and comparison) and
//! [`ServerLifecycle`] (starting and stopping the backing instance). Each
//! backend supplies concrete implementations selected at test-setup time;
//! the core only ever calls through these interfaces.

use crate::error::SeedbedResult;
use crate::types::ConnectionKey;

/// Dataset application and comparison capability of one backend
///
/// Consumed by the load executor (before the test) and the orchestrator's
/// expected-dataset assertion (after the test). Dataset bytes are passed
/// through opaque; the adapter owns parsing into its native representation.
///
/// Thread safety: an instance may be shared between a fixture's before and
/// after hooks running on different test threads (requires Send + Sync),
/// but the harness never invokes one instance concurrently.
pub trait DatabaseOperation: Send + Sync {
    /// Backend-native connection handle exposed to test bodies
    type Connection;

    /// Insert every element of the dataset
    ///
    /// # Errors
    ///
    /// Returns a backend or dataset error if the content cannot be parsed
    /// or applied.
    fn insert(&self, dataset: &[u8]) -> SeedbedResult<()>;

    /// Remove all data owned by this fixture's store
    ///
    /// # Errors
    ///
    /// Returns a backend error if the store rejects the operation.
    fn delete_all(&self) -> SeedbedResult<()>;

    /// Insert only the elements not already present
    ///
    /// What counts as "present" is backend-defined (identity key when the
    /// format has one, deep equality otherwise).
    ///
    /// # Errors
    ///
    /// Returns a backend or dataset error if the content cannot be parsed
    /// or applied.
    fn insert_not_present(&self, dataset: &[u8]) -> SeedbedResult<()>;

    /// Assert the store matches the expected dataset
    ///
    /// Properties named in `ignored_properties` (dot-separated paths from
    /// each element root) are excluded from the comparison on both sides.
    ///
    /// # Errors
    ///
    /// A mismatch is reported as [`crate::SeedbedError::Assertion`], a kind
    /// callers must route to the test result rather than treat as a
    /// harness failure. Parse and store errors use their own kinds.
    fn database_is(&self, expected: &[u8], ignored_properties: &[String]) -> SeedbedResult<()>;

    /// Backend-native connection handle for direct use in test bodies
    fn connection(&self) -> &Self::Connection;
}

/// Start/stop capability of one backend instance
///
/// Implemented by both managed variants (external OS process) and embedded
/// variants (in-process engine). The lifecycle manager drives this contract
/// behind the connection registry's reference count.
pub trait ServerLifecycle: Send {
    /// Host the instance listens on
    fn host(&self) -> &str;

    /// Port the instance listens on
    fn port(&self) -> u16;

    /// Start the instance and wait until it is usable
    ///
    /// # Errors
    ///
    /// Startup errors are fatal: the caller must not register a lease, so
    /// a later fixture retries a fresh start instead of assuming success.
    fn do_start(&mut self) -> SeedbedResult<()>;

    /// Stop the instance, best effort
    ///
    /// # Errors
    ///
    /// Stop errors are logged and swallowed by the lifecycle manager; they
    /// never block lease bookkeeping.
    fn do_stop(&mut self) -> SeedbedResult<()>;

    /// The registry key identifying this instance
    fn connection_key(&self) -> ConnectionKey {
        ConnectionKey::new(self.host(), self.port())
    }
}
