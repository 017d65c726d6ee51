//! In-memory reference backend
//!
//! A complete, embedded implementation of the backend contracts, used by
//! the integration suites and as the template new adapters copy from. The
//! "store" is a [`DataSet`] behind a lock; the "server" is an in-process
//! engine whose start and stop are state flips.

use parking_lot::RwLock;
use seedbed_compare::DatasetComparator;
use seedbed_core::{
    DataSet, DatabaseOperation, LifecycleState, SeedbedResult, ServerLifecycle,
};
use serde_json::Value;
use std::sync::Arc;

/// Shared handle to the in-memory store
pub type MemoryConnection = Arc<RwLock<DataSet>>;

/// Dataset operations against an in-memory store
#[derive(Debug)]
pub struct MemoryOperation {
    store: MemoryConnection,
    key_property: Option<String>,
}

impl MemoryOperation {
    /// Operation over a fresh empty store
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(DataSet::new())),
            key_property: None,
        }
    }

    /// Operation over an existing store handle
    ///
    /// Lets several fixtures share one store the way they would share one
    /// server.
    pub fn with_connection(store: MemoryConnection) -> Self {
        Self {
            store,
            key_property: None,
        }
    }

    /// Match and deduplicate elements by this property
    pub fn with_key_property(mut self, property: impl Into<String>) -> Self {
        self.key_property = Some(property.into());
        self
    }

    /// Copy of the current store contents
    pub fn snapshot(&self) -> DataSet {
        self.store.read().clone()
    }

    /// Whether `element` already exists in `group`
    fn is_present(&self, stored: &DataSet, group: &str, element: &Value) -> bool {
        let existing = stored.elements(group);
        if let Some(key_property) = &self.key_property {
            if let Some(key) = element.get(key_property) {
                return existing
                    .iter()
                    .any(|candidate| candidate.get(key_property) == Some(key));
            }
        }
        existing.contains(element)
    }
}

impl Default for MemoryOperation {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseOperation for MemoryOperation {
    type Connection = MemoryConnection;

    fn insert(&self, dataset: &[u8]) -> SeedbedResult<()> {
        let parsed = DataSet::parse(dataset)?;
        self.store.write().merge(parsed);
        Ok(())
    }

    fn delete_all(&self) -> SeedbedResult<()> {
        self.store.write().clear();
        Ok(())
    }

    fn insert_not_present(&self, dataset: &[u8]) -> SeedbedResult<()> {
        let parsed = DataSet::parse(dataset)?;
        let mut stored = self.store.write();
        for (group, elements) in parsed.iter() {
            for element in elements {
                if !self.is_present(&stored, group, element) {
                    stored.push_element(group.clone(), element.clone());
                }
            }
        }
        Ok(())
    }

    fn database_is(&self, expected: &[u8], ignored_properties: &[String]) -> SeedbedResult<()> {
        let expected = DataSet::parse(expected)?;
        let mut comparator =
            DatasetComparator::new().ignoring(ignored_properties.iter().cloned());
        if let Some(key_property) = &self.key_property {
            comparator = comparator.with_key_property(key_property.clone());
        }
        comparator.compare(&expected, &self.store.read())?;
        Ok(())
    }

    fn connection(&self) -> &Self::Connection {
        &self.store
    }
}

/// Embedded "server" for the in-memory backend
///
/// Start and stop are in-process state flips, but the instance still runs
/// through the full lifecycle contract so suites exercise the same
/// sharing semantics as a managed server.
pub struct EmbeddedMemoryServer {
    host: String,
    port: u16,
    state: LifecycleState,
}

impl EmbeddedMemoryServer {
    /// Embedded instance addressed as `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            state: LifecycleState::Stopped,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }
}

impl ServerLifecycle for EmbeddedMemoryServer {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn do_start(&mut self) -> SeedbedResult<()> {
        self.state = LifecycleState::Running;
        Ok(())
    }

    fn do_stop(&mut self) -> SeedbedResult<()> {
        self.state = LifecycleState::Stopped;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedbed_core::SeedbedError;

    #[test]
    fn test_insert_then_database_is_round_trip() {
        let op = MemoryOperation::new();
        let data = br#"{"book": [{"id": 1, "title": "Dune"}]}"#;
        op.insert(data).unwrap();
        op.database_is(data, &[]).unwrap();
    }

    #[test]
    fn test_delete_all_clears_store() {
        let op = MemoryOperation::new();
        op.insert(br#"{"book": [{"id": 1}]}"#).unwrap();
        op.delete_all().unwrap();
        assert!(op.snapshot().is_empty());
        op.database_is(b"{}", &[]).unwrap();
    }

    #[test]
    fn test_database_is_mismatch_is_assertion_kind() {
        let op = MemoryOperation::new();
        op.insert(br#"{"book": [{"id": 1}]}"#).unwrap();

        let err = op
            .database_is(br#"{"book": [{"id": 1}, {"id": 2}]}"#, &[])
            .unwrap_err();
        assert!(err.is_assertion());
    }

    #[test]
    fn test_database_is_honors_ignored_properties() {
        let op = MemoryOperation::new();
        op.insert(br#"{"user": [{"name": "alice", "updatedAt": "now"}]}"#)
            .unwrap();
        op.database_is(
            br#"{"user": [{"name": "alice", "updatedAt": "later"}]}"#,
            &["updatedAt".to_string()],
        )
        .unwrap();
    }

    #[test]
    fn test_insert_malformed_dataset_is_dataset_error() {
        let op = MemoryOperation::new();
        let err = op.insert(b"[]").unwrap_err();
        assert!(matches!(err, SeedbedError::Dataset(_)));
        assert!(op.snapshot().is_empty());
    }

    #[test]
    fn test_insert_not_present_by_deep_equality() {
        let op = MemoryOperation::new();
        op.insert(br#"{"book": [{"id": 1}]}"#).unwrap();
        op.insert_not_present(br#"{"book": [{"id": 1}, {"id": 2}]}"#)
            .unwrap();

        let snapshot = op.snapshot();
        assert_eq!(snapshot.elements("book").len(), 2);
    }

    #[test]
    fn test_insert_not_present_by_key_property() {
        let op = MemoryOperation::new().with_key_property("id");
        op.insert(br#"{"book": [{"id": 1, "title": "old"}]}"#).unwrap();
        // Same key, different body: counts as present, not re-inserted.
        op.insert_not_present(br#"{"book": [{"id": 1, "title": "new"}]}"#)
            .unwrap();

        let snapshot = op.snapshot();
        assert_eq!(snapshot.elements("book").len(), 1);
        assert_eq!(snapshot.elements("book")[0]["title"], "old");
    }

    #[test]
    fn test_shared_connection_sees_writes() {
        let op = MemoryOperation::new();
        let peer = MemoryOperation::with_connection(Arc::clone(op.connection()));
        op.insert(br#"{"book": [{"id": 1}]}"#).unwrap();
        assert_eq!(peer.snapshot().elements("book").len(), 1);
    }

    #[test]
    fn test_embedded_server_flips_state() {
        let mut server = EmbeddedMemoryServer::new("127.0.0.1", 0);
        assert_eq!(server.state(), LifecycleState::Stopped);
        server.do_start().unwrap();
        assert_eq!(server.state(), LifecycleState::Running);
        server.do_stop().unwrap();
        assert_eq!(server.state(), LifecycleState::Stopped);
    }
}
