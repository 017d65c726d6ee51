//! Core types for the fixture harness
//!
//! This module defines the foundational types:
//! - ConnectionKey: identity of a shared server resource (host + port)
//! - LifecycleState: whether a managed instance is stopped or running
//! - LoadStrategy: how declared datasets reconcile with existing store state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a shared server resource
///
/// A ConnectionKey uniquely identifies one leasable database instance by
/// host and port. Fixtures pointing at the same key share the same running
/// server through the connection registry. Equality is by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionKey {
    /// Host name or address
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl ConnectionKey {
    /// Create a new connection key
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Lifecycle of a managed or embedded server instance
///
/// Transitions only `Stopped -> Running` on first lease acquisition and
/// `Running -> Stopped` when the last lease is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// No fixture holds a lease; the instance is not running
    Stopped,
    /// At least one fixture holds a lease
    Running,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Stopped => write!(f, "stopped"),
            LifecycleState::Running => write!(f, "running"),
        }
    }
}

/// Policy for reconciling existing store state with declared datasets
///
/// Applied by the load executor before the test body runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadStrategy {
    /// Delete everything, then insert the declared datasets in order
    CleanInsert,
    /// Insert the declared datasets in order, keeping existing state
    Insert,
    /// Delete everything; declared dataset contents are ignored
    DeleteAll,
    /// Insert only elements not already present (presence is backend-defined)
    ///
    /// Retained for older suites. New suites should declare `CleanInsert`.
    Refresh,
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStrategy::CleanInsert => write!(f, "clean-insert"),
            LoadStrategy::Insert => write!(f, "insert"),
            LoadStrategy::DeleteAll => write!(f, "delete-all"),
            LoadStrategy::Refresh => write!(f, "refresh"),
        }
    }
}
