//! Shared test utilities for the integration suites.
//!
//! Import via `mod common;` from any test file.

#![allow(dead_code)]

use seedbed::{
    ConnectionKey, MemoryOperation, ResourceRoot, SeedbedError, SeedbedResult, ServerLifecycle,
    TestOrchestrator,
};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use tempfile::TempDir;

static INIT_TRACING: Once = Once::new();

/// Install a test subscriber once per process.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

// ============================================================================
// FixtureRoot - tempdir-backed resource root
// ============================================================================

/// Tempdir populated with dataset resources for one test.
pub struct FixtureRoot {
    pub dir: TempDir,
}

impl FixtureRoot {
    pub fn new() -> Self {
        init_tracing();
        FixtureRoot {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Write one resource under the root, creating parent directories.
    pub fn write(&self, resource: &str, content: &str) -> &Self {
        let path = self.dir.path().join(resource.trim_start_matches('/'));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub fn root(&self) -> ResourceRoot {
        ResourceRoot::new(self.dir.path())
    }

    /// Orchestrator over a fresh in-memory store bound to `identifier`.
    pub fn memory_orchestrator(&self, identifier: &str) -> TestOrchestrator<MemoryOperation> {
        self.memory_orchestrator_with(identifier, MemoryOperation::new())
    }

    /// Orchestrator over a caller-supplied operation.
    pub fn memory_orchestrator_with(
        &self,
        identifier: &str,
        operation: MemoryOperation,
    ) -> TestOrchestrator<MemoryOperation> {
        TestOrchestrator::builder()
            .resource_root(self.root())
            .extension("json")
            .identifier(identifier)
            .operation(operation)
            .build()
            .expect("Failed to build orchestrator")
    }
}

// ============================================================================
// CountingServer - lifecycle backend reporting into shared tallies
// ============================================================================

/// ServerLifecycle stub counting starts and stops through shared atomics,
/// so several fixture instances can report into one tally.
#[derive(Clone)]
pub struct CountingServer {
    pub host: String,
    pub port: u16,
    pub starts: Arc<AtomicUsize>,
    pub stops: Arc<AtomicUsize>,
    pub fail_start: bool,
}

impl CountingServer {
    pub fn new(port: u16) -> Self {
        CountingServer {
            host: "127.0.0.1".to_string(),
            port,
            starts: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
            fail_start: false,
        }
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl ServerLifecycle for CountingServer {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn do_start(&mut self) -> SeedbedResult<()> {
        if self.fail_start {
            return Err(SeedbedError::Startup {
                key: ConnectionKey::new(self.host.clone(), self.port),
                reason: "simulated launch failure".to_string(),
            });
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn do_stop(&mut self) -> SeedbedResult<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
