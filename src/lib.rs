//! Seedbed - shared-lifecycle dataset fixtures for integration tests
//!
//! Seedbed lets a test declare "load this dataset before the test" and
//! "assert the store matches this dataset after the test" against any
//! backing store, while sharing and tearing down server processes safely
//! across many tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use seedbed::{
//!     DatasetDeclaration, ExpectedDeclaration, LoadStrategy, MemoryOperation,
//!     ResourceRoot, TestMetadata, TestOrchestrator,
//! };
//!
//! let orchestrator = TestOrchestrator::builder()
//!     .resource_root(ResourceRoot::new("tests/fixtures"))
//!     .extension("json")
//!     .identifier("books")
//!     .operation(MemoryOperation::new())
//!     .build()?;
//!
//! let meta = TestMetadata::builder("catalog.BookTest", "adds_a_book")
//!     .method_dataset(
//!         DatasetDeclaration::new(LoadStrategy::CleanInsert)
//!             .with_locations(["/catalog/books.json"]),
//!     )
//!     .method_expected(ExpectedDeclaration::new().at_location("/catalog/expected.json"))
//!     .build();
//!
//! orchestrator.run(&meta, |op| {
//!     // exercise the system under test through op.connection()
//!     Ok(())
//! })?;
//! ```
//!
//! # Architecture
//!
//! Backends plug in through two trait seams: [`DatabaseOperation`]
//! (dataset application and comparison) and [`ServerLifecycle`]
//! (start/stop). The [`ConnectionRegistry`] reference-counts (host, port)
//! leases so many fixtures share one running server; [`LifecycleManager`]
//! starts it on the first lease and stops it on the last release.

// Re-export the public API from the member crates
pub use seedbed_compare::DatasetComparator;
pub use seedbed_core::{
    AssertionFailure, ConnectionKey, DataSet, DatabaseOperation, LifecycleState, LoadStrategy,
    SeedbedError, SeedbedResult, ServerLifecycle,
};
pub use seedbed_dataset::{
    DatasetDeclaration, DatasetLocator, DatasetSpec, ExpectedDatasetSpec, ExpectedDeclaration,
    FixtureBinding, ResourceRoot, SelectiveLocations, SelectiveMatcher, TestMetadata,
    TestMetadataBuilder,
};
pub use seedbed_engine::{
    EmbeddedMemoryServer, LoadStrategyExecutor, MemoryConnection, MemoryOperation,
    TestOrchestrator, TestOrchestratorBuilder,
};
pub use seedbed_lifecycle::{
    ConnectionRegistry, LifecycleConfig, LifecycleManager, ManagedCommand, ManagedServer,
    ManagedServerBuilder, OsFamily, ProcessHandle, ProcessSupervisor, StartupPolicy,
    CONFIG_FILE_NAME, DEFAULT_STARTUP_ATTEMPTS, DEFAULT_STARTUP_DELAY,
};
