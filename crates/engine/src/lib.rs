//! Execution layer for Seedbed
//!
//! Composes the locator, the load executor and the comparison contract
//! around each test:
//! - LoadStrategyExecutor: strategy dispatch onto a DatabaseOperation
//! - TestOrchestrator: before/after coordination per test
//! - MemoryOperation / EmbeddedMemoryServer: in-memory reference backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dispatcher;
pub mod memory;
pub mod orchestrator;

pub use dispatcher::LoadStrategyExecutor;
pub use memory::{EmbeddedMemoryServer, MemoryConnection, MemoryOperation};
pub use orchestrator::{TestOrchestrator, TestOrchestratorBuilder};
