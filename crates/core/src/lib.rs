//! Core types and traits for Seedbed
//!
//! This crate defines the foundational pieces used throughout the harness:
//! - ConnectionKey: identity of a shared server resource
//! - LifecycleState / LoadStrategy: lifecycle and load-policy enums
//! - DataSet: the parsed dataset value model
//! - SeedbedError / AssertionFailure: the error taxonomy
//! - Traits: the backend contracts (DatabaseOperation, ServerLifecycle)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use dataset::DataSet;
pub use error::{AssertionFailure, SeedbedError, SeedbedResult};
pub use traits::{DatabaseOperation, ServerLifecycle};
pub use types::{ConnectionKey, LifecycleState, LoadStrategy};
