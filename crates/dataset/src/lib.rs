//! Dataset declaration and resolution for Seedbed
//!
//! Turns a test's declarative metadata into concrete resources:
//! - TestMetadata: typed suite/test declarations (datasets, expectations,
//!   selective overrides)
//! - ResourceRoot: classpath-style resource lookup under a base directory
//! - DatasetLocator: precedence resolution producing a DatasetSpec to load
//!   and an ExpectedDatasetSpec to assert against

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod locator;
pub mod metadata;
pub mod resources;

pub use locator::{DatasetLocator, DatasetSpec, ExpectedDatasetSpec, FixtureBinding};
pub use metadata::{
    DatasetDeclaration, ExpectedDeclaration, SelectiveLocations, SelectiveMatcher, TestMetadata,
    TestMetadataBuilder,
};
pub use resources::ResourceRoot;
