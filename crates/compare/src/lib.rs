//! Dataset comparison engine for Seedbed
//!
//! Implements the backend-agnostic half of the "assert the store matches
//! this dataset" contract: backends read their native state into a
//! `DataSet` and delegate the deep comparison (group counts, element
//! matching, ignored properties) to [`DatasetComparator`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comparator;

pub use comparator::DatasetComparator;
