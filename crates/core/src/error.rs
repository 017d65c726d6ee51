//! Error types for the fixture harness
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! The taxonomy keeps three families apart:
//! - configuration errors: wrong declarations, raised before any store I/O
//! - startup errors: a managed server never launched or never became reachable
//! - assertion failures: the store did not match the expected dataset
//!
//! Assertion failures are an intentional test outcome, not a harness bug.
//! They carry a structured [`AssertionFailure`] so callers can route them to
//! the test report instead of treating them as unexpected exceptions.

use crate::types::{ConnectionKey, LoadStrategy};
use std::io;
use thiserror::Error;

/// Result type alias for harness operations
pub type SeedbedResult<T> = std::result::Result<T, SeedbedError>;

/// Error types for the fixture harness
#[derive(Debug, Error)]
pub enum SeedbedError {
    /// Invalid or incomplete test declaration (missing builder field,
    /// unmatched selective identifier, locations that resolve to nothing)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A managed server process failed to launch
    #[error("server {key} failed to start: {reason}")]
    Startup {
        /// Host and port of the server that failed
        key: ConnectionKey,
        /// Underlying launch failure
        reason: String,
    },

    /// A managed server never became reachable within the retry budget
    #[error("server {key} did not become reachable after {attempts} attempts")]
    StartupTimeout {
        /// Host and port of the server that timed out
        key: ConnectionKey,
        /// Number of readiness attempts that were made
        attempts: u32,
    },

    /// A strategy that consumes datasets was declared with none resolved
    #[error("load strategy '{strategy}' requires at least one dataset")]
    NoDatasetProvided {
        /// The strategy that was declared
        strategy: LoadStrategy,
    },

    /// Malformed dataset content
    #[error("dataset error: {0}")]
    Dataset(String),

    /// I/O error (resource reads, process spawning)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reported by a backend adapter
    #[error("backend error: {0}")]
    Backend(String),

    /// The store did not match the expected dataset
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
}

impl SeedbedError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        SeedbedError::Configuration(msg.into())
    }

    /// Create a dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        SeedbedError::Dataset(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        SeedbedError::Backend(msg.into())
    }

    /// True for errors raised before any store I/O occurred
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SeedbedError::Configuration(_) | SeedbedError::NoDatasetProvided { .. }
        )
    }

    /// True for launch and readiness failures
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            SeedbedError::Startup { .. } | SeedbedError::StartupTimeout { .. }
        )
    }

    /// True when the store diverged from the expected dataset
    pub fn is_assertion(&self) -> bool {
        matches!(self, SeedbedError::Assertion(_))
    }
}

impl From<serde_json::Error> for SeedbedError {
    fn from(e: serde_json::Error) -> Self {
        SeedbedError::Dataset(e.to_string())
    }
}

/// How the store diverged from the expected dataset
///
/// Produced by the comparison engine. Each variant renders a human-readable
/// diff naming the offending group and element.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssertionFailure {
    /// Element counts differ for a logical group
    #[error("expected {expected} elements in '{group}' but found {actual}")]
    CountMismatch {
        /// Table, collection or measurement name
        group: String,
        /// Declared element count
        expected: usize,
        /// Element count found in the store
        actual: usize,
    },

    /// A key-matched element carries different values
    #[error(
        "element '{key}' in '{group}' does not match: expected {expected}, found {found}"
    )]
    ValueMismatch {
        /// Table, collection or measurement name
        group: String,
        /// Value of the key property that matched
        key: String,
        /// Declared element, rendered as JSON
        expected: String,
        /// Stored element, rendered as JSON
        found: String,
    },

    /// An expected element has no counterpart in the store
    #[error("expected element in '{group}' was not found: {element}")]
    UnmatchedElement {
        /// Table, collection or measurement name
        group: String,
        /// Declared element, rendered as JSON
        element: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ConnectionKey {
        ConnectionKey::new("127.0.0.1", 27017)
    }

    #[test]
    fn test_error_display_configuration() {
        let err = SeedbedError::configuration("identifier 'three' matches no fixture");
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("identifier 'three'"));
    }

    #[test]
    fn test_error_display_startup() {
        let err = SeedbedError::Startup {
            key: key(),
            reason: "binary not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:27017"));
        assert!(msg.contains("binary not found"));
    }

    #[test]
    fn test_error_display_startup_timeout() {
        let err = SeedbedError::StartupTimeout {
            key: key(),
            attempts: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("did not become reachable"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn test_error_display_no_dataset_provided() {
        let err = SeedbedError::NoDatasetProvided {
            strategy: LoadStrategy::Refresh,
        };
        assert!(err.to_string().contains("refresh"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err: SeedbedError = io_err.into();
        assert!(matches!(err, SeedbedError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_err = serde_json::from_slice::<serde_json::Value>(b"{not json").unwrap_err();
        let err: SeedbedError = parse_err.into();
        assert!(matches!(err, SeedbedError::Dataset(_)));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(SeedbedError::configuration("x").is_configuration());
        assert!(SeedbedError::NoDatasetProvided {
            strategy: LoadStrategy::Refresh
        }
        .is_configuration());
        assert!(SeedbedError::Startup {
            key: key(),
            reason: "x".into()
        }
        .is_startup());
        assert!(SeedbedError::StartupTimeout {
            key: key(),
            attempts: 1
        }
        .is_startup());

        let assertion: SeedbedError = AssertionFailure::CountMismatch {
            group: "book".into(),
            expected: 2,
            actual: 1,
        }
        .into();
        assert!(assertion.is_assertion());
        assert!(!assertion.is_configuration());
        assert!(!assertion.is_startup());
    }

    #[test]
    fn test_assertion_count_mismatch_reports_both_counts() {
        let failure = AssertionFailure::CountMismatch {
            group: "book".into(),
            expected: 2,
            actual: 3,
        };
        let msg = failure.to_string();
        assert!(msg.contains("'book'"));
        assert!(msg.contains('2'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_assertion_unmatched_element_names_element() {
        let failure = AssertionFailure::UnmatchedElement {
            group: "book".into(),
            element: r#"{"title":"The Hobbit"}"#.into(),
        };
        let msg = failure.to_string();
        assert!(msg.contains("was not found"));
        assert!(msg.contains("The Hobbit"));
    }

    #[test]
    fn test_assertion_transparent_display() {
        let failure = AssertionFailure::ValueMismatch {
            group: "book".into(),
            key: "1".into(),
            expected: r#"{"pages":293}"#.into(),
            found: r#"{"pages":295}"#.into(),
        };
        let err: SeedbedError = failure.clone().into();
        assert_eq!(err.to_string(), failure.to_string());
    }
}
