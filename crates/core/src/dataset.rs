//! Dataset value model
//!
//! A dataset file is a JSON object mapping a logical group name (table,
//! collection, measurement) to an array of element objects:
//!
//! ```json
//! {
//!     "book": [
//!         { "title": "The Hobbit", "numberOfPages": 293 }
//!     ]
//! }
//! ```
//!
//! [`DataSet`] is a newtype over an ordered map of groups. Backend adapters
//! parse dataset bytes with [`DataSet::parse`], apply the elements to their
//! store, and read store state back into a `DataSet` for comparison.

use crate::error::{SeedbedError, SeedbedResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// Parsed dataset: group name to element list
///
/// Newtype around `BTreeMap<String, Vec<serde_json::Value>>` providing:
/// - Shape-validating parse from raw file bytes
/// - Direct map access via Deref/DerefMut
/// - Group-wise merge for multi-file loads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSet(BTreeMap<String, Vec<Value>>);

impl DataSet {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Parse dataset bytes
    ///
    /// The root must be a JSON object and every group value must be an
    /// array; anything else is a malformed dataset.
    ///
    /// # Errors
    ///
    /// Returns [`SeedbedError::Dataset`] when the content is not valid JSON
    /// or does not have the object-of-arrays shape.
    pub fn parse(bytes: &[u8]) -> SeedbedResult<Self> {
        let root: Value = serde_json::from_slice(bytes)?;
        let Value::Object(groups) = root else {
            return Err(SeedbedError::dataset(
                "dataset root must be a JSON object mapping groups to element arrays",
            ));
        };
        let mut parsed = BTreeMap::new();
        for (group, value) in groups {
            let Value::Array(elements) = value else {
                return Err(SeedbedError::dataset(format!(
                    "group '{}' must be a JSON array of elements",
                    group
                )));
            };
            parsed.insert(group, elements);
        }
        Ok(Self(parsed))
    }

    /// Elements of a group, empty when the group is absent
    pub fn elements(&self, group: &str) -> &[Value] {
        self.0.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append one element to a group, creating the group if needed
    pub fn push_element(&mut self, group: impl Into<String>, element: Value) {
        self.0.entry(group.into()).or_default().push(element);
    }

    /// Append all groups of `other`, preserving element order
    pub fn merge(&mut self, other: DataSet) {
        for (group, mut elements) in other.0 {
            self.0.entry(group).or_default().append(&mut elements);
        }
    }

    /// Total element count across all groups
    pub fn total_elements(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl Deref for DataSet {
    type Target = BTreeMap<String, Vec<Value>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DataSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
