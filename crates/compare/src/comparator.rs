//! Deep dataset comparison
//!
//! The shared shape every backend's "store matches expected" assertion
//! follows, independent of how the backend reads its state:
//!
//! 1. Per expected group, compare element counts (a group absent from the
//!    actual dataset counts as 0); mismatch fails reporting both counts.
//! 2. Per expected element, locate a matching actual element: by the key
//!    property when one is configured and present on the element,
//!    otherwise by deep-equality search across the group.
//! 3. Properties named in the ignore list are stripped from both sides
//!    before matching.
//!
//! The policy is count-then-match: the element scan is expected-driven, so
//! undeclared extra actual elements surface only through the count check.
//! This replaces the per-backend asymmetry of older comparators with one
//! documented rule.

use seedbed_core::{AssertionFailure, DataSet};
use serde_json::Value;

/// Configurable dataset equality check
///
/// Backends construct one per assertion, feeding it the ignore list from
/// the resolved expectation and, when their format has identity keys, the
/// key property name (`"_id"`, `"id"`, a row key column).
#[derive(Debug, Clone, Default)]
pub struct DatasetComparator {
    ignored_properties: Vec<String>,
    key_property: Option<String>,
}

impl DatasetComparator {
    /// Comparator with no ignored properties and no key property
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude the given dot-separated property paths from comparison
    pub fn ignoring<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_properties
            .extend(properties.into_iter().map(Into::into));
        self
    }

    /// Match elements by this property before deep comparison
    pub fn with_key_property(mut self, property: impl Into<String>) -> Self {
        self.key_property = Some(property.into());
        self
    }

    /// Assert `actual` matches `expected`
    ///
    /// # Errors
    ///
    /// Returns the first [`AssertionFailure`] encountered, carrying a
    /// human-readable diff (counts, or expected vs found values).
    pub fn compare(&self, expected: &DataSet, actual: &DataSet) -> Result<(), AssertionFailure> {
        for (group, expected_elements) in expected.iter() {
            let actual_elements = actual.elements(group);
            if actual_elements.len() != expected_elements.len() {
                return Err(AssertionFailure::CountMismatch {
                    group: group.clone(),
                    expected: expected_elements.len(),
                    actual: actual_elements.len(),
                });
            }

            let actual_stripped: Vec<Value> = actual_elements
                .iter()
                .map(|element| self.strip_ignored(element))
                .collect();

            for element in expected_elements {
                let want = self.strip_ignored(element);
                self.match_element(group, element, &want, actual_elements, &actual_stripped)?;
            }
        }
        Ok(())
    }

    /// Locate one expected element among the actual ones
    fn match_element(
        &self,
        group: &str,
        original: &Value,
        want: &Value,
        actual: &[Value],
        actual_stripped: &[Value],
    ) -> Result<(), AssertionFailure> {
        if let Some(key_property) = &self.key_property {
            if let Some(key) = original.get(key_property) {
                // Key match first, then deep comparison of the survivor.
                let found = actual
                    .iter()
                    .position(|candidate| candidate.get(key_property) == Some(key));
                return match found {
                    Some(index) if &actual_stripped[index] == want => Ok(()),
                    Some(index) => Err(AssertionFailure::ValueMismatch {
                        group: group.to_string(),
                        key: render_key(key),
                        expected: want.to_string(),
                        found: actual_stripped[index].to_string(),
                    }),
                    None => Err(AssertionFailure::UnmatchedElement {
                        group: group.to_string(),
                        element: want.to_string(),
                    }),
                };
            }
        }

        if actual_stripped.contains(want) {
            Ok(())
        } else {
            Err(AssertionFailure::UnmatchedElement {
                group: group.to_string(),
                element: want.to_string(),
            })
        }
    }

    /// Clone of `value` with every ignored path removed
    fn strip_ignored(&self, value: &Value) -> Value {
        let mut stripped = value.clone();
        for path in &self.ignored_properties {
            let segments: Vec<&str> = path.split('.').collect();
            remove_path(&mut stripped, &segments);
        }
        stripped
    }
}

/// Remove a dot-path from an element, leaf-first
fn remove_path(value: &mut Value, segments: &[&str]) {
    let Value::Object(map) = value else {
        return;
    };
    match segments {
        [] => {}
        [leaf] => {
            map.remove(*leaf);
        }
        [head, rest @ ..] => {
            if let Some(child) = map.get_mut(*head) {
                remove_path(child, rest);
            }
        }
    }
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
