//! Declarative test metadata
//!
//! Typed replacement for reflection-driven annotation discovery: the host
//! test code (or a macro layer above it) populates a [`TestMetadata`] per
//! test, naming the suite, the test, and the optional dataset and
//! expected-dataset declarations at suite (class) and test (method) level.
//! The locator consumes this struct; it never inspects test code itself.

use seedbed_core::LoadStrategy;

/// Dataset locations bound to one connection identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectiveLocations {
    /// Connection identifier the locations apply to; empty matches any
    pub identifier: String,
    /// Resource locations, in declaration order
    pub locations: Vec<String>,
}

/// Expected-dataset location bound to one connection identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectiveMatcher {
    /// Connection identifier the matcher applies to; empty matches any
    pub identifier: String,
    /// Resource location of the expected dataset
    pub location: String,
}

/// Declared "load this before the test" block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDeclaration {
    /// Explicit resource locations; empty means "use convention paths"
    pub locations: Vec<String>,
    /// How the datasets reconcile with existing store state
    pub strategy: LoadStrategy,
    /// Per-identifier overrides layered on the global locations
    pub selective: Vec<SelectiveLocations>,
}

impl DatasetDeclaration {
    /// Declaration with the given strategy and no explicit locations
    pub fn new(strategy: LoadStrategy) -> Self {
        Self {
            locations: Vec::new(),
            strategy,
            selective: Vec::new(),
        }
    }

    /// Add explicit locations
    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations.extend(locations.into_iter().map(Into::into));
        self
    }

    /// Add a selective override for one connection identifier
    pub fn with_selective<I, S>(mut self, identifier: impl Into<String>, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selective.push(SelectiveLocations {
            identifier: identifier.into(),
            locations: locations.into_iter().map(Into::into).collect(),
        });
        self
    }
}

/// Declared "assert the store matches this after the test" block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpectedDeclaration {
    /// Explicit resource location; `None` means "use convention paths"
    pub location: Option<String>,
    /// Per-identifier matchers layered on the global location
    pub selective: Vec<SelectiveMatcher>,
    /// Dot-separated property paths excluded from comparison
    pub ignored_properties: Vec<String>,
}

impl ExpectedDeclaration {
    /// Declaration with no explicit location
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the explicit location
    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Add a selective matcher for one connection identifier
    pub fn with_selective(
        mut self,
        identifier: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        self.selective.push(SelectiveMatcher {
            identifier: identifier.into(),
            location: location.into(),
        });
        self
    }

    /// Exclude a property path from comparison
    pub fn ignoring(mut self, property: impl Into<String>) -> Self {
        self.ignored_properties.push(property.into());
        self
    }
}

/// Everything the locator needs to know about one test
///
/// `suite` is the dotted fully-qualified suite name (e.g. `"pkg.MyTest"`)
/// and `test` the test name; together they drive the convention resource
/// paths. Method-level declarations take precedence over class-level ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMetadata {
    suite: String,
    test: String,
    class_dataset: Option<DatasetDeclaration>,
    method_dataset: Option<DatasetDeclaration>,
    class_expected: Option<ExpectedDeclaration>,
    method_expected: Option<ExpectedDeclaration>,
}

impl TestMetadata {
    /// Start building metadata for `suite` / `test`
    pub fn builder(suite: impl Into<String>, test: impl Into<String>) -> TestMetadataBuilder {
        TestMetadataBuilder {
            meta: TestMetadata {
                suite: suite.into(),
                test: test.into(),
                class_dataset: None,
                method_dataset: None,
                class_expected: None,
                method_expected: None,
            },
        }
    }

    /// Dotted fully-qualified suite name
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Test name within the suite
    pub fn test(&self) -> &str {
        &self.test
    }

    /// Suite-level dataset declaration
    pub fn class_dataset(&self) -> Option<&DatasetDeclaration> {
        self.class_dataset.as_ref()
    }

    /// Test-level dataset declaration
    pub fn method_dataset(&self) -> Option<&DatasetDeclaration> {
        self.method_dataset.as_ref()
    }

    /// Suite-level expected declaration
    pub fn class_expected(&self) -> Option<&ExpectedDeclaration> {
        self.class_expected.as_ref()
    }

    /// Test-level expected declaration
    pub fn method_expected(&self) -> Option<&ExpectedDeclaration> {
        self.method_expected.as_ref()
    }
}

/// Fluent builder for [`TestMetadata`]
pub struct TestMetadataBuilder {
    meta: TestMetadata,
}

impl TestMetadataBuilder {
    /// Attach a suite-level dataset declaration
    pub fn class_dataset(mut self, declaration: DatasetDeclaration) -> Self {
        self.meta.class_dataset = Some(declaration);
        self
    }

    /// Attach a test-level dataset declaration
    pub fn method_dataset(mut self, declaration: DatasetDeclaration) -> Self {
        self.meta.method_dataset = Some(declaration);
        self
    }

    /// Attach a suite-level expected declaration
    pub fn class_expected(mut self, declaration: ExpectedDeclaration) -> Self {
        self.meta.class_expected = Some(declaration);
        self
    }

    /// Attach a test-level expected declaration
    pub fn method_expected(mut self, declaration: ExpectedDeclaration) -> Self {
        self.meta.method_expected = Some(declaration);
        self
    }

    /// Finish building
    pub fn build(self) -> TestMetadata {
        self.meta
    }
}
