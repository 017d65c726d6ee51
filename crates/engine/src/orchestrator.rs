//! Per-test coordination
//!
//! [`TestOrchestrator`] is the piece a host test harness calls around each
//! test body:
//!
//! ```text
//! before(meta): resolve load spec -> read resources -> execute strategy
//! (test body)
//! after(meta):  resolve expected spec -> read resource -> database_is
//! ```
//!
//! `after`'s assertion is only evaluated when the body itself succeeded; a
//! failing body keeps its own error. Configuration errors abort `before`
//! prior to any store I/O, so a test never runs against partially loaded
//! data.

use crate::dispatcher::LoadStrategyExecutor;
use seedbed_core::{DatabaseOperation, SeedbedError, SeedbedResult};
use seedbed_dataset::{DatasetLocator, FixtureBinding, ResourceRoot, TestMetadata};
use tracing::debug;

/// Coordinates dataset load and expected-dataset assertion for one fixture
#[derive(Debug)]
pub struct TestOrchestrator<Op: DatabaseOperation> {
    locator: DatasetLocator,
    binding: FixtureBinding,
    operation: Op,
}

impl<Op: DatabaseOperation> TestOrchestrator<Op> {
    /// Start building an orchestrator
    pub fn builder() -> TestOrchestratorBuilder<Op> {
        TestOrchestratorBuilder::new()
    }

    /// The backend operation, for direct use in test bodies
    pub fn operation(&self) -> &Op {
        &self.operation
    }

    /// The fixture binding this orchestrator resolves against
    pub fn binding(&self) -> &FixtureBinding {
        &self.binding
    }

    /// Load declared datasets before the test body
    ///
    /// A test without a dataset declaration is a no-op.
    ///
    /// # Errors
    ///
    /// Configuration errors (resolution, missing resources) and backend
    /// load failures; both abort before the body should run.
    pub fn before(&self, meta: &TestMetadata) -> SeedbedResult<()> {
        let Some(spec) = self.locator.resolve_load(meta, &self.binding)? else {
            return Ok(());
        };
        debug!(
            suite = meta.suite(),
            test = meta.test(),
            strategy = %spec.strategy,
            "loading datasets"
        );
        let mut datasets = Vec::with_capacity(spec.locations.len());
        for location in &spec.locations {
            datasets.push(self.locator.root().read(location)?);
        }
        LoadStrategyExecutor::execute(spec.strategy, &datasets, &self.operation)
    }

    /// Assert the store matches the declared expectation after the body
    ///
    /// A test without an expected declaration is a no-op.
    ///
    /// # Errors
    ///
    /// Assertion failures ([`SeedbedError::Assertion`]) when the store
    /// diverges; configuration errors when the expectation cannot be
    /// resolved.
    pub fn after(&self, meta: &TestMetadata) -> SeedbedResult<()> {
        let Some(spec) = self.locator.resolve_expected(meta, &self.binding)? else {
            return Ok(());
        };
        debug!(
            suite = meta.suite(),
            test = meta.test(),
            location = %spec.location,
            "asserting expected dataset"
        );
        let expected = self.locator.root().read(&spec.location)?;
        self.operation
            .database_is(&expected, &spec.ignored_properties)
    }

    /// Run `body` between `before` and `after`
    ///
    /// The expected-dataset assertion is evaluated only when the body
    /// returns `Ok`; a failing body propagates its own error unchanged.
    ///
    /// # Errors
    ///
    /// Whichever of `before`, the body, or `after` failed first.
    pub fn run<T, F>(&self, meta: &TestMetadata, body: F) -> SeedbedResult<T>
    where
        F: FnOnce(&Op) -> SeedbedResult<T>,
    {
        self.before(meta)?;
        let value = body(&self.operation)?;
        self.after(meta)?;
        Ok(value)
    }
}

/// Builder for [`TestOrchestrator`]
///
/// Resource root, extension, identifier and operation are required;
/// `build()` reports the first missing one as a configuration error.
pub struct TestOrchestratorBuilder<Op: DatabaseOperation> {
    resource_root: Option<ResourceRoot>,
    extension: Option<String>,
    identifier: Option<String>,
    registered: Vec<String>,
    operation: Option<Op>,
}

impl<Op: DatabaseOperation> TestOrchestratorBuilder<Op> {
    fn new() -> Self {
        Self {
            resource_root: None,
            extension: None,
            identifier: None,
            registered: Vec::new(),
            operation: None,
        }
    }

    /// Directory dataset resources resolve against
    pub fn resource_root(mut self, root: ResourceRoot) -> Self {
        self.resource_root = Some(root);
        self
    }

    /// Dataset file extension of the backend (e.g. `"json"`)
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Connection identifier this fixture is bound to
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Identifiers of all fixtures registered for the test class
    ///
    /// Selective declarations are validated against this set. Defaults to
    /// just this fixture's identifier.
    pub fn registered_identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registered = identifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Backend operation the datasets are applied through
    pub fn operation(mut self, operation: Op) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Configuration error naming the first missing required field.
    pub fn build(self) -> SeedbedResult<TestOrchestrator<Op>> {
        let root = self.resource_root.ok_or_else(|| {
            SeedbedError::configuration("TestOrchestrator requires a resource root")
        })?;
        let extension = self.extension.ok_or_else(|| {
            SeedbedError::configuration("TestOrchestrator requires a dataset extension")
        })?;
        let identifier = self.identifier.ok_or_else(|| {
            SeedbedError::configuration("TestOrchestrator requires a connection identifier")
        })?;
        let operation = self.operation.ok_or_else(|| {
            SeedbedError::configuration("TestOrchestrator requires a database operation")
        })?;

        let binding = if self.registered.is_empty() {
            FixtureBinding::new(identifier)
        } else {
            FixtureBinding::with_registered(identifier, self.registered)
        };
        Ok(TestOrchestrator {
            locator: DatasetLocator::new(root, extension),
            binding,
            operation,
        })
    }
}
