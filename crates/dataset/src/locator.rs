//! Dataset resolution precedence
//!
//! Decides, for a given test, which dataset resources to load and which
//! expected-dataset resource to assert against. Resolution order (highest
//! first), mirrored for load and expected:
//!
//! 1. Explicit locations on the test-level declaration
//! 2. Explicit locations on the suite-level declaration
//! 3. Convention path for the test: `/{suite with '.' as '/'}#{test}.{ext}`,
//!    used only if that resource exists
//! 4. Convention path for the suite: `/{suite with '.' as '/'}.{ext}`,
//!    used only if that resource exists
//!
//! Selective overrides layer on top. For load resolution, the locations of
//! every matching selective entry are appended after the globally resolved
//! set. For expected resolution, an explicit global location wins over a
//! selective matcher, and a matching selective matcher wins over the
//! convention paths. A selective entry naming an identifier with no
//! registered fixture is a fatal configuration error, raised before any
//! resource I/O.
//!
//! A declaration that resolves to nothing is a configuration error; no
//! declaration at all resolves to `None` (nothing to load or assert).

use crate::metadata::TestMetadata;
use crate::resources::ResourceRoot;
use seedbed_core::{LoadStrategy, SeedbedError, SeedbedResult};
use tracing::debug;

/// Resolved load plan for one test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSpec {
    /// Resource locations in application order
    pub locations: Vec<String>,
    /// Declared load strategy
    pub strategy: LoadStrategy,
}

/// Resolved expected-dataset assertion for one test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDatasetSpec {
    /// Resource location of the expected dataset
    pub location: String,
    /// Dot-separated property paths excluded from comparison
    pub ignored_properties: Vec<String>,
}

/// The fixture a test class is bound to, plus its peer identifiers
///
/// Selective declarations are validated against the registered set, so a
/// typo in an identifier fails fast instead of silently never applying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureBinding {
    identifier: String,
    registered: Vec<String>,
}

impl FixtureBinding {
    /// Binding for a single-fixture test class
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let registered = vec![identifier.clone()];
        Self {
            identifier,
            registered,
        }
    }

    /// Binding that also knows its peer fixtures' identifiers
    pub fn with_registered<I, S>(identifier: impl Into<String>, registered: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identifier = identifier.into();
        let mut registered: Vec<String> = registered.into_iter().map(Into::into).collect();
        if !registered.contains(&identifier) {
            registered.push(identifier.clone());
        }
        Self {
            identifier,
            registered,
        }
    }

    /// This fixture's connection identifier
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether a selective entry applies to this fixture
    ///
    /// An empty selective identifier matches any fixture.
    fn applies(&self, selective_identifier: &str) -> bool {
        selective_identifier.is_empty() || selective_identifier == self.identifier
    }

    /// Reject selective identifiers naming no registered fixture
    fn verify_registered(&self, selective_identifier: &str) -> SeedbedResult<()> {
        if selective_identifier.is_empty()
            || self.registered.iter().any(|id| id == selective_identifier)
        {
            Ok(())
        } else {
            Err(SeedbedError::configuration(format!(
                "selective identifier '{}' matches no registered fixture (registered: {})",
                selective_identifier,
                self.registered.join(", ")
            )))
        }
    }
}

/// Resolves declared and convention dataset resources for tests
#[derive(Debug, Clone)]
pub struct DatasetLocator {
    root: ResourceRoot,
    extension: String,
}

impl DatasetLocator {
    /// Create a locator reading from `root` with the backend's extension
    /// (e.g. `"json"`)
    pub fn new(root: ResourceRoot, extension: impl Into<String>) -> Self {
        Self {
            root,
            extension: extension.into(),
        }
    }

    /// The resource root datasets are read from
    pub fn root(&self) -> &ResourceRoot {
        &self.root
    }

    /// Convention path for a test: `/{suite}#{test}.{ext}` with dots as
    /// directory separators
    pub fn method_convention_path(&self, suite: &str, test: &str) -> String {
        format!("/{}#{}.{}", suite.replace('.', "/"), test, self.extension)
    }

    /// Convention path for a suite: `/{suite}.{ext}` with dots as
    /// directory separators
    pub fn class_convention_path(&self, suite: &str) -> String {
        format!("/{}.{}", suite.replace('.', "/"), self.extension)
    }

    /// Resolve which datasets to load before the test
    ///
    /// Returns `Ok(None)` when the test declares no dataset at all.
    ///
    /// # Errors
    ///
    /// Configuration errors for unmatched selective identifiers and for
    /// declarations that resolve to zero resources.
    pub fn resolve_load(
        &self,
        meta: &TestMetadata,
        binding: &FixtureBinding,
    ) -> SeedbedResult<Option<DatasetSpec>> {
        let Some(active) = meta.method_dataset().or(meta.class_dataset()) else {
            return Ok(None);
        };
        for entry in &active.selective {
            binding.verify_registered(&entry.identifier)?;
        }

        let mut locations = self.global_load_locations(meta);
        for entry in &active.selective {
            if binding.applies(&entry.identifier) {
                locations.extend(entry.locations.iter().cloned());
            }
        }

        if locations.is_empty() {
            return Err(SeedbedError::configuration(format!(
                "dataset declaration for {}#{} resolves to no resources for fixture '{}'",
                meta.suite(),
                meta.test(),
                binding.identifier()
            )));
        }
        debug!(
            suite = meta.suite(),
            test = meta.test(),
            strategy = %active.strategy,
            count = locations.len(),
            "resolved load locations"
        );
        Ok(Some(DatasetSpec {
            locations,
            strategy: active.strategy,
        }))
    }

    /// Resolve the expected dataset to assert after the test
    ///
    /// Returns `Ok(None)` when the test declares no expectation at all.
    ///
    /// # Errors
    ///
    /// Configuration errors for unmatched selective identifiers and for
    /// declarations that resolve to no resource.
    pub fn resolve_expected(
        &self,
        meta: &TestMetadata,
        binding: &FixtureBinding,
    ) -> SeedbedResult<Option<ExpectedDatasetSpec>> {
        let Some(active) = meta.method_expected().or(meta.class_expected()) else {
            return Ok(None);
        };
        for entry in &active.selective {
            binding.verify_registered(&entry.identifier)?;
        }

        let explicit = meta
            .method_expected()
            .and_then(|d| d.location.clone())
            .or_else(|| meta.class_expected().and_then(|d| d.location.clone()));
        let selective = active
            .selective
            .iter()
            .find(|entry| binding.applies(&entry.identifier))
            .map(|entry| entry.location.clone());

        let location = explicit
            .or(selective)
            .or_else(|| self.existing(self.method_convention_path(meta.suite(), meta.test())))
            .or_else(|| self.existing(self.class_convention_path(meta.suite())));

        let Some(location) = location else {
            return Err(SeedbedError::configuration(format!(
                "expected-dataset declaration for {}#{} resolves to no resource for fixture '{}'",
                meta.suite(),
                meta.test(),
                binding.identifier()
            )));
        };
        debug!(
            suite = meta.suite(),
            test = meta.test(),
            %location,
            "resolved expected location"
        );
        Ok(Some(ExpectedDatasetSpec {
            location,
            ignored_properties: active.ignored_properties.clone(),
        }))
    }

    /// Steps 1-4 of the precedence list for load resolution
    fn global_load_locations(&self, meta: &TestMetadata) -> Vec<String> {
        if let Some(declaration) = meta.method_dataset() {
            if !declaration.locations.is_empty() {
                return declaration.locations.clone();
            }
        }
        if let Some(declaration) = meta.class_dataset() {
            if !declaration.locations.is_empty() {
                return declaration.locations.clone();
            }
        }
        if let Some(path) = self.existing(self.method_convention_path(meta.suite(), meta.test())) {
            return vec![path];
        }
        if let Some(path) = self.existing(self.class_convention_path(meta.suite())) {
            return vec![path];
        }
        Vec::new()
    }

    fn existing(&self, path: String) -> Option<String> {
        self.root.exists(&path).then_some(path)
    }
}
