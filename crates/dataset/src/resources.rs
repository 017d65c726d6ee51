//! Resource lookup under a fixture root
//!
//! Dataset files are addressed with `/`-prefixed, `/`-separated resource
//! paths (the classpath convention of the original annotation model),
//! resolved against a base directory on disk. Test suites typically point
//! the root at their `fixtures/` directory or a tempdir they populate.

use seedbed_core::{SeedbedError, SeedbedResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Base directory resource paths resolve against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRoot {
    base: PathBuf,
}

impl ResourceRoot {
    /// Create a root at `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The base directory
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Filesystem path a resource resolves to
    pub fn path_of(&self, resource: &str) -> PathBuf {
        self.base.join(resource.trim_start_matches('/'))
    }

    /// Whether the resource exists as a file
    pub fn exists(&self, resource: &str) -> bool {
        self.path_of(resource).is_file()
    }

    /// Read the resource's bytes
    ///
    /// # Errors
    ///
    /// A declared location that does not exist is a configuration error
    /// (the declaration references a missing file); read failures on an
    /// existing file surface as I/O errors.
    pub fn read(&self, resource: &str) -> SeedbedResult<Vec<u8>> {
        let path = self.path_of(resource);
        if !path.is_file() {
            return Err(SeedbedError::configuration(format!(
                "dataset resource '{}' does not exist under {}",
                resource,
                self.base.display()
            )));
        }
        Ok(fs::read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_with(resource: &str, content: &str) -> (tempfile::TempDir, ResourceRoot) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(resource.trim_start_matches('/'));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        let root = ResourceRoot::new(dir.path());
        (dir, root)
    }

    #[test]
    fn test_leading_slash_is_stripped() {
        let (_dir, root) = root_with("/pkg/MyTest.json", "{}");
        assert!(root.exists("/pkg/MyTest.json"));
        assert!(root.exists("pkg/MyTest.json"));
    }

    #[test]
    fn test_exists_is_false_for_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        let root = ResourceRoot::new(dir.path());
        assert!(!root.exists("/pkg"));
    }

    #[test]
    fn test_read_returns_bytes() {
        let (_dir, root) = root_with("/data.json", r#"{"book": []}"#);
        assert_eq!(root.read("/data.json").unwrap(), br#"{"book": []}"#);
    }

    #[test]
    fn test_read_missing_resource_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = ResourceRoot::new(dir.path());
        let err = root.read("/absent.json").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("/absent.json"));
    }
}
