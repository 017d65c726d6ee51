//! Harness configuration via `seedbed.toml`
//!
//! Suites that spawn managed servers can tune the startup retry budget
//! from a config file next to the test resources instead of hardcoding it
//! per fixture. A missing file means defaults.

use crate::supervisor::{StartupPolicy, DEFAULT_STARTUP_ATTEMPTS, DEFAULT_STARTUP_DELAY};
use seedbed_core::{SeedbedError, SeedbedResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Config file name looked up next to the fixture resources
pub const CONFIG_FILE_NAME: &str = "seedbed.toml";

/// Startup tuning loaded from `seedbed.toml`
///
/// # Example
///
/// ```toml
/// # Readiness attempts before a managed server start is declared failed
/// startup-attempts = 10
///
/// # Fixed delay between readiness attempts, in milliseconds
/// startup-delay-ms = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LifecycleConfig {
    /// Readiness attempts before a start is declared failed
    #[serde(default = "default_startup_attempts")]
    pub startup_attempts: u32,
    /// Fixed delay between readiness attempts, in milliseconds
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,
}

fn default_startup_attempts() -> u32 {
    DEFAULT_STARTUP_ATTEMPTS
}

fn default_startup_delay_ms() -> u64 {
    DEFAULT_STARTUP_DELAY.as_millis() as u64
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            startup_attempts: default_startup_attempts(),
            startup_delay_ms: default_startup_delay_ms(),
        }
    }
}

impl LifecycleConfig {
    /// The startup policy described by this config
    pub fn startup_policy(&self) -> StartupPolicy {
        StartupPolicy::new(
            self.startup_attempts,
            Duration::from_millis(self.startup_delay_ms),
        )
    }

    /// Parse config from TOML text
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the parse failure.
    pub fn from_toml_str(content: &str) -> SeedbedResult<Self> {
        toml::from_str(content).map_err(|e| {
            SeedbedError::configuration(format!("invalid {}: {}", CONFIG_FILE_NAME, e))
        })
    }

    /// Load config from `path`, falling back to defaults when absent
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file exists but cannot be read, or a
    /// configuration error when it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> SeedbedResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# Seedbed harness configuration
#
# Readiness attempts before a managed server start is declared failed
startup-attempts = 10

# Fixed delay between readiness attempts, in milliseconds
startup-delay-ms = 500
"#
    }
}
