//! Lifecycle layer for Seedbed
//!
//! Shares running database instances across fixtures through a
//! reference-counted registry, and wraps "start an external process or
//! embedded engine" / "stop it" behind that count:
//! - ConnectionRegistry: process-wide table of (host, port) leases
//! - LifecycleManager: start-on-first-lease / stop-on-last-release
//! - ProcessSupervisor / ManagedServer: external-process backends
//! - LifecycleConfig: startup retry tuning via `seedbed.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod managed;
pub mod manager;
pub mod registry;
pub mod supervisor;

pub use config::{LifecycleConfig, CONFIG_FILE_NAME};
pub use managed::{ManagedServer, ManagedServerBuilder};
pub use manager::LifecycleManager;
pub use registry::ConnectionRegistry;
pub use supervisor::{
    ManagedCommand, OsFamily, ProcessHandle, ProcessSupervisor, StartupPolicy,
    DEFAULT_STARTUP_ATTEMPTS, DEFAULT_STARTUP_DELAY,
};
