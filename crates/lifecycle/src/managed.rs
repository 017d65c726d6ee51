//! Reusable managed-backend lifecycle
//!
//! [`ManagedServer`] implements [`ServerLifecycle`] for any backend that
//! runs as an external OS process: spawn the configured command, poll a
//! readiness probe under the startup policy, and kill the process on the
//! last lease release. Backend integrations only supply the command line
//! and, when a TCP connect is not enough, a custom probe.

use crate::supervisor::{ManagedCommand, ProcessHandle, ProcessSupervisor, StartupPolicy};
use seedbed_core::{SeedbedError, SeedbedResult, ServerLifecycle};
use std::net::TcpStream;
use tracing::info;

type ReadinessProbe = Box<dyn FnMut() -> bool + Send>;

/// Server instance started and stopped by spawning an external process
pub struct ManagedServer {
    host: String,
    port: u16,
    command: ManagedCommand,
    policy: StartupPolicy,
    probe: ReadinessProbe,
    handle: Option<ProcessHandle>,
}

impl std::fmt::Debug for ManagedServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedServer")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("command", &self.command)
            .field("policy", &self.policy)
            .field("probe", &"<probe>")
            .field("handle", &self.handle)
            .finish()
    }
}

impl ManagedServer {
    /// Start building a managed server
    pub fn builder() -> ManagedServerBuilder {
        ManagedServerBuilder::new()
    }

    /// Handle of the running process, if this instance performed the start
    pub fn process(&mut self) -> Option<&mut ProcessHandle> {
        self.handle.as_mut()
    }

    fn tcp_probe(host: String, port: u16) -> ReadinessProbe {
        Box::new(move || TcpStream::connect((host.as_str(), port)).is_ok())
    }
}

impl ServerLifecycle for ManagedServer {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn do_start(&mut self) -> SeedbedResult<()> {
        let key = self.connection_key();
        info!(%key, program = %self.command.resolved_program(), "starting managed server");

        let mut handle = match ProcessSupervisor::start(&self.command) {
            Ok(handle) => handle,
            Err(err) => {
                return Err(SeedbedError::Startup {
                    key,
                    reason: err.to_string(),
                })
            }
        };

        let policy = self.policy;
        if let Err(err) = policy.wait_until_ready(&key, || (self.probe)()) {
            // Never leave a half-started process behind on timeout.
            ProcessSupervisor::stop(&mut handle);
            return Err(err);
        }

        self.handle = Some(handle);
        Ok(())
    }

    fn do_stop(&mut self) -> SeedbedResult<()> {
        if let Some(mut handle) = self.handle.take() {
            info!(key = %self.connection_key(), "stopping managed server");
            ProcessSupervisor::stop(&mut handle);
        }
        Ok(())
    }
}

/// Builder for [`ManagedServer`]
///
/// Host, port and command are required; the readiness probe defaults to a
/// TCP connection attempt against the configured address.
pub struct ManagedServerBuilder {
    host: Option<String>,
    port: Option<u16>,
    command: Option<ManagedCommand>,
    policy: StartupPolicy,
    probe: Option<ReadinessProbe>,
}

impl ManagedServerBuilder {
    fn new() -> Self {
        Self {
            host: None,
            port: None,
            command: None,
            policy: StartupPolicy::default(),
            probe: None,
        }
    }

    /// Host the server will listen on
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Port the server will listen on
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Command line that launches the server
    pub fn command(mut self, command: ManagedCommand) -> Self {
        self.command = Some(command);
        self
    }

    /// Startup retry budget (defaults to [`StartupPolicy::default`])
    pub fn startup_policy(mut self, policy: StartupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Custom readiness probe replacing the default TCP connect
    pub fn readiness_probe(mut self, probe: impl FnMut() -> bool + Send + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Build the server
    ///
    /// # Errors
    ///
    /// Returns a configuration error when host, port or command is missing.
    pub fn build(self) -> SeedbedResult<ManagedServer> {
        let host = self
            .host
            .ok_or_else(|| SeedbedError::configuration("ManagedServer requires a host"))?;
        let port = self
            .port
            .ok_or_else(|| SeedbedError::configuration("ManagedServer requires a port"))?;
        let command = self
            .command
            .ok_or_else(|| SeedbedError::configuration("ManagedServer requires a command"))?;
        let probe = self
            .probe
            .unwrap_or_else(|| ManagedServer::tcp_probe(host.clone(), port));

        Ok(ManagedServer {
            host,
            port,
            command,
            policy: self.policy,
            probe,
            handle: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedbed_core::ConnectionKey;
    use std::time::Duration;

    #[test]
    fn test_builder_requires_host_port_command() {
        let err = ManagedServer::builder().build().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("host"));

        let err = ManagedServer::builder()
            .host("127.0.0.1")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("port"));

        let err = ManagedServer::builder()
            .host("127.0.0.1")
            .port(6379)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("command"));
    }

    #[test]
    fn test_built_server_exposes_key() {
        let server = ManagedServer::builder()
            .host("127.0.0.1")
            .port(6379)
            .command(ManagedCommand::new("redis-server"))
            .build()
            .unwrap();
        assert_eq!(
            server.connection_key(),
            ConnectionKey::new("127.0.0.1", 6379)
        );
    }

    #[test]
    fn test_start_failure_is_startup_error() {
        let mut server = ManagedServer::builder()
            .host("127.0.0.1")
            .port(6379)
            .command(ManagedCommand::new("seedbed-no-such-binary"))
            .build()
            .unwrap();

        let err = server.do_start().unwrap_err();
        assert!(err.is_startup());
        assert!(err.to_string().contains("127.0.0.1:6379"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreachable_probe_times_out_and_kills_process() {
        let mut server = ManagedServer::builder()
            .host("127.0.0.1")
            .port(1)
            .command(ManagedCommand::new("/bin/sh").arg("-c").arg("sleep 30"))
            .startup_policy(StartupPolicy::new(2, Duration::from_millis(1)))
            .readiness_probe(|| false)
            .build()
            .unwrap();

        let err = server.do_start().unwrap_err();
        assert!(matches!(
            err,
            SeedbedError::StartupTimeout { attempts: 2, .. }
        ));
        // The spawned process was stopped; nothing is retained.
        assert!(server.process().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_start_then_stop_round_trip() {
        let mut server = ManagedServer::builder()
            .host("127.0.0.1")
            .port(1)
            .command(ManagedCommand::new("/bin/sh").arg("-c").arg("sleep 30"))
            .startup_policy(StartupPolicy::new(1, Duration::ZERO))
            .readiness_probe(|| true)
            .build()
            .unwrap();

        server.do_start().unwrap();
        assert!(server.process().unwrap().is_running());
        server.do_stop().unwrap();
        assert!(server.process().is_none());

        // Stop is idempotent.
        server.do_stop().unwrap();
    }
}
