//! External-process supervision for managed backends
//!
//! Managed backends run as child OS processes. This module owns the three
//! primitives the lifecycle layer needs: spawning with a resolved
//! executable name, draining child stdout, and idempotent best-effort
//! termination. Readiness is the caller's notion (usually a client
//! connection attempt); [`StartupPolicy`] bounds how long it is polled.

use seedbed_core::{ConnectionKey, SeedbedError, SeedbedResult};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of readiness attempts before giving up
pub const DEFAULT_STARTUP_ATTEMPTS: u32 = 10;

/// Default delay between readiness attempts
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_millis(500);

/// Operating system family used to resolve executable names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    /// POSIX systems: executables have no suffix
    Unix,
    /// Windows: executables carry the `.exe` suffix
    Windows,
}

impl OsFamily {
    /// The family this process runs on
    pub fn current() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }

    /// Pure mapping from OS family to executable suffix
    pub fn executable_suffix(self) -> &'static str {
        match self {
            OsFamily::Unix => "",
            OsFamily::Windows => ".exe",
        }
    }
}

/// Working directory and argument vector for one managed server binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedCommand {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ManagedCommand {
    /// Create a command for `program` (without OS suffix)
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the child's working directory
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Program name with the current OS family's executable suffix
    pub fn resolved_program(&self) -> String {
        self.resolved_program_for(OsFamily::current())
    }

    /// Program name with the given family's executable suffix
    pub fn resolved_program_for(&self, family: OsFamily) -> String {
        format!("{}{}", self.program, family.executable_suffix())
    }

    /// Declared argument vector
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Declared working directory, if any
    pub fn directory(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}

/// Handle to a spawned managed process
///
/// Dropping the handle does not terminate the child; call
/// [`ProcessSupervisor::stop`].
#[derive(Debug)]
pub struct ProcessHandle {
    child: Option<Child>,
}

impl ProcessHandle {
    /// OS process id, while the child has not been reaped
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Whether the child is still running
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Lines of the child's stdout
    ///
    /// The stream can be taken once; subsequent calls return `None`.
    pub fn stdout_lines(&mut self) -> Option<io::Lines<BufReader<ChildStdout>>> {
        let stdout = self.child.as_mut()?.stdout.take()?;
        Some(BufReader::new(stdout).lines())
    }
}

/// Spawns and terminates managed server processes
pub struct ProcessSupervisor;

impl ProcessSupervisor {
    /// Launch the command with piped stdout
    ///
    /// # Errors
    ///
    /// Returns the spawn failure as an I/O error; callers map it to a
    /// startup error carrying the connection key.
    pub fn start(command: &ManagedCommand) -> SeedbedResult<ProcessHandle> {
        let program = command.resolved_program();
        let mut cmd = Command::new(&program);
        cmd.args(command.arguments())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if let Some(dir) = command.directory() {
            cmd.current_dir(dir);
        }
        let child = cmd.spawn()?;
        debug!(%program, pid = child.id(), "spawned managed process");
        Ok(ProcessHandle { child: Some(child) })
    }

    /// Terminate the child, best effort
    ///
    /// Idempotent: stopping an already-stopped or consumed handle is a
    /// no-op. Kill and reap failures are logged, never returned.
    pub fn stop(handle: &mut ProcessHandle) {
        let Some(mut child) = handle.child.take() else {
            return;
        };
        let pid = child.id();
        if let Err(err) = child.kill() {
            debug!(pid, error = %err, "managed process already exited");
        }
        match child.wait() {
            Ok(status) => debug!(pid, %status, "managed process stopped"),
            Err(err) => warn!(pid, error = %err, "failed to reap managed process"),
        }
    }
}

/// Bounded fixed-delay readiness polling
///
/// Exhausting the budget is a fatal startup timeout; there is no
/// user-facing override beyond these two knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupPolicy {
    /// Number of probe attempts before giving up
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for StartupPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_STARTUP_ATTEMPTS,
            delay: DEFAULT_STARTUP_DELAY,
        }
    }
}

impl StartupPolicy {
    /// Create a policy with the given budget
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Poll `probe` until it reports readiness or the budget is spent
    ///
    /// # Errors
    ///
    /// Returns [`SeedbedError::StartupTimeout`] after `max_attempts`
    /// failed probes.
    pub fn wait_until_ready<F>(&self, key: &ConnectionKey, mut probe: F) -> SeedbedResult<()>
    where
        F: FnMut() -> bool,
    {
        for attempt in 1..=self.max_attempts {
            if probe() {
                debug!(%key, attempt, "backend reachable");
                return Ok(());
            }
            if attempt < self.max_attempts {
                thread::sleep(self.delay);
            }
        }
        Err(SeedbedError::StartupTimeout {
            key: key.clone(),
            attempts: self.max_attempts,
        })
    }
}
