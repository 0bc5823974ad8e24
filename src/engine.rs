#![allow(clippy::module_name_repetitions)]
//! Delegate engine discovery and invocation.
//!
//! Every build/list/push/remove/run operation is a blocking call into the
//! engine binary. The binary is taken from AUTODOCK_ENGINE when set, else
//! looked up on PATH; elevation runs through sudo (AUTODOCK_SUDO overrides
//! the program, an empty value disables elevation).

use std::env;
use std::io;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use anyhow::{anyhow, Context};
use wait_timeout::ChildExt;
use which::which;

use crate::dispatch::needs_elevation;
use crate::errors::WorkflowError;
use crate::identity::{parse_username, IdentityProvider};

/// Timeout for quiet engine queries (`info`, `image ls`).
const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

enum Elevation {
    /// Explicitly disabled via AUTODOCK_SUDO="".
    Disabled,
    Program(PathBuf),
    /// Would be needed, but nothing suitable was found on PATH.
    Missing,
}

pub struct EngineClient {
    program: PathBuf,
    elevation: Elevation,
    euid_is_root: bool,
}

impl EngineClient {
    /// Resolve the delegate binary from AUTODOCK_ENGINE or a PATH lookup of
    /// `docker`, and the elevation program from AUTODOCK_SUDO or PATH.
    pub fn from_env() -> io::Result<Self> {
        let program = match env::var("AUTODOCK_ENGINE") {
            Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
            _ => which("docker").map_err(|_| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "docker is required but was not found in PATH; set AUTODOCK_ENGINE to override",
                )
            })?,
        };
        let elevation = match env::var("AUTODOCK_SUDO") {
            Ok(v) if v.trim().is_empty() => Elevation::Disabled,
            Ok(v) => Elevation::Program(PathBuf::from(v.trim())),
            Err(_) => match which("sudo") {
                Ok(p) => Elevation::Program(p),
                Err(_) => Elevation::Missing,
            },
        };
        Ok(Self {
            program,
            elevation,
            euid_is_root: euid_is_root(),
        })
    }

    /// Forward a full command line verbatim to the engine and report its exit
    /// status. Used for every subcommand autodock does not override.
    pub fn forward(&self, argv: &[String]) -> Result<ExitStatus, WorkflowError> {
        let mut cmd = self.command(argv)?;
        cmd.status().map_err(WorkflowError::Io)
    }

    /// Run a mutating engine sub-operation (build, push, rm, run) with
    /// inherited stdio; a non-success status becomes a delegated failure.
    pub fn run_streaming(&self, action: &'static str, args: &[String]) -> Result<(), WorkflowError> {
        let mut cmd = self.command(args)?;
        let status = cmd.status().map_err(WorkflowError::Io)?;
        if status.success() {
            Ok(())
        } else {
            Err(WorkflowError::Engine {
                action,
                status: status.code(),
            })
        }
    }

    /// Run a quiet engine query, capturing stdout. Failure output is folded
    /// into the error so a misbehaving daemon stays diagnosable.
    pub fn capture(&self, args: &[String]) -> Result<String, WorkflowError> {
        let mut cmd = self.command(args)?;
        capture_with_timeout(&mut cmd, QUERY_TIMEOUT).map_err(WorkflowError::Query)
    }

    fn command(&self, args: &[String]) -> Result<Command, WorkflowError> {
        let elevate = needs_elevation(args, self.euid_is_root);
        match (&self.elevation, elevate) {
            (_, false) | (Elevation::Disabled, true) => {
                let mut cmd = Command::new(&self.program);
                cmd.args(args);
                Ok(cmd)
            }
            (Elevation::Program(sudo), true) => {
                let mut cmd = Command::new(sudo);
                cmd.arg(&self.program);
                cmd.args(args);
                Ok(cmd)
            }
            (Elevation::Missing, true) => Err(WorkflowError::Privilege(
                "privilege elevation required but sudo was not found in PATH; \
                 set AUTODOCK_SUDO to override or run as root"
                    .to_string(),
            )),
        }
    }
}

impl IdentityProvider for EngineClient {
    fn current_username(&self) -> Result<Option<String>, WorkflowError> {
        let info = self.capture(&["info".to_string()])?;
        Ok(parse_username(&info))
    }
}

fn capture_with_timeout(cmd: &mut Command, timeout: Duration) -> anyhow::Result<String> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {:?}", cmd.get_program()))?;
    let status = match child
        .wait_timeout(timeout)
        .context("failed to wait for engine query")?
    {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(anyhow!("engine query timed out after {}s", timeout.as_secs()));
        }
    };
    let mut stdout = String::new();
    if let Some(mut out) = child.stdout.take() {
        out.read_to_string(&mut stdout)
            .context("failed to read engine query output")?;
    }
    if !status.success() {
        let mut stderr = String::new();
        if let Some(mut err) = child.stderr.take() {
            let _ = err.read_to_string(&mut stderr);
        }
        return Err(anyhow!(
            "engine query failed with status {}: {}",
            status.code().unwrap_or(-1),
            stderr.trim()
        ));
    }
    Ok(stdout)
}

#[cfg(unix)]
fn euid_is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

// Elevation has no meaning off unix; behave as already privileged.
#[cfg(not(unix))]
fn euid_is_root() -> bool {
    true
}
