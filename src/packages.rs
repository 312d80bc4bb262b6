//! NuGet package installation through `dotnet add package`
//!
//! Installing a package is best effort. Every failure mode becomes a
//! [`PackageOutcome`] the caller reports as a warning, along with the command the
//! user can run by hand.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A package id with optional `dotnet add package` flags, e.g.
/// `Microsoft.DotNet.ILCompiler --prerelease`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageSpec {
    pub id: String,
    pub flags: Vec<String>,
}

impl PackageSpec {
    pub fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.split_whitespace().map(str::to_string);
        let id = parts.next()?;
        Some(Self {
            id,
            flags: parts.collect(),
        })
    }

    /// Command line the user can run when automatic installation fails.
    pub fn manual_command(&self) -> String {
        let mut command = format!("dotnet add package {}", self.id);
        for flag in &self.flags {
            command.push(' ');
            command.push_str(flag);
        }
        command
    }
}

impl std::fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)?;
        for flag in &self.flags {
            write!(f, " {flag}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackageOutcome {
    Installed,
    /// The command exited with a non-zero status or could not be started
    Failed { reason: String },
    TimedOut { after: Duration },
}

impl PackageOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed)
    }
}

pub trait PackageInstaller {
    fn add_package(&self, descriptor: &Path, package: &PackageSpec) -> PackageOutcome;
}

/// Installs packages with the `dotnet` CLI found on `PATH`.
#[derive(Clone, Debug)]
pub struct DotnetCli {
    program: Option<PathBuf>,
    timeout: Duration,
}

impl DotnetCli {
    pub fn new(timeout: Duration) -> Self {
        let program = match which::which("dotnet") {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("dotnet not found in PATH: {e}");
                None
            }
        };
        Self { program, timeout }
    }

    /// Use an explicit executable instead of searching `PATH`.
    pub fn with_program(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: Some(program.into()),
            timeout,
        }
    }

    fn command(&self, program: &Path, descriptor: &Path, package: &PackageSpec) -> Command {
        let mut command = Command::new(program);
        command
            .arg("add")
            .arg(descriptor)
            .arg("package")
            .arg(&package.id)
            .args(&package.flags)
            .stdin(Stdio::null());
        command
    }
}

impl PackageInstaller for DotnetCli {
    fn add_package(&self, descriptor: &Path, package: &PackageSpec) -> PackageOutcome {
        let Some(program) = &self.program else {
            return PackageOutcome::Failed {
                reason: "dotnet was not found in PATH".into(),
            };
        };
        debug!("Running {} add {} package {package}", program.display(), descriptor.display());

        let child = match self.command(program, descriptor, package).spawn() {
            Ok(child) => child,
            Err(e) => {
                return PackageOutcome::Failed {
                    reason: format!("failed to start {}: {e}", program.display()),
                }
            }
        };

        match wait_with_timeout(child, self.timeout) {
            Ok(Some(status)) if status.success() => PackageOutcome::Installed,
            Ok(Some(status)) => PackageOutcome::Failed {
                reason: format!("dotnet exited with {status}"),
            },
            Ok(None) => PackageOutcome::TimedOut {
                after: self.timeout,
            },
            Err(e) => PackageOutcome::Failed {
                reason: format!("failed waiting for dotnet: {e}"),
            },
        }
    }
}

/// Wait for `child` up to `timeout`. A child still running at the deadline is
/// killed and `None` is returned.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            if let Err(e) = child.kill() {
                warn!("Failed to kill timed out process: {e}");
            }
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
