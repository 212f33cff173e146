//! External process invocation.
//! Package managers and lint binaries are run through [`ProcessGateway`]
//! so the pipeline never spawns processes directly.

use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// Number of trailing stderr lines kept in a failure reason.
const STDERR_TAIL_LINES: usize = 5;

pub trait ProcessGateway {
    /// Runs `program` with `args` in `cwd` and waits for it to exit.
    ///
    /// # Errors
    /// * `Error::ProcessFailure` if the process cannot start or exits unsuccessfully
    fn spawn(&self, program: &str, args: &[&str], cwd: &Path) -> Result<()>;
}

/// Gateway spawning real processes with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGateway;

impl SystemGateway {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessGateway for SystemGateway {
    fn spawn(&self, program: &str, args: &[&str], cwd: &Path) -> Result<()> {
        let command = display_command(program, args);
        debug!("Running '{}' in {}", command, cwd.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::ProcessFailure {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{}", stdout.trim_end());
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            let reason = if tail.is_empty() {
                format!("exited with {}", output.status)
            } else {
                format!("exited with {}: {}", output.status, tail)
            };
            return Err(Error::ProcessFailure { command, reason });
        }

        Ok(())
    }
}

pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" ")
}
