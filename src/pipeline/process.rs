//! External process invocation as a capability.
//!
//! The rasterizer, the assembler and the recognition model are all separate
//! programs. Routing every invocation through [`ProcessRunner`] lets tests
//! substitute a fake that writes files or records arguments, and keeps the
//! soft-failure policy in one place: a non-zero exit is *data*
//! ([`ProcessResult::success`] is `false`), not an error. Only a program that
//! cannot be started at all surfaces as an `Err`.
//!
//! Invocations block until the child exits. There is no timeout.

use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::process::Command;
use tracing::debug;

/// Outcome of one external program run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    pub program: String,
    /// Exit code; `None` when the child was killed by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    /// A successful result with the given stdout. Handy for fakes.
    pub fn ok(program: impl Into<String>, stdout: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            exit_code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed result with the given exit code and stderr.
    pub fn failed(program: impl Into<String>, exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            exit_code: Some(exit_code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// stdout followed by stderr, as one log-friendly block.
    pub fn combined_output(&self) -> String {
        match (self.stdout.trim_end(), self.stderr.trim_end()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

/// Runs an external program to completion and captures its output.
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args`.
    ///
    /// Returns `Err` only when the program could not be started.
    fn run(&self, program: &str, args: &[OsString]) -> std::io::Result<ProcessResult>;
}

/// [`ProcessRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &str, args: &[OsString]) -> std::io::Result<ProcessResult> {
        debug!("exec: {} {}", program, display_args(args));
        let output = Command::new(program).args(args).output()?;

        Ok(ProcessResult {
            program: program.to_string(),
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Render an argument list for log lines.
pub(crate) fn display_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build an owned argument list from anything path- or string-like.
pub(crate) fn os_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter().map(|a| a.as_ref().to_os_string()).collect()
}
