//! Backend abstraction for gh invocations.
//!
//! The [`Backend`] trait is the single seam between the typed client and the
//! `gh` process, allowing for different implementations (real CLI, scripted
//! responses for testing).

pub mod gh;

use crate::error::Result;

/// Raw result of one gh invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// A successful invocation that printed `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed invocation that printed `stderr`.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Backend trait for running gh.
///
/// Arguments are passed as a discrete argv, never through a shell. An
/// implementation returns `Err` only when the process could not be run to
/// completion (missing binary, timeout, I/O failure); a non-zero exit is an
/// `Ok` output with `success == false`.
pub trait Backend: Send + Sync {
    /// Run gh with `args`, feeding `stdin` to the process when given.
    fn run(&self, args: &[String], stdin: Option<&[u8]>) -> Result<CommandOutput>;
}
