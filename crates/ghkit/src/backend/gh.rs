//! Real gh CLI backend.

use crate::backend::{Backend, CommandOutput};
use crate::error::{Error, Result};
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default deadline for a single gh invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend that executes the real `gh` binary.
pub struct GhBackend {
    /// Path to the gh executable
    gh_path: String,
    /// Deadline applied to every invocation
    timeout: Duration,
}

impl GhBackend {
    /// Create a backend running `gh_path` with the given per-call deadline.
    pub fn new(gh_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            gh_path: gh_path.into(),
            timeout,
        }
    }

    /// Configured per-call deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for GhBackend {
    fn default() -> Self {
        Self::new("gh", DEFAULT_TIMEOUT)
    }
}

impl Backend for GhBackend {
    fn run(&self, args: &[String], stdin: Option<&[u8]>) -> Result<CommandOutput> {
        let command = describe(args);
        log::debug!("running gh {command}");

        let mut child = Command::new(&self.gh_path)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::GhNotFound
                } else {
                    Error::CommandFailed {
                        message: format!("failed to execute {}: {e}", self.gh_path),
                        stderr: String::new(),
                    }
                }
            })?;

        // Drain both pipes on their own threads so a chatty child can never
        // block on a full pipe while we wait on it.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        // A child that exits without reading its input closes the pipe; its
        // exit status and stderr still say what went wrong.
        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            match pipe.write_all(input) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    log::debug!("gh {command} closed stdin early");
                }
                Err(e) => {
                    child.kill().ok();
                    child.wait().ok();
                    return Err(e.into());
                }
            }
        }

        let Some(status) = child.wait_timeout(self.timeout)? else {
            log::warn!(
                "gh {command} exceeded {}s, killing it",
                self.timeout.as_secs()
            );
            child.kill().ok();
            child.wait().ok();
            return Err(Error::Timeout {
                command,
                seconds: self.timeout.as_secs(),
            });
        };

        let stdout = join(stdout)?;
        let stderr = join(stderr)?;
        log::trace!("gh {command} exited with {status}");

        Ok(CommandOutput {
            success: status.success(),
            stdout,
            stderr,
        })
    }
}

/// Short human description of an invocation for logs and timeout errors.
///
/// Only the leading subcommand words are kept; field values may be long.
fn describe(args: &[String]) -> String {
    args.iter()
        .take_while(|a| !a.starts_with('-'))
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<std::io::Result<String>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

fn join(handle: JoinHandle<std::io::Result<String>>) -> Result<String> {
    handle
        .join()
        .map_err(|_| Error::Other("output reader thread panicked".to_string()))?
        .map_err(Error::from)
}
