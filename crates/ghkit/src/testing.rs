//! Scripted backend for tests.
//!
//! Available to this crate's unit tests and, with the `testing` feature, to
//! dependent crates that drive a [`Client`] without a real gh binary.

use crate::Client;
use crate::backend::{Backend, CommandOutput};
use crate::error::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Shared log of the calls a [`Scripted`] backend received.
pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// Invocation recorded by [`Scripted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Arguments passed to gh
    pub args: Vec<String>,
    /// Input written to gh's stdin, if any
    pub stdin: Option<String>,
}

impl Call {
    /// Subcommand words before the first flag, e.g. `issue create`.
    pub fn command(&self) -> String {
        self.args
            .iter()
            .take_while(|a| !a.starts_with('-'))
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Backend replaying canned outputs in order.
///
/// Panics on a call with no output left, naming its arguments.
#[derive(Default)]
pub struct Scripted {
    responses: Mutex<VecDeque<CommandOutput>>,
    calls: CallLog,
}

impl Scripted {
    /// Backend answering calls with `responses`, first to last.
    pub fn new(responses: Vec<CommandOutput>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: CallLog::default(),
        }
    }

    /// Handle on the call log that outlives the backend.
    pub fn calls_handle(&self) -> CallLog {
        self.calls.clone()
    }

    /// Client over a scripted backend, plus a handle on its call log.
    pub fn client(responses: Vec<CommandOutput>) -> (Client, CallLog) {
        let backend = Self::new(responses);
        let calls = backend.calls_handle();
        (Client::with_backend(Box::new(backend)), calls)
    }
}

impl Backend for Scripted {
    fn run(&self, args: &[String], stdin: Option<&[u8]>) -> Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Call {
                args: args.to_vec(),
                stdin: stdin.map(|s| String::from_utf8_lossy(s).into_owned()),
            });
        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(next.unwrap_or_else(|| panic!("unexpected gh call: {args:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_command_stops_at_first_flag() {
        let call = Call {
            args: vec!["issue".into(), "list".into(), "--repo".into(), "o/r".into()],
            stdin: None,
        };
        assert_eq!(call.command(), "issue list");

        let api = Call {
            args: vec!["api".into(), "--method".into(), "POST".into()],
            stdin: None,
        };
        assert_eq!(api.command(), "api");
    }

    #[test]
    fn test_client_records_calls_in_order() {
        let (client, calls) = Scripted::client(vec![
            CommandOutput::ok("gh version 2.45.0 (2024-03-04)\n"),
            CommandOutput::ok("gh version 2.46.0 (2024-03-20)\n"),
        ]);
        client.gh_version().unwrap();
        client.gh_version().unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].args, vec!["--version".to_string()]);
        assert_eq!(calls[1].stdin, None);
    }

    #[test]
    #[should_panic(expected = "unexpected gh call")]
    fn test_exhausted_script_panics() {
        let (client, _calls) = Scripted::client(Vec::new());
        let _ = client.viewer();
    }
}
