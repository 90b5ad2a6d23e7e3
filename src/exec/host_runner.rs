// src/exec/host_runner.rs

//! Host-mode execution, serialized process-wide.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::command::ScriptCommand;
use crate::errors::{InvalidReason, ScriptError, ScriptResult, UNKNOWN_ERROR};

use super::host::{HostError, ScriptHost};

/// The host reports a clean non-zero exit of the hosted shell command with
/// this message even though, from the process's point of view, nothing went
/// wrong. Matched as a substring to survive the host's prefix decoration.
const NON_ZERO_EXIT_MESSAGE: &str = "The command exited with a non-zero status.";

/// Runs host-mode commands one at a time.
///
/// The underlying host is not reentrant; every call takes the runner's lock
/// and holds it for the full synchronous host invocation, so no two
/// host-mode commands ever overlap — even across engine clones.
#[derive(Clone)]
pub struct HostRunner {
    host: Arc<dyn ScriptHost>,
    lock: Arc<Mutex<()>>,
}

impl HostRunner {
    pub(crate) fn new(host: Arc<dyn ScriptHost>) -> Self {
        Self {
            host,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn execute(&self, command: &ScriptCommand) -> ScriptResult<Option<String>> {
        if command.path().is_none_or(str::is_empty) {
            return Err(InvalidReason::PathEmpty.into());
        }

        let source = command.host_source();
        debug!(source = %source, "invoking script host");

        let guard = self.lock.lock().await;
        let host = Arc::clone(&self.host);
        let run_source = source.clone();
        let outcome = tokio::task::spawn_blocking(move || host.run(&run_source))
            .await
            .map_err(|e| ScriptError::ExecuteFailed {
                command_line: source.clone(),
                reason: e.to_string(),
            });
        drop(guard);

        match outcome? {
            Ok(value) => Ok(value),
            // A clean non-zero exit with no output; consistent with how
            // process mode treats "no output" rather than a failure.
            Err(err) if err.message.contains(NON_ZERO_EXIT_MESSAGE) => {
                debug!(source = %source, "host reported clean non-zero exit");
                Ok(None)
            }
            Err(err) => Err(ScriptError::ExecuteFailed {
                command_line: source,
                reason: failure_reason(err),
            }),
        }
    }

    /// Host invocations are synchronous and cannot be preempted once
    /// started; an interrupt request is acknowledged and dropped.
    pub fn interrupt(&self) {
        warn!("interrupt requested; in-flight host calls are not preemptible");
    }
}

fn failure_reason(err: HostError) -> String {
    let base = if err.message.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        err.message
    };
    match err.code {
        Some(code) => format!("{base} [code: {code}]"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_reason_falls_back_to_placeholder() {
        let reason = failure_reason(HostError {
            message: String::new(),
            code: Some(-128),
        });
        assert_eq!(reason, "unknown error [code: -128]");
    }

    #[test]
    fn failure_reason_keeps_message_without_code() {
        let reason = failure_reason(HostError {
            message: "syntax error".to_string(),
            code: None,
        });
        assert_eq!(reason, "syntax error");
    }
}
