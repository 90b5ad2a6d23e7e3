// src/exec/host.rs

//! Script-host abstraction.
//!
//! The runner in [`super::host_runner`] talks to a [`ScriptHost`] instead of
//! invoking the system host directly. This makes it easy to swap in a fake
//! host in tests while keeping the production front end here.
//!
//! - [`OsascriptHost`] is the default implementation: it shells out to the
//!   platform's `osascript` front end and runs the source synchronously.
//! - Tests provide their own `ScriptHost` that records invocations and
//!   returns scripted results.

use std::fmt;

/// Error reported by a script host invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    /// Human-readable message from the host.
    pub message: String,
    /// Numeric code, when the host reported one.
    pub code: Option<i32>,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} [code: {}]", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

/// A synchronous script interpreter.
///
/// Implementations run one source string to completion and either return the
/// host's textual result (`None` when the script produced no value) or a
/// [`HostError`]. Callers must not assume `run` is safe to enter
/// concurrently; serialization is the runner's job.
pub trait ScriptHost: Send + Sync {
    fn run(&self, source: &str) -> Result<Option<String>, HostError>;
}

const OSASCRIPT: &str = "/usr/bin/osascript";

/// Production host: the system `osascript` front end.
#[derive(Debug, Default)]
pub struct OsascriptHost;

impl ScriptHost for OsascriptHost {
    fn run(&self, source: &str) -> Result<Option<String>, HostError> {
        let output = std::process::Command::new(OSASCRIPT)
            .arg("-e")
            .arg(source)
            .output()
            .map_err(|e| HostError {
                message: e.to_string(),
                code: None,
            })?;

        if output.status.success() {
            let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Ok((!text.is_empty()).then_some(text))
        } else {
            Err(HostError {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                code: output.status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_display_appends_code_when_present() {
        let err = HostError {
            message: "execution error".to_string(),
            code: Some(1),
        };
        assert_eq!(err.to_string(), "execution error [code: 1]");

        let bare = HostError {
            message: "execution error".to_string(),
            code: None,
        };
        assert_eq!(bare.to_string(), "execution error");
    }
}
