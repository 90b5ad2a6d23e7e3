// src/exec/engine.rs

//! The execution engine: one dispatch point for every command mode.

use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use crate::command::ScriptCommand;
use crate::errors::{ScriptError, ScriptResult};
use crate::types::Mode;

use super::host::{OsascriptHost, ScriptHost};
use super::host_runner::HostRunner;
use super::process::ProcessRunner;
use super::stream::{OutputBroadcaster, OutputChunk};

/// Routes each command to the executor for its mode and unifies the result.
///
/// Construct one engine at startup and share it by cloning: clones are
/// cheap and all of them share the same host lock, in-flight registry and
/// output stream, preserving the "one interpreter lock, one registry"
/// invariant without hidden global state.
#[derive(Clone)]
pub struct Engine {
    host: HostRunner,
    process: ProcessRunner,
    broadcaster: OutputBroadcaster,
}

impl Engine {
    /// Engine backed by the system script host.
    pub fn new() -> Self {
        Self::with_host(Arc::new(OsascriptHost))
    }

    /// Engine backed by a custom [`ScriptHost`] (tests use recording fakes).
    pub fn with_host(host: Arc<dyn ScriptHost>) -> Self {
        let broadcaster = OutputBroadcaster::new();
        Self {
            host: HostRunner::new(host),
            process: ProcessRunner::new(broadcaster.clone()),
            broadcaster,
        }
    }

    /// Execute a command with the strategy matching its mode.
    ///
    /// Blocks (asynchronously) until the child process exits or the host
    /// call returns; never call it from inside a stream subscriber that the
    /// same command is feeding.
    pub async fn execute(&self, command: &ScriptCommand) -> ScriptResult<Option<String>> {
        match command.mode() {
            Mode::Host { .. } => self.host.execute(command).await,
            Mode::Process { .. } => self.process.execute(command).await,
            Mode::Unknown => {
                debug!(command = %command.command_line(), "no executor for mode");
                Err(ScriptError::UnsupportedMode)
            }
        }
    }

    /// Request cancellation from every executor, regardless of which ones
    /// currently have in-flight work. Best-effort: processes receive a
    /// non-fatal interrupt, host calls are not preemptible.
    pub fn interrupt(&self) {
        self.host.interrupt();
        self.process.interrupt();
    }

    /// Subscribe to partial output from all in-flight process-mode
    /// commands, independent of `execute`'s return values.
    pub fn subscribe(&self) -> broadcast::Receiver<OutputChunk> {
        self.broadcaster.subscribe()
    }

    /// Number of process-mode commands currently in flight.
    pub fn in_flight_processes(&self) -> usize {
        self.process.in_flight()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("in_flight_processes", &self.in_flight_processes())
            .finish_non_exhaustive()
    }
}
