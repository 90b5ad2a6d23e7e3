// src/exec/process.rs

//! Process-mode execution: spawn, pipe wiring, lifecycle and interrupt.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::command::ScriptCommand;
use crate::errors::{InvalidReason, ScriptError, ScriptResult, UNKNOWN_ERROR};
use crate::types::Mode;

use super::stream::{ChunkKind, OutputBroadcaster, OutputChunk};

const READ_BUFFER_SIZE: usize = 4096;

/// Bookkeeping for one in-flight child process.
///
/// Entries are inserted at spawn and removed only after the exit status has
/// been observed and the pipe readers have drained — never by `interrupt()`.
struct ProcessEntry {
    pid: Option<u32>,
    command_line: String,
    suppress_output: bool,
    stdout: Arc<Mutex<String>>,
    stderr: Arc<Mutex<String>>,
}

/// Spawns and supervises process-mode commands.
///
/// Supports any number of concurrent in-flight processes; the registry
/// mutex is the only state shared between them.
#[derive(Clone)]
pub struct ProcessRunner {
    registry: Arc<Mutex<HashMap<u64, ProcessEntry>>>,
    next_id: Arc<AtomicU64>,
    broadcaster: OutputBroadcaster,
}

impl ProcessRunner {
    pub(crate) fn new(broadcaster: OutputBroadcaster) -> Self {
        Self {
            registry: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
            broadcaster,
        }
    }

    /// Run a process-mode command to completion.
    ///
    /// This resolves only once the child has exited and both output pipes
    /// have drained; it is the engine's one designed blocking point.
    pub async fn execute(&self, command: &ScriptCommand) -> ScriptResult<Option<String>> {
        let Mode::Process {
            suppress_output,
            environment,
            input_file,
        } = command.mode()
        else {
            return Err(ScriptError::UnsupportedMode);
        };

        let path = validate_path(command)?;
        let command_line = command.command_line();
        let input = input_file.as_deref().and_then(read_input_file);

        let mut cmd = Command::new(path);
        cmd.args(command.args())
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // An explicit environment replaces the inherited one entirely;
        // without one the child sees the caller's environment unchanged.
        if let Some(env) = environment {
            cmd.env_clear().envs(env);
        }

        info!(command = %command_line, "spawning process");
        let mut child = cmd.spawn().map_err(|e| ScriptError::ExecuteFailed {
            command_line: command_line.clone(),
            reason: e.to_string(),
        })?;

        let entry = ProcessEntry {
            pid: child.id(),
            command_line: command_line.clone(),
            suppress_output: *suppress_output,
            stdout: Arc::new(Mutex::new(String::new())),
            stderr: Arc::new(Mutex::new(String::new())),
        };
        let stdout_buf = Arc::clone(&entry.stdout);
        let stderr_buf = Arc::clone(&entry.stderr);
        let suppress = entry.suppress_output;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.register(id, entry);

        if let (Some(bytes), Some(mut stdin)) = (input, child.stdin.take()) {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&bytes).await {
                    debug!(error = %e, "stdin write ended early");
                }
            });
        }

        let stdout_task = child.stdout.take().map(|pipe| {
            self.spawn_reader(
                pipe,
                ChunkKind::Stdout,
                command_line.clone(),
                Arc::clone(&stdout_buf),
                suppress,
            )
        });
        let stderr_task = child.stderr.take().map(|pipe| {
            self.spawn_reader(
                pipe,
                ChunkKind::Stderr,
                command_line.clone(),
                Arc::clone(&stderr_buf),
                suppress,
            )
        });

        let status = child.wait().await;

        // The readers run to EOF once the child closes its pipes; join them
        // so the buffers are complete before the result is assembled.
        if let Some(task) = stdout_task {
            let _ = task.await;
        }
        if let Some(task) = stderr_task {
            let _ = task.await;
        }
        self.remove(id);

        let status = status.map_err(|e| ScriptError::ExecuteFailed {
            command_line: command_line.clone(),
            reason: e.to_string(),
        })?;

        let (code, termination) = exit_parts(&status);
        debug!(command = %command_line, code, termination, "process exited");

        if status.success() {
            if suppress {
                return Ok(None);
            }
            let output = lock_buffer(&stdout_buf).clone();
            Ok((!output.is_empty()).then_some(output))
        } else {
            let captured = lock_buffer(&stderr_buf).clone();
            let base = if captured.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                captured
            };
            Err(ScriptError::ExecuteFailed {
                command_line,
                reason: format!("{base} [code: {code}] [reason: {termination}]"),
            })
        }
    }

    /// Send a non-fatal interrupt to every in-flight process.
    ///
    /// Does not wait for the processes to exit and does not remove them from
    /// the registry; a process that ignores the signal keeps running.
    pub fn interrupt(&self) {
        let registry = self.registry.lock().expect("registry lock poisoned");
        info!(in_flight = registry.len(), "interrupting processes");
        for entry in registry.values() {
            match entry.pid {
                Some(pid) => send_interrupt(pid, &entry.command_line),
                None => debug!(command = %entry.command_line, "process has no pid; skipping"),
            }
        }
    }

    /// Number of processes currently tracked in the in-flight registry.
    pub fn in_flight(&self) -> usize {
        self.registry.lock().expect("registry lock poisoned").len()
    }

    fn register(&self, id: u64, entry: ProcessEntry) {
        self.registry
            .lock()
            .expect("registry lock poisoned")
            .insert(id, entry);
    }

    fn remove(&self, id: u64) {
        self.registry
            .lock()
            .expect("registry lock poisoned")
            .remove(&id);
    }

    fn spawn_reader<R>(
        &self,
        mut pipe: R,
        kind: ChunkKind,
        command_line: String,
        buffer: Arc<Mutex<String>>,
        suppress_output: bool,
    ) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let broadcaster = self.broadcaster.clone();
        tokio::spawn(async move {
            let mut buf = [0u8; READ_BUFFER_SIZE];
            loop {
                match pipe.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        let text = String::from_utf8_lossy(&buf[..n]).into_owned();
                        if text.is_empty() {
                            continue;
                        }
                        // Every chunk reaches the stream, buffered or not.
                        broadcaster.publish(OutputChunk {
                            command_line: command_line.clone(),
                            kind,
                            text: text.clone(),
                        });
                        if !suppress_output {
                            lock_buffer(&buffer).push_str(text.trim());
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, ?kind, "pipe read ended");
                        break;
                    }
                }
            }
        })
    }
}

/// Path preconditions, checked fresh on every call: non-empty, existing,
/// not a directory, executable.
fn validate_path(command: &ScriptCommand) -> ScriptResult<&str> {
    let path = match command.path() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(InvalidReason::PathEmpty.into()),
    };

    let meta = std::fs::metadata(path)
        .map_err(|_| InvalidReason::PathNotExistOrIsDirectory(path.into()))?;
    if meta.is_dir() {
        return Err(InvalidReason::PathNotExistOrIsDirectory(path.into()).into());
    }
    if !is_executable(&meta) {
        return Err(InvalidReason::PathPermissionDenied(path.into()).into());
    }

    Ok(path)
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}

/// Read the stdin payload once at spawn time; empty or unreadable files are
/// treated as "no input".
fn read_input_file(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "input file not readable; ignoring");
            None
        }
    }
}

/// Exit code and termination kind for the failure reason suffix.
#[cfg(unix)]
fn exit_parts(status: &std::process::ExitStatus) -> (i32, &'static str) {
    use std::os::unix::process::ExitStatusExt;
    match status.code() {
        Some(code) => (code, "exited"),
        None => (status.signal().unwrap_or(-1), "uncaught-signal"),
    }
}

#[cfg(not(unix))]
fn exit_parts(status: &std::process::ExitStatus) -> (i32, &'static str) {
    (status.code().unwrap_or(-1), "exited")
}

fn lock_buffer(buffer: &Mutex<String>) -> std::sync::MutexGuard<'_, String> {
    buffer.lock().expect("output buffer lock poisoned")
}

#[cfg(unix)]
fn send_interrupt(pid: u32, command_line: &str) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    debug!(pid, command = %command_line, "sending SIGINT");
    if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGINT) {
        warn!(pid, error = %e, "failed to deliver SIGINT");
    }
}

#[cfg(not(unix))]
fn send_interrupt(_pid: u32, command_line: &str) {
    warn!(command = %command_line, "interrupt signals are not supported on this platform");
}
