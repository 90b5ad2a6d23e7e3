// src/errors.rs

//! Crate-wide error taxonomy and result aliases.

use std::path::PathBuf;

use thiserror::Error;

/// Placeholder used when a failing command produced no diagnostic output.
pub(crate) const UNKNOWN_ERROR: &str = "unknown error";

/// Result type returned by the engine and its runners.
///
/// `Ok(None)` is a distinct, valid outcome: the command ran, exited clean and
/// produced no buffered output. It is never collapsed into an error.
pub type ScriptResult<T> = std::result::Result<T, ScriptError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// No executor accepts the command's mode.
    #[error("no executor accepts this command mode")]
    UnsupportedMode,

    /// A static precondition failed before anything was spawned.
    #[error("invalid command: {0}")]
    InvalidCommand(#[from] InvalidReason),

    /// The process or script host ran and finished abnormally.
    ///
    /// `reason` is assembled from captured stderr (or the host's error
    /// message) plus exit metadata, and is suitable for direct display.
    #[error("`{command_line}` failed: {reason}")]
    ExecuteFailed { command_line: String, reason: String },

    /// A downstream decode of a successful result's output failed.
    ///
    /// The engine never constructs this variant itself; it exists so that
    /// converters layered on top of [`ScriptResult`] share the taxonomy.
    #[error("serialization failed: {reason}")]
    SerializationFailed { reason: String },
}

/// Why a command was rejected before execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("executable path is empty")]
    PathEmpty,

    #[error("path does not exist or is a directory: {0}")]
    PathNotExistOrIsDirectory(PathBuf),

    #[error("path is not executable: {0}")]
    PathPermissionDenied(PathBuf),
}
