// src/exec/mod.rs

//! Command execution layer.
//!
//! This module routes [`crate::command::ScriptCommand`] values to the
//! executor responsible for their mode and unifies the outcome into a
//! [`crate::errors::ScriptResult`].
//!
//! - [`engine`] owns the mode dispatch, `interrupt()` fan-out and the
//!   stream subscription surface.
//! - [`host`] defines the `ScriptHost` trait and the production
//!   `OsascriptHost`; tests replace it with recording fakes.
//! - [`host_runner`] serializes host-mode execution behind one mutex.
//! - [`process`] spawns OS processes, wires their pipes, tracks them in the
//!   in-flight registry and delivers interrupts.
//! - [`stream`] is the broadcast channel republishing output chunks while
//!   commands are still running.

pub mod engine;
pub mod host;
pub mod host_runner;
pub mod process;
pub mod stream;

pub use engine::Engine;
pub use host::{HostError, OsascriptHost, ScriptHost};
pub use host_runner::HostRunner;
pub use process::ProcessRunner;
pub use stream::{ChunkKind, OutputBroadcaster, OutputChunk};
