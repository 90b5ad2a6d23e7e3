// src/exec/stream.rs

//! Broadcast stream of partial command output.
//!
//! Every subscriber sees every chunk from every in-flight process-mode
//! command; there is no per-command filtering at this layer. Callers that
//! want isolation filter on [`OutputChunk::command_line`].

use tokio::sync::broadcast;

use crate::errors::{ScriptError, ScriptResult};

/// Bounded per-subscriber buffer; a slow subscriber loses the oldest chunks
/// instead of stalling the pipe readers.
const CHANNEL_CAPACITY: usize = 256;

/// Which pipe a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Stdout,
    Stderr,
}

/// One decoded piece of output from a running command.
#[derive(Debug, Clone)]
pub struct OutputChunk {
    /// Rendered command line of the originating command.
    pub command_line: String,
    pub kind: ChunkKind,
    pub text: String,
}

impl OutputChunk {
    /// The chunk as a result value: stdout chunks are successes, stderr
    /// chunks are `ExecuteFailed` carrying the originating command line.
    pub fn into_result(self) -> ScriptResult<String> {
        match self.kind {
            ChunkKind::Stdout => Ok(self.text),
            ChunkKind::Stderr => Err(ScriptError::ExecuteFailed {
                command_line: self.command_line,
                reason: self.text,
            }),
        }
    }
}

/// Process-wide publish point for [`OutputChunk`]s.
#[derive(Debug, Clone)]
pub struct OutputBroadcaster {
    tx: broadcast::Sender<OutputChunk>,
}

impl OutputBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OutputChunk> {
        self.tx.subscribe()
    }

    /// Publish a chunk. Never blocks; a send with no live subscribers is
    /// not an error.
    pub(crate) fn publish(&self, chunk: OutputChunk) {
        let _ = self.tx.send(chunk);
    }
}

impl Default for OutputBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
