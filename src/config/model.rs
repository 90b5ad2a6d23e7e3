// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::command::ScriptCommand;
use crate::types::Mode;

/// Top-level command file as read from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandFile {
    /// All `[[command]]` entries, in file order.
    #[serde(default)]
    pub command: Vec<CommandEntry>,
}

/// One `[[command]]` entry.
///
/// All fields except `path` are optional and default to a plain
/// process-mode command.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandEntry {
    /// Absolute path of the executable (or the host command word).
    pub path: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// `"process"` (default) or `"host"`.
    #[serde(default)]
    pub mode: ModeKind,

    /// Host mode only: run with administrator privileges.
    #[serde(default)]
    pub privileged: bool,

    /// Process mode only: drop buffered output (the stream still sees it).
    #[serde(default)]
    pub suppress_output: bool,

    /// Process mode only: replaces the child environment entirely.
    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>,

    /// Process mode only: file written to the child's stdin.
    #[serde(default)]
    pub input: Option<PathBuf>,
}

/// Execution mode as spelled in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    #[default]
    Process,
    Host,
}

impl CommandEntry {
    /// Build the engine-facing descriptor for this entry.
    pub fn to_command(&self) -> ScriptCommand {
        let mode = match self.mode {
            ModeKind::Host => Mode::Host {
                privileged: self.privileged,
            },
            ModeKind::Process => Mode::Process {
                suppress_output: self.suppress_output,
                environment: self.env.clone(),
                input_file: self.input.clone(),
            },
        };
        ScriptCommand::new(Some(self.path.clone()), self.args.clone(), mode)
    }
}
