#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use scripter::command::ScriptCommand;
use scripter::types::Mode;

/// Builder for `ScriptCommand` to simplify test setup.
pub struct CommandBuilder {
    path: Option<String>,
    args: Vec<String>,
    suppress_output: bool,
    environment: Option<BTreeMap<String, String>>,
    input_file: Option<PathBuf>,
}

impl CommandBuilder {
    pub fn new(path: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            args: Vec::new(),
            suppress_output: false,
            environment: None,
            input_file: None,
        }
    }

    /// Builder with no executable path, for precondition tests.
    pub fn without_path() -> Self {
        Self {
            path: None,
            args: Vec::new(),
            suppress_output: false,
            environment: None,
            input_file: None,
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }

    pub fn suppress_output(mut self) -> Self {
        self.suppress_output = true;
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.environment
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = Some(path.into());
        self
    }

    /// Finish as a process-mode command.
    pub fn build(self) -> ScriptCommand {
        ScriptCommand::new(
            self.path,
            self.args,
            Mode::Process {
                suppress_output: self.suppress_output,
                environment: self.environment,
                input_file: self.input_file,
            },
        )
    }

    /// Finish as a host-mode command.
    pub fn build_host(self, privileged: bool) -> ScriptCommand {
        ScriptCommand::new(self.path, self.args, Mode::Host { privileged })
    }
}

/// `/bin/sh -c <script>` process-mode command.
pub fn sh(script: &str) -> ScriptCommand {
    CommandBuilder::new("/bin/sh").arg("-c").arg(script).build()
}
