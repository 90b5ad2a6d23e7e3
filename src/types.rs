// src/types.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

/// How a command should be executed.
///
/// - `Process`: spawn an OS process with piped stdio.
/// - `Host`: hand the rendered command line to the system script host,
///   serialized process-wide (the host is not reentrant).
/// - `Unknown`: not yet assigned to an executor; the engine rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Unknown,

    Host {
        /// Run the hosted command with administrator privileges.
        privileged: bool,
    },

    Process {
        /// Drop buffered output; observers still see every chunk on the
        /// output stream.
        suppress_output: bool,
        /// When set, **replaces** the child's environment entirely. When
        /// `None` the child inherits the caller's environment unchanged —
        /// some tools misbehave under an explicitly emptied environment.
        environment: Option<BTreeMap<String, String>>,
        /// File whose bytes are written to the child's stdin once at spawn.
        input_file: Option<PathBuf>,
    },
}

impl Mode {
    /// Plain host mode, no elevated privileges.
    pub fn host() -> Self {
        Mode::Host { privileged: false }
    }

    /// Plain process mode: buffered output, inherited environment, no stdin.
    pub fn process() -> Self {
        Mode::Process {
            suppress_output: false,
            environment: None,
            input_file: None,
        }
    }

    pub fn is_process(&self) -> bool {
        matches!(self, Mode::Process { .. })
    }

    pub fn is_host(&self) -> bool {
        matches!(self, Mode::Host { .. })
    }

    pub fn is_privileged(&self) -> bool {
        matches!(self, Mode::Host { privileged: true })
    }

    pub fn suppresses_output(&self) -> bool {
        matches!(
            self,
            Mode::Process {
                suppress_output: true,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_unknown() {
        assert_eq!(Mode::default(), Mode::Unknown);
    }

    #[test]
    fn helpers_match_variants() {
        assert!(Mode::process().is_process());
        assert!(!Mode::process().suppresses_output());
        assert!(Mode::host().is_host());
        assert!(!Mode::host().is_privileged());
        assert!(Mode::Host { privileged: true }.is_privileged());
    }
}
