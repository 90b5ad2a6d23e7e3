// src/command.rs

//! Immutable command descriptors.
//!
//! A [`ScriptCommand`] describes *what* to run — executable path, ordered
//! arguments and an execution [`Mode`] — and nothing about *how*; the engine
//! in [`crate::exec`] owns all execution concerns. Descriptors are plain
//! values: "modifying" one always produces a new value, so templates can be
//! shared freely across threads.

use crate::types::Mode;

/// Immutable description of an external command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptCommand {
    path: Option<String>,
    args: Vec<String>,
    mode: Mode,
}

/// Shell separator tokens used by [`ScriptCommand::combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `:`
    Colon,
    /// `.`
    Point,
    /// `||`
    Or,
    /// `&&`
    And,
    /// `|`
    Pipe,
    /// `&`
    Background,
}

impl Separator {
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::Colon => ":",
            Separator::Point => ".",
            Separator::Or => "||",
            Separator::And => "&&",
            Separator::Pipe => "|",
            Separator::Background => "&",
        }
    }
}

impl ScriptCommand {
    pub fn new(path: Option<String>, args: Vec<String>, mode: Mode) -> Self {
        Self { path, args, mode }
    }

    /// Process-mode command with default settings.
    pub fn process(path: impl Into<String>) -> Self {
        Self::new(Some(path.into()), Vec::new(), Mode::process())
    }

    /// Host-mode command without elevated privileges.
    pub fn host(path: impl Into<String>) -> Self {
        Self::new(Some(path.into()), Vec::new(), Mode::host())
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// New descriptor with the same path and mode and a replaced argument
    /// list. The original is untouched.
    pub fn duplicate(&self, args: Vec<String>) -> Self {
        Self::new(self.path.clone(), args, self.mode.clone())
    }

    /// Chain another command onto this one: appends the separator token (if
    /// any), then the other command's path and arguments, as arguments of a
    /// new descriptor. Path and mode stay this command's own.
    pub fn combine(&self, other: &Self, separator: Option<Separator>) -> Self {
        let mut args = self.args.clone();
        if let Some(sep) = separator {
            args.push(sep.as_str().to_string());
        }
        if let Some(path) = other.path() {
            args.push(path.to_string());
        }
        args.extend(other.args.iter().cloned());
        self.duplicate(args)
    }

    /// Rendered command line: path and space-joined arguments. Used for
    /// diagnostics and as the host invocation payload.
    pub fn command_line(&self) -> String {
        let path = self.path().unwrap_or_default();
        if self.args.is_empty() {
            path.to_string()
        } else {
            format!("{} {}", path, self.args.join(" "))
        }
    }

    /// Full script-host source for this command,
    /// e.g. `do shell script "which git" with administrator privileges`.
    pub fn host_source(&self) -> String {
        let source = format!("do shell script \"{}\"", self.command_line());
        if self.mode.is_privileged() {
            format!("{source} with administrator privileges")
        } else {
            source
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git_status() -> ScriptCommand {
        ScriptCommand::new(
            Some("/usr/bin/git".to_string()),
            vec!["status".to_string()],
            Mode::process(),
        )
    }

    #[test]
    fn duplicate_replaces_args_and_keeps_the_rest() {
        let original = git_status();
        let copy = original.duplicate(vec!["log".to_string(), "-1".to_string()]);

        assert_eq!(copy.path(), Some("/usr/bin/git"));
        assert_eq!(copy.args(), ["log", "-1"]);
        assert_eq!(copy.mode(), original.mode());
        // the original is untouched
        assert_eq!(original.args(), ["status"]);
    }

    #[test]
    fn combine_appends_separator_path_and_args() {
        let which = ScriptCommand::host("which").duplicate(vec!["git".to_string()]);
        let eval = ScriptCommand::host("eval");

        let chained = eval.combine(&which, Some(Separator::And));
        assert_eq!(chained.path(), Some("eval"));
        assert_eq!(chained.args(), ["&&", "which", "git"]);

        let unseparated = eval.combine(&which, None);
        assert_eq!(unseparated.args(), ["which", "git"]);
    }

    #[test]
    fn command_line_joins_path_and_args() {
        assert_eq!(git_status().command_line(), "/usr/bin/git status");
        assert_eq!(ScriptCommand::process("/bin/ls").command_line(), "/bin/ls");
    }

    #[test]
    fn host_source_quotes_the_command_line() {
        let cmd = ScriptCommand::host("which").duplicate(vec!["git".to_string()]);
        assert_eq!(cmd.host_source(), "do shell script \"which git\"");

        let admin = ScriptCommand::new(
            Some("which".to_string()),
            vec!["git".to_string()],
            Mode::Host { privileged: true },
        );
        assert_eq!(
            admin.host_source(),
            "do shell script \"which git\" with administrator privileges"
        );
    }
}
