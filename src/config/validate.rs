// src/config/validate.rs

use anyhow::{Result, bail};

use crate::config::model::{CommandFile, ModeKind};

/// Basic semantic checks on a parsed command file.
///
/// TOML shape errors are caught by serde before this runs; here we reject
/// entries the engine would refuse anyway, with a file-oriented message.
pub fn validate_commands(file: &CommandFile) -> Result<()> {
    for (idx, entry) in file.command.iter().enumerate() {
        let position = idx + 1;

        if entry.path.trim().is_empty() {
            bail!("command #{position} has an empty path");
        }
        if entry.privileged && entry.mode != ModeKind::Host {
            bail!("command #{position} sets privileged = true but mode is not \"host\"");
        }
        if entry.mode == ModeKind::Host
            && (entry.suppress_output || entry.env.is_some() || entry.input.is_some())
        {
            bail!("command #{position} sets process-only options but mode is \"host\"");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> CommandFile {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn accepts_a_plain_process_entry() {
        let file = parse(
            r#"
            [[command]]
            path = "/bin/echo"
            "#,
        );
        assert!(validate_commands(&file).is_ok());
    }

    #[test]
    fn rejects_empty_paths() {
        let file = parse(
            r#"
            [[command]]
            path = "  "
            "#,
        );
        let err = validate_commands(&file).unwrap_err();
        assert!(err.to_string().contains("empty path"));
    }

    #[test]
    fn rejects_privileged_process_entries() {
        let file = parse(
            r#"
            [[command]]
            path = "/bin/echo"
            privileged = true
            "#,
        );
        assert!(validate_commands(&file).is_err());
    }

    #[test]
    fn rejects_process_options_on_host_entries() {
        let file = parse(
            r#"
            [[command]]
            path = "which"
            mode = "host"
            suppress_output = true
            "#,
        );
        assert!(validate_commands(&file).is_err());
    }
}
