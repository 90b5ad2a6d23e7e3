// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::model::CommandFile;
use crate::config::validate::validate_commands;

/// Load a command file from a path and return the raw [`CommandFile`].
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the semantic checks as well.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<CommandFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading command file at {:?}", path))?;

    let file: CommandFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML command file from {:?}", path))?;

    Ok(file)
}

/// Load a command file and run basic validation.
///
/// This is the entry point the CLI uses: reads TOML, applies serde
/// defaults, then rejects entries the engine would refuse.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<CommandFile> {
    let file = load_from_path(&path)?;
    validate_commands(&file)?;
    Ok(file)
}
