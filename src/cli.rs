// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `scripter`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scripter",
    version,
    about = "Run external commands through the scripter engine.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a TOML command file to run instead of a single command.
    #[arg(long, value_name = "PATH", conflicts_with = "path")]
    pub file: Option<PathBuf>,

    /// Run through the system script host instead of spawning a process.
    #[arg(long)]
    pub host: bool,

    /// Host mode: run with administrator privileges.
    #[arg(long, requires = "host")]
    pub privileged: bool,

    /// Process mode: drop buffered output (the stream still prints it).
    #[arg(long)]
    pub suppress_output: bool,

    /// Process mode: KEY=VALUE pair replacing the child environment
    /// entirely. Repeatable.
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Process mode: file whose contents are written to the child's stdin.
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCRIPTER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Executable to run.
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Arguments passed to the executable.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
