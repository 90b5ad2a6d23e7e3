// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod errors;
pub mod exec;
pub mod locate;
pub mod logging;
pub mod types;

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::command::ScriptCommand;
use crate::config::CommandEntry;
use crate::exec::{ChunkKind, Engine};
use crate::types::Mode;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - descriptor construction (from flags or a command file)
/// - one engine for the process lifetime
/// - a stream subscriber mirroring partial output to the terminal
pub async fn run(args: CliArgs) -> Result<()> {
    let commands = commands_from_args(&args)?;
    if commands.is_empty() {
        bail!("command file lists no commands");
    }

    let engine = Engine::new();

    // Mirror streamed chunks to the terminal while commands run; the
    // buffered results below arrive only after each command finishes.
    let mut rx = engine.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(chunk) => match chunk.kind {
                    ChunkKind::Stdout => print!("{}", chunk.text),
                    ChunkKind::Stderr => eprint!("{}", chunk.text),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "output stream lagged; chunks dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let outcome = run_commands(&engine, &commands).await;
    printer.abort();
    outcome
}

async fn run_commands(engine: &Engine, commands: &[ScriptCommand]) -> Result<()> {
    for command in commands {
        info!(command = %command.command_line(), "executing");
        match engine.execute(command).await {
            // Process-mode output already reached the terminal through the
            // stream; host mode has no stream, so print its result here.
            Ok(Some(output)) if command.mode().is_host() => println!("{output}"),
            Ok(Some(_)) => debug!("command completed with buffered output"),
            Ok(None) => debug!("command completed with no output"),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("running `{}`", command.command_line()));
            }
        }
    }
    Ok(())
}

/// Build the descriptor list: either every entry of `--file`, or the single
/// command described by the positional path and flags.
fn commands_from_args(args: &CliArgs) -> Result<Vec<ScriptCommand>> {
    if let Some(file) = &args.file {
        let loaded = config::load_and_validate(file)?;
        return Ok(loaded.command.iter().map(CommandEntry::to_command).collect());
    }

    let Some(path) = &args.path else {
        bail!("nothing to run: pass an executable path or --file");
    };

    let mode = if args.host {
        Mode::Host {
            privileged: args.privileged,
        }
    } else {
        Mode::Process {
            suppress_output: args.suppress_output,
            environment: parse_env_pairs(&args.env)?,
            input_file: args.input.clone(),
        }
    };

    Ok(vec![ScriptCommand::new(
        Some(path.clone()),
        args.args.clone(),
        mode,
    )])
}

fn parse_env_pairs(pairs: &[String]) -> Result<Option<BTreeMap<String, String>>> {
    if pairs.is_empty() {
        return Ok(None);
    }

    let mut env = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("invalid --env pair (expected KEY=VALUE): {pair}"))?;
        env.insert(key.to_string(), value.to_string());
    }
    Ok(Some(env))
}
