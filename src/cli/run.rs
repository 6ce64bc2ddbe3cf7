//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, loads settings, installs logging, builds the
//! runner and dispatches to the command handlers. It handles ALL output,
//! including errors.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use lintrun_config::Settings;
use lintrun_runner::{NativeRunner, ProcessRegistry};
use lintrun_utils::ExitCode;
use lintrun_utils::logging::init_tracing;

use super::args::{Cli, Commands};
use super::commands;

/// Main CLI execution function.
///
/// Returns `Err(ExitCode)` after printing the error; main.rs only maps it to
/// the process exit status.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("✗ {err:#}");
            return Err(ExitCode::CLI_ARGS);
        }
    };

    // A subscriber may already be installed when embedded; keep it.
    let _ = init_tracing(cli.verbose || settings.verbose());

    let runner = NativeRunner::from_settings(&settings, Arc::new(ProcessRegistry::new()));

    match cli.command {
        Commands::Run {
            stdin_file,
            stream,
            split_stderr,
            cwd,
            command,
        } => commands::execute_run_command(
            &runner,
            command,
            stdin_file.as_deref(),
            stream.into(),
            split_stderr,
            cwd.as_deref(),
        ),
        Commands::Which { name, all } => commands::execute_which_command(&runner, &name, all),
        Commands::Env => commands::execute_env_command(&runner),
        Commands::Version { metadata_dir } => {
            commands::execute_version_command(metadata_dir.as_deref())
        }
    }
}

/// Explicit `--config` must exist; otherwise discovery decides.
fn load_settings(config: Option<&Path>) -> Result<Settings> {
    match config {
        Some(path) => {
            if !path.exists() {
                bail!("Settings file not found: {}", path.display());
            }
            Settings::load(path)
        }
        None => Settings::discover(),
    }
}
