//! CLI argument definitions and parsing structures

use clap::{Parser, Subcommand, ValueEnum};
use lintrun_runner::OutputStream;
use std::path::PathBuf;

/// lintrun - run lint tools with a resolved PATH and collect their output
#[derive(Parser, Debug)]
#[command(name = "lintrun")]
#[command(about = "Run external lint tools and collect their decoded output")]
#[command(long_about = r#"
lintrun launches external linters with extra per-platform directories on PATH,
optionally pipes a file to their stdin, and prints their output decoded and
stripped of terminal color codes.

EXAMPLES:
  # Lint a buffer through stdin, keeping stdout only
  lintrun run --stdin-file src/app.py --stream stdout -- flake8 -

  # Show where a tool resolves, including shadowed copies
  lintrun which eslint --all

  # Print the PATH children will see
  lintrun env

CONFIGURATION:
  Settings are read from .lintrun/settings.toml, discovered upward from the
  working directory, or from $LINTRUN_HOME/settings.toml.
  Use --config to specify an explicit settings file.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to settings file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command and print its output
    Run {
        /// File whose contents are piped to the command's stdin
        #[arg(long)]
        stdin_file: Option<PathBuf>,

        /// Output streams to capture
        #[arg(long, value_enum, default_value_t = StreamArg::Both)]
        stream: StreamArg,

        /// Print stderr separately instead of appending it to stdout
        #[arg(long)]
        split_stderr: bool,

        /// Working directory for the command
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Command and arguments, after `--`
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Locate an executable on the resolved PATH
    Which {
        /// Executable name
        name: String,

        /// Print every match in PATH order
        #[arg(long)]
        all: bool,
    },

    /// Print the resolved PATH, one entry per line
    Env,

    /// Print version information
    Version {
        /// Directory holding package-metadata.json
        #[arg(long)]
        metadata_dir: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamArg {
    Stdout,
    Stderr,
    Both,
}

impl From<StreamArg> for OutputStream {
    fn from(stream: StreamArg) -> Self {
        match stream {
            StreamArg::Stdout => OutputStream::STDOUT,
            StreamArg::Stderr => OutputStream::STDERR,
            StreamArg::Both => OutputStream::BOTH,
        }
    }
}

/// The clap command, for help rendering and argument introspection.
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
