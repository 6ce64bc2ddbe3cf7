//! Command implementations

use std::path::{Path, PathBuf};

use lintrun_config::Platform;
use lintrun_runner::{
    CommandSpec, NativeRunner, OutputStream, OwnerKey, ProcessOwner, ProcessRunner, RunOutcome,
};
use lintrun_utils::{ExitCode, package_version};

/// The CLI invocation itself, as the owner of the command it runs.
struct CliOwner {
    file: Option<PathBuf>,
    split_stderr: bool,
}

impl ProcessOwner for CliOwner {
    fn key(&self) -> OwnerKey {
        OwnerKey(u64::from(std::process::id()))
    }

    fn file_name(&self) -> Option<PathBuf> {
        self.file.clone()
    }

    fn notify_failure(&self) {
        // The launch error is already logged and reported through the outcome.
    }

    fn handles_stderr(&self) -> bool {
        self.split_stderr
    }

    fn on_stderr(&self, stderr: &str) {
        eprint!("{stderr}");
    }
}

/// Execute the run command
pub(super) fn execute_run_command(
    runner: &NativeRunner,
    command: Vec<String>,
    stdin_file: Option<&Path>,
    stream: OutputStream,
    split_stderr: bool,
    cwd: Option<&Path>,
) -> Result<(), ExitCode> {
    let Some(mut spec) = CommandSpec::from_argv(command) else {
        eprintln!("✗ No command given");
        return Err(ExitCode::CLI_ARGS);
    };

    if let Some(file) = stdin_file {
        match std::fs::read(file) {
            Ok(bytes) => spec = spec.input(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                eprintln!("✗ Failed to read {}: {e}", file.display());
                return Err(ExitCode::CLI_ARGS);
            }
        }
    }
    if let Some(cwd) = cwd {
        spec = spec.cwd(cwd);
    }
    spec = spec.output_stream(stream);

    let owner = CliOwner {
        file: stdin_file.map(|file| std::path::absolute(file).unwrap_or_else(|_| file.to_path_buf())),
        split_stderr,
    };

    match runner.run(&spec, Some(&owner)) {
        RunOutcome::Success(text) => {
            print!("{text}");
            Ok(())
        }
        RunOutcome::Failure(err) => {
            eprintln!("✗ {err}");
            Err(ExitCode::EXECUTION_FAILURE)
        }
    }
}

/// Execute the which command
pub(super) fn execute_which_command(
    runner: &NativeRunner,
    name: &str,
    all: bool,
) -> Result<(), ExitCode> {
    let search = runner.find_executables(name);
    let matches: Vec<PathBuf> = if all {
        search.iter().collect()
    } else {
        search.first().into_iter().collect()
    };

    if matches.is_empty() {
        eprintln!("✗ {name} not found on PATH");
        return Err(ExitCode::NOT_FOUND);
    }

    for path in matches {
        println!("{}", path.display());
    }
    Ok(())
}

/// Execute the env command
pub(super) fn execute_env_command(runner: &NativeRunner) -> Result<(), ExitCode> {
    for entry in runner.environment().path_entries(Platform::current()) {
        println!("{}", entry.display());
    }
    Ok(())
}

/// Execute the version command
pub(super) fn execute_version_command(metadata_dir: Option<&Path>) -> Result<(), ExitCode> {
    println!("lintrun {}", env!("CARGO_PKG_VERSION"));
    println!(
        "package {}",
        package_version(metadata_dir.unwrap_or_else(|| Path::new(".")))
    );
    Ok(())
}
