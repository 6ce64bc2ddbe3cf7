use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ExitStatus, Output, Stdio};
use std::sync::Arc;
use std::thread::{self, ScopedJoinHandle};
use std::time::Duration;

use lintrun_config::{Platform, PlatformPaths, Settings};
use tracing::{Level, debug, error, info, warn};

use crate::decode::post_process;
use crate::diagnostics::format_invocation;
use crate::environment::{Environment, resolve_environment};
use crate::error::RunnerError;
use crate::locate::{ExecutableSearch, find_executables};
use crate::owner::ProcessOwner;
use crate::platform;
use crate::registry::{ProcessHandle, ProcessRegistry};
use crate::types::{OutputStream, OwnerKey};

use super::{CommandSpec, ProcessRunner, RunOutcome};

/// Upper bound on the sleep between exit checks.
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// NativeRunner - blocking process execution with registry bookkeeping
// ============================================================================

/// Process runner using `std::process::Command`.
///
/// Each [`run`](ProcessRunner::run) launches one child with the resolved
/// environment, registers it in the shared [`ProcessRegistry`] for the
/// duration of the run, and returns the post-processed output. Many threads
/// may run commands through the same runner at once.
///
/// # Example
///
/// ```rust,no_run
/// use lintrun_runner::{CommandSpec, NativeRunner, OutputStream, ProcessRegistry, ProcessRunner};
/// use std::sync::Arc;
///
/// let runner = NativeRunner::new(Arc::new(ProcessRegistry::new()));
/// let cmd = CommandSpec::new("cat")
///     .input("hello")
///     .output_stream(OutputStream::STDOUT);
///
/// assert_eq!(runner.run(&cmd, None).text(), "hello");
/// ```
#[derive(Debug, Clone)]
pub struct NativeRunner {
    paths: PlatformPaths,
    registry: Arc<ProcessRegistry>,
}

impl NativeRunner {
    /// A runner with no extra search paths.
    #[must_use]
    pub fn new(registry: Arc<ProcessRegistry>) -> Self {
        Self {
            paths: PlatformPaths::default(),
            registry,
        }
    }

    /// A runner using the `paths` from `settings`.
    #[must_use]
    pub fn from_settings(settings: &Settings, registry: Arc<ProcessRegistry>) -> Self {
        Self::new(registry).with_paths(settings.paths.clone())
    }

    #[must_use]
    pub fn with_paths(mut self, paths: PlatformPaths) -> Self {
        self.paths = paths;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ProcessRegistry> {
        &self.registry
    }

    /// The environment children get when a command does not bring its own.
    #[must_use]
    pub fn environment(&self) -> Environment {
        resolve_environment(&Environment::inherited(), &self.paths, Platform::current())
    }

    /// Search the resolved PATH for `name`.
    #[must_use]
    pub fn find_executables(&self, name: &str) -> ExecutableSearch {
        find_executables(name, &self.environment(), Platform::current())
    }

    /// First match for `name` on the resolved PATH.
    #[must_use]
    pub fn which(&self, name: &str) -> Option<PathBuf> {
        self.find_executables(name).first()
    }

    fn launch_failed(
        &self,
        cmd: &CommandSpec,
        argv: &[String],
        env: &Environment,
        owner: Option<&dyn ProcessOwner>,
        err: &io::Error,
    ) -> RunOutcome {
        let env_diff = env.diff(&Environment::inherited());
        let headline = format!("  Execution failed\n\n  {err}");
        error!(
            "{}",
            format_invocation(
                &headline,
                argv,
                cmd.uses_stdin(),
                cmd.cwd.as_deref(),
                owner,
                Some(&env_diff),
            )
        );

        if let Some(owner) = owner {
            owner.notify_failure();
        }

        RunOutcome::Failure(RunnerError::LaunchFailed {
            program: cmd.program.to_string_lossy().into_owned(),
            reason: err.to_string(),
        })
    }
}

impl ProcessRunner for NativeRunner {
    /// Launch `cmd`, wait for it, and return the streams it selects.
    ///
    /// - stdin is piped only when the command has input
    /// - stdout/stderr are piped per the command's [`OutputStream`]; unselected
    ///   streams are inherited
    /// - the child is registered under the owner's key until its output is
    ///   collected, whatever happens during collection
    fn run(&self, cmd: &CommandSpec, owner: Option<&dyn ProcessOwner>) -> RunOutcome {
        let base = match &cmd.environment {
            Some(env) => env.clone(),
            None => self.environment(),
        };
        let env = cmd.effective_environment(&base);
        let argv = cmd.argv();

        let mut command = cmd.to_command(&env);
        command
            .stdin(if cmd.uses_stdin() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(pipe_if(cmd.output_stream.includes_stdout()))
            .stderr(pipe_if(cmd.output_stream.includes_stderr()));
        platform::apply_launch_flags(&mut command);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(err) => return self.launch_failed(cmd, &argv, &env, owner, &err),
        };

        if tracing::enabled!(Level::INFO) {
            info!(
                "{}",
                format_invocation(
                    "Running ...",
                    &argv,
                    cmd.uses_stdin(),
                    cmd.cwd.as_deref(),
                    owner,
                    None,
                )
            );
        }

        let owner_key = owner.map(ProcessOwner::key);
        let handle = ProcessHandle::new(child.id());
        let collected = {
            let _registration = Registration::new(&self.registry, owner_key, handle.clone());
            collect(child, cmd.input.as_deref(), &handle)
        };

        match collected {
            Ok(output) => {
                debug!(
                    program = %argv[0],
                    pid = handle.pid(),
                    status = %output.status,
                    "process finished"
                );
                RunOutcome::Success(select_output(cmd.output_stream, &output, owner))
            }
            Err(err) => RunOutcome::Failure(RunnerError::CollectFailed {
                reason: err.to_string(),
            }),
        }
    }
}

fn pipe_if(selected: bool) -> Stdio {
    if selected {
        Stdio::piped()
    } else {
        Stdio::inherit()
    }
}

/// Keeps a handle registered for as long as it lives.
struct Registration<'a> {
    registry: &'a ProcessRegistry,
    owner: Option<OwnerKey>,
    handle: ProcessHandle,
}

impl<'a> Registration<'a> {
    fn new(registry: &'a ProcessRegistry, owner: Option<OwnerKey>, handle: ProcessHandle) -> Self {
        registry.register(owner, handle.clone());
        Self {
            registry,
            owner,
            handle,
        }
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.registry.deregister(self.owner, &self.handle);
    }
}

/// Feed `input`, drain every piped stream and reap the child.
///
/// Input is written from a scoped thread so a child that fills its stdout
/// pipe before reading stdin cannot deadlock the run. The exit is picked up
/// through `handle`, so the pid stays valid for `terminate` until the handle
/// is marked reaped.
fn collect(mut child: Child, input: Option<&str>, handle: &ProcessHandle) -> io::Result<Output> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    thread::scope(|scope| {
        let writer = match (stdin, input) {
            (Some(mut stdin), Some(input)) => {
                Some(scope.spawn(move || stdin.write_all(input.as_bytes())))
            }
            _ => None,
        };
        let stdout = stdout.map(|pipe| scope.spawn(move || read_all(pipe)));
        let stderr = stderr.map(|pipe| scope.spawn(move || read_all(pipe)));

        let stdout = join_reader(stdout);
        let stderr = join_reader(stderr);
        let status = wait_reaped(&mut child, handle);

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Err(e)) if e.kind() != io::ErrorKind::BrokenPipe => {
                    warn!(error = %e, "failed to write process stdin");
                }
                Err(_) => warn!("stdin writer thread panicked"),
                _ => {}
            }
        }

        Ok(Output {
            status: status?,
            stdout: stdout?,
            stderr: stderr?,
        })
    })
}

fn read_all(mut pipe: impl Read) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(buf)
}

fn join_reader(reader: Option<ScopedJoinHandle<'_, io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match reader {
        Some(reader) => reader
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("output reader thread panicked"))),
        None => Ok(Vec::new()),
    }
}

/// Poll for exit with a growing back-off.
fn wait_reaped(child: &mut Child, handle: &ProcessHandle) -> io::Result<ExitStatus> {
    let mut delay = Duration::from_millis(1);
    loop {
        if let Some(status) = handle.reap_with(|| child.try_wait())? {
            return Ok(status);
        }
        thread::sleep(delay);
        delay = (delay * 2).min(MAX_POLL_INTERVAL);
    }
}

fn select_output(
    stream: OutputStream,
    output: &Output,
    owner: Option<&dyn ProcessOwner>,
) -> String {
    match stream {
        OutputStream::STDOUT => post_process(&output.stdout),
        OutputStream::STDERR => post_process(&output.stderr),
        _ => {
            let stdout = post_process(&output.stdout);
            let stderr = post_process(&output.stderr);

            match owner.filter(|owner| owner.handles_stderr()) {
                Some(owner) => {
                    if !stderr.trim().is_empty() {
                        owner.on_stderr(&stderr);
                    }
                    stdout
                }
                None => stdout + &stderr,
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    struct RecordingOwner {
        key: OwnerKey,
        wants_stderr: bool,
        failures: AtomicUsize,
        stderr: Mutex<Vec<String>>,
    }

    impl RecordingOwner {
        fn new(key: u64, wants_stderr: bool) -> Self {
            Self {
                key: OwnerKey(key),
                wants_stderr,
                failures: AtomicUsize::new(0),
                stderr: Mutex::new(Vec::new()),
            }
        }
    }

    impl ProcessOwner for RecordingOwner {
        fn key(&self) -> OwnerKey {
            self.key
        }

        fn notify_failure(&self) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }

        fn handles_stderr(&self) -> bool {
            self.wants_stderr
        }

        fn on_stderr(&self, stderr: &str) {
            self.stderr.lock().unwrap().push(stderr.to_string());
        }
    }

    fn runner() -> NativeRunner {
        NativeRunner::new(Arc::new(ProcessRegistry::new()))
    }

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh").arg("-c").arg(script)
    }

    #[test]
    fn test_stdin_echoed_to_stdout() {
        let runner = runner();
        let owner = RecordingOwner::new(1, false);
        let cmd = CommandSpec::new("cat")
            .input("hello")
            .output_stream(OutputStream::STDOUT);

        assert!(runner.registry().handles(Some(OwnerKey(1))).is_empty());
        let outcome = runner.run(&cmd, Some(&owner));
        assert_eq!(outcome.text(), "hello");
        assert!(runner.registry().is_empty());
    }

    #[test]
    fn test_large_input_does_not_deadlock() {
        let runner = runner();
        let input = "x".repeat(1 << 20);
        let cmd = CommandSpec::new("cat")
            .input(input.clone())
            .output_stream(OutputStream::STDOUT);

        assert_eq!(runner.run(&cmd, None).into_text().len(), input.len());
    }

    #[test]
    fn test_missing_executable() {
        let runner = runner();
        let owner = RecordingOwner::new(2, false);
        let cmd = CommandSpec::new("this_linter_definitely_does_not_exist_12345");

        let outcome = runner.run(&cmd, Some(&owner));

        assert_eq!(outcome.text(), "");
        match outcome.failure() {
            Some(RunnerError::LaunchFailed { program, reason }) => {
                assert_eq!(program, "this_linter_definitely_does_not_exist_12345");
                assert!(!reason.is_empty());
            }
            other => panic!("Expected LaunchFailed, got {other:?}"),
        }
        assert_eq!(owner.failures.load(Ordering::SeqCst), 1);
        assert!(runner.registry().is_empty());
    }

    #[test]
    fn test_missing_executable_logs_one_error() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(Level::DEBUG)
            .finish();
        let runner = runner();
        let owner = RecordingOwner::new(7, false);
        let cmd = CommandSpec::new("this_linter_definitely_does_not_exist_12345").arg("--check");

        let outcome =
            tracing::subscriber::with_default(subscriber, || runner.run(&cmd, Some(&owner)));

        assert!(outcome.failure().is_some());
        let logged = logs.contents();
        assert_eq!(logged.matches("ERROR").count(), 1, "{logged}");
        assert!(logged.contains("Execution failed"), "{logged}");
        assert!(
            logged.contains("this_linter_definitely_does_not_exist_12345 --check"),
            "{logged}"
        );
        assert_eq!(owner.failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_successful_run_logs_no_error() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let cmd = CommandSpec::new("true");

        let outcome = tracing::subscriber::with_default(subscriber, || runner().run(&cmd, None));

        assert!(outcome.is_success());
        assert!(!logs.contents().contains("ERROR"), "{}", logs.contents());
    }

    #[test]
    fn test_missing_executable_without_owner() {
        let outcome = runner().run(&CommandSpec::new("/nonexistent/bin/lint"), None);
        assert!(matches!(
            outcome,
            RunOutcome::Failure(RunnerError::LaunchFailed { .. })
        ));
    }

    #[test]
    fn test_stderr_only() {
        let cmd = sh("echo out; echo err >&2").output_stream(OutputStream::STDERR);
        assert_eq!(runner().run(&cmd, None).text(), "err\n");
    }

    #[test]
    fn test_both_streams_concatenated() {
        let cmd = sh("echo out; echo err >&2").output_stream(OutputStream::BOTH);
        assert_eq!(runner().run(&cmd, None).text(), "out\nerr\n");
    }

    #[test]
    fn test_both_streams_with_stderr_handler() {
        let owner = RecordingOwner::new(3, true);
        let cmd = sh("echo out; echo err >&2");

        let outcome = runner().run(&cmd, Some(&owner));

        assert_eq!(outcome.text(), "out\n");
        assert_eq!(*owner.stderr.lock().unwrap(), vec!["err\n".to_string()]);
    }

    #[test]
    fn test_blank_stderr_not_forwarded() {
        let owner = RecordingOwner::new(4, true);
        let cmd = sh("echo out; printf '  \\n' >&2");

        assert_eq!(runner().run(&cmd, Some(&owner)).text(), "out\n");
        assert!(owner.stderr.lock().unwrap().is_empty());
    }

    #[test]
    fn test_color_codes_stripped() {
        let cmd = sh("printf '\\033[31mE501\\033[0m line too long'")
            .output_stream(OutputStream::STDOUT);
        assert_eq!(runner().run(&cmd, None).text(), "E501 line too long");
    }

    #[test]
    fn test_nonzero_exit_is_still_success() {
        let cmd = sh("echo problem; exit 1").output_stream(OutputStream::STDOUT);
        let outcome = runner().run(&cmd, None);
        assert!(outcome.is_success());
        assert_eq!(outcome.text(), "problem\n");
    }

    #[test]
    fn test_cwd_and_env_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let cmd = sh("pwd; echo \"$LINT_MODE\"")
            .cwd(dir.path())
            .env("LINT_MODE", "strict")
            .output_stream(OutputStream::STDOUT);

        let text = runner().run(&cmd, None).into_text();
        let mut lines = text.lines();
        let pwd = PathBuf::from(lines.next().unwrap());
        assert_eq!(
            pwd.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
        assert_eq!(lines.next(), Some("strict"));
    }

    #[test]
    fn test_explicit_environment_replaces_inherited() {
        let mut env = Environment::inherited();
        env.set("ONLY_HERE", "yes");
        env.remove("HOME");
        let cmd = sh("echo \"$ONLY_HERE:${HOME:-unset}\"")
            .environment(env)
            .output_stream(OutputStream::STDOUT);

        assert_eq!(runner().run(&cmd, None).text(), "yes:unset\n");
    }

    #[test]
    fn test_configured_paths_reach_child_and_which() {
        let dir = tempfile::TempDir::new().unwrap();
        let tool = dir.path().join("fake-lint");
        std::fs::write(&tool, "#!/bin/sh\necho linted\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let paths = PlatformPaths::new().with(
            Platform::current(),
            lintrun_config::PathSetting::One(dir.path().to_string_lossy().into_owned()),
        );
        let runner = runner().with_paths(paths);

        assert_eq!(runner.which("fake-lint"), Some(tool));
        let cmd = CommandSpec::new("fake-lint").output_stream(OutputStream::STDOUT);
        assert_eq!(runner.run(&cmd, None).text(), "linted\n");
    }

    #[test]
    fn test_concurrent_runs_from_one_owner_accumulate() {
        let runner = Arc::new(runner());
        let owner = Arc::new(RecordingOwner::new(6, false));

        let workers: Vec<_> = (0..2)
            .map(|_| {
                let runner = Arc::clone(&runner);
                let owner = Arc::clone(&owner);
                thread::spawn(move || {
                    let cmd = CommandSpec::new("sleep").arg("30");
                    runner.run(&cmd, Some(&*owner))
                })
            })
            .collect();

        let key = Some(OwnerKey(6));
        let deadline = Instant::now() + Duration::from_secs(10);
        while runner.registry().handles(key).len() < 2 {
            assert!(Instant::now() < deadline, "processes never registered");
            thread::sleep(Duration::from_millis(10));
        }

        assert_eq!(runner.registry().terminate(key), 2);
        for worker in workers {
            let outcome = worker.join().unwrap();
            assert!(outcome.is_success());
            assert_eq!(outcome.text(), "");
        }
        assert!(runner.registry().is_empty());
    }
}
