use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::environment::Environment;
use crate::types::OutputStream;

// ============================================================================
// CommandSpec - a single external command invocation
// ============================================================================

/// Specification for a command to execute.
///
/// Arguments are discrete `OsString` elements passed argv-style; nothing is
/// ever handed to a shell, so metacharacters in file names reach the tool
/// verbatim.
///
/// A spec carries everything one run needs: the argv, optional text to pipe to
/// stdin, which output streams to capture, the working directory and the
/// environment. Without an explicit [`Environment`] the runner resolves one
/// from the inherited environment and the configured search paths.
///
/// # Example
///
/// ```rust
/// use lintrun_runner::{CommandSpec, OutputStream};
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("flake8")
///     .args(["--format", "default", "-"])
///     .input("import os\n")
///     .output_stream(OutputStream::STDOUT)
///     .cwd("/path/to/project");
///
/// assert_eq!(cmd.program, OsString::from("flake8"));
/// assert_eq!(cmd.args.len(), 3);
/// assert!(cmd.uses_stdin());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements (NOT shell strings)
    pub args: Vec<OsString>,
    /// Optional working directory
    pub cwd: Option<PathBuf>,
    /// Complete environment; resolved by the runner when absent
    pub environment: Option<Environment>,
    /// Variables applied on top of the environment
    pub env_overrides: HashMap<OsString, OsString>,
    /// Text sent to stdin, encoded as UTF-8
    pub input: Option<String>,
    /// Streams captured and returned
    pub output_stream: OutputStream,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Build a spec from a full argv (`argv[0]` is the program).
    ///
    /// Returns `None` for an empty argv.
    #[must_use]
    pub fn from_argv<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut iter = argv.into_iter();
        let program = iter.next()?;
        Some(Self::new(program).args(iter))
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Use `environment` as the child's complete environment.
    #[must_use]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set one variable on top of the environment.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env_overrides.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn envs<I, K, V>(mut self, envs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        for (key, value) in envs {
            self.env_overrides.insert(key.into(), value.into());
        }
        self
    }

    /// Pipe `input` to the child's stdin.
    #[must_use]
    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    #[must_use]
    pub fn output_stream(mut self, output_stream: OutputStream) -> Self {
        self.output_stream = output_stream;
        self
    }

    #[must_use]
    pub fn uses_stdin(&self) -> bool {
        self.input.is_some()
    }

    /// Program and arguments as display strings.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| part.to_string_lossy().into_owned())
            .collect()
    }

    /// `base` with this spec's overrides applied.
    #[must_use]
    pub fn effective_environment(&self, base: &Environment) -> Environment {
        let mut env = base.clone();
        for (key, value) in &self.env_overrides {
            env.set(key.clone(), value.clone());
        }
        env
    }

    /// Build a `std::process::Command` running with exactly `env`.
    ///
    /// Stdio and platform flags are left to the runner.
    #[must_use]
    pub fn to_command(&self, env: &Environment) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.env_clear();
        cmd.envs(env.iter());

        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_command_spec_new() {
        let cmd = CommandSpec::new("eslint");
        assert_eq!(cmd.program, OsString::from("eslint"));
        assert!(cmd.args.is_empty());
        assert!(cmd.cwd.is_none());
        assert!(cmd.environment.is_none());
        assert!(!cmd.uses_stdin());
        assert_eq!(cmd.output_stream, OutputStream::BOTH);
    }

    #[test]
    fn test_command_spec_from_argv() {
        let cmd = CommandSpec::from_argv(["pylint", "--output-format=text", "mod.py"]).unwrap();
        assert_eq!(cmd.program, OsString::from("pylint"));
        assert_eq!(cmd.args.len(), 2);
        assert!(CommandSpec::from_argv(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_command_spec_builder_chain() {
        let cmd = CommandSpec::new("rubocop")
            .arg("--stdin")
            .args(["app.rb", "--format", "emacs"])
            .cwd("/workspace")
            .env("RUBYOPT", "-W0")
            .envs([("LANG", "C")])
            .input("puts 1\n")
            .output_stream(OutputStream::STDOUT);

        assert_eq!(cmd.args.len(), 4);
        assert_eq!(cmd.cwd, Some(PathBuf::from("/workspace")));
        assert_eq!(cmd.env_overrides.len(), 2);
        assert_eq!(cmd.input.as_deref(), Some("puts 1\n"));
        assert_eq!(cmd.output_stream, OutputStream::STDOUT);
    }

    #[test]
    fn test_argv_for_display() {
        let cmd = CommandSpec::new("eslint").args(["--stdin", "a b.js"]);
        assert_eq!(cmd.argv(), vec!["eslint", "--stdin", "a b.js"]);
    }

    #[test]
    fn test_effective_environment_applies_overrides() {
        let base = Environment::from_vars([("PATH", "/usr/bin"), ("LANG", "en_US.UTF-8")]);
        let cmd = CommandSpec::new("tool").env("LANG", "C").env("NO_COLOR", "1");

        let env = cmd.effective_environment(&base);
        assert_eq!(env.get("PATH"), Some(OsStr::new("/usr/bin")));
        assert_eq!(env.get("LANG"), Some(OsStr::new("C")));
        assert_eq!(env.get("NO_COLOR"), Some(OsStr::new("1")));
        assert_eq!(base.get("LANG"), Some(OsStr::new("en_US.UTF-8")));
    }

    #[test]
    fn test_shell_metacharacters_preserved() {
        let cmd = CommandSpec::new("echo")
            .arg("$(whoami)")
            .arg("`id`")
            .arg("a;b|c&d");

        assert_eq!(cmd.args[0], OsString::from("$(whoami)"));
        assert_eq!(cmd.args[1], OsString::from("`id`"));
        assert_eq!(cmd.args[2], OsString::from("a;b|c&d"));
    }

    #[test]
    fn test_to_command_uses_given_environment_only() {
        let env = Environment::from_vars([("ONLY_VAR", "1")]);
        let cmd = CommandSpec::new("tool").cwd("/tmp").to_command(&env);

        let envs: Vec<_> = cmd.get_envs().collect();
        assert_eq!(envs, vec![(OsStr::new("ONLY_VAR"), Some(OsStr::new("1")))]);
        assert_eq!(cmd.get_current_dir(), Some(std::path::Path::new("/tmp")));
    }
}
