//! Task command execution with log capture.
//!
//! The command runs through `bash -c`. Its stdout and stderr share one OS
//! pipe; a single reader copies that pipe into a [`TeeWriter`] feeding the log
//! artifact and, optionally, the console.

mod tee;

pub use tee::TeeWriter;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::{Error, Result};

/// Shell used to interpret the task command
pub const SHELL: &str = "bash";

/// Outcome of running the task command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    success: bool,
    exit_code: Option<i32>,
    detail: Option<String>,
}

impl CommandResult {
    /// The command exited with status 0
    pub fn succeeded() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            detail: None,
        }
    }

    /// The command failed to start, exited non-zero or was terminated
    pub fn failed(exit_code: Option<i32>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code,
            detail: Some(detail.into()),
        }
    }

    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            Self::succeeded()
        } else {
            // ExitStatus renders signals as e.g. "signal: 9 (SIGKILL)"
            Self::failed(status.code(), status.to_string())
        }
    }

    /// Whether the command succeeded
    pub fn success(&self) -> bool {
        self.success
    }

    /// Exit code, if the process exited normally
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Why the command failed
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

/// A shell command bound to its log artifact
#[derive(Debug, Clone)]
pub struct ShellTask {
    command: String,
    log_path: PathBuf,
    show_output: bool,
    echo_command: bool,
}

impl ShellTask {
    /// Create a task that logs to `log_path`
    pub fn new(command: impl Into<String>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            log_path: log_path.into(),
            show_output: true,
            echo_command: true,
        }
    }

    /// Build the task described by `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.command.clone(), config.log_path())
            .show_output(config.show_output)
            .echo_command(!config.suppress_command_echo)
    }

    /// Mirror output to stderr as well as the log
    #[must_use]
    pub fn show_output(mut self, show: bool) -> Self {
        self.show_output = show;
        self
    }

    /// Include the command text in diagnostics
    #[must_use]
    pub fn echo_command(mut self, echo: bool) -> Self {
        self.echo_command = echo;
        self
    }

    /// Path of the log artifact
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Run the command, teeing to stderr when `show_output` is set.
    pub fn run(&self) -> Result<CommandResult> {
        let console = self.show_output.then(io::stderr);
        self.run_with_console(console)
    }

    /// Run the command, teeing to `console` if given.
    ///
    /// Only log artifact and pipe errors are returned as `Err`; anything that
    /// goes wrong with the command itself is a failed [`CommandResult`].
    pub fn run_with_console<W: Write>(&self, console: Option<W>) -> Result<CommandResult> {
        let log_file = self.create_log()?;

        if self.echo_command {
            info!("Running task command: {}", self.command);
        } else {
            info!("Running task command");
        }
        info!("Logging to {}", self.log_path.display());

        let mut sink = TeeWriter::new(log_file, console);
        let result = self.execute(&mut sink);

        // Flush on every path, including a failed spawn
        let flushed = sink
            .flush()
            .map_err(|e| Error::io(e, Some(self.log_path.clone()), "flush command log"));
        let result = result?;
        flushed?;

        if let Some(detail) = result.detail() {
            warn!("{detail}");
        }
        Ok(result)
    }

    fn create_log(&self) -> Result<File> {
        if let Some(parent) = self
            .log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io(e, Some(parent.to_path_buf()), "create artifacts directory")
            })?;
        }
        File::create(&self.log_path)
            .map_err(|e| Error::io(e, Some(self.log_path.clone()), "create command log"))
    }

    fn execute<W: Write>(&self, sink: &mut W) -> Result<CommandResult> {
        let (mut reader, writer) = io::pipe()
            .map_err(|e| Error::io(e, None, "create output pipe"))?;
        let err_writer = writer
            .try_clone()
            .map_err(|e| Error::io(e, None, "clone output pipe"))?;

        let mut cmd = Command::new(SHELL);
        cmd.arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(err_writer);

        let spawned = cmd.spawn();
        // The parent's copies of the write end live in `cmd`; drop them so
        // the reader sees EOF once the child exits.
        drop(cmd);

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                return Ok(CommandResult::failed(
                    None,
                    format!("failed to start {SHELL}: {e}"),
                ));
            }
        };
        debug!(pid = child.id(), "Task command started");

        // Console errors are absorbed by the tee; only log errors surface here
        if let Err(e) = io::copy(&mut reader, sink) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::io(
                e,
                Some(self.log_path.clone()),
                "write command log",
            ));
        }

        match child.wait() {
            Ok(status) => Ok(CommandResult::from_status(status)),
            Err(e) => Ok(CommandResult::failed(
                None,
                format!("failed to wait for command: {e}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn task(dir: &TempDir, command: &str) -> ShellTask {
        ShellTask::new(command, dir.path().join("status.txt")).show_output(false)
    }

    #[test]
    fn test_success() {
        let dir = TempDir::new().unwrap();
        let result = task(&dir, "echo hello").run().unwrap();
        assert!(result.success());
        assert_eq!(result.exit_code(), Some(0));
        assert_eq!(
            fs::read_to_string(dir.path().join("status.txt")).unwrap(),
            "hello\n"
        );
    }

    #[test]
    fn test_non_zero_exit() {
        let dir = TempDir::new().unwrap();
        let result = task(&dir, "echo before; exit 3").run().unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code(), Some(3));
        assert!(result.detail().unwrap().contains('3'));
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_is_failure() {
        let dir = TempDir::new().unwrap();
        let result = task(&dir, "kill -9 $$").run().unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code(), None);
        assert!(result.detail().unwrap().contains("signal"));
    }

    #[test]
    fn test_stderr_is_captured() {
        let dir = TempDir::new().unwrap();
        let result = task(&dir, "echo out; echo err 1>&2").run().unwrap();
        assert!(result.success());
        let log = fs::read_to_string(dir.path().join("status.txt")).unwrap();
        assert_eq!(log, "out\nerr\n");
    }

    #[test]
    fn test_console_matches_log() {
        let dir = TempDir::new().unwrap();
        let mut console = Vec::new();
        let command = "for i in $(seq 1 2000); do echo \"line $i\"; echo \"err $i\" 1>&2; done";
        let result = task(&dir, command)
            .run_with_console(Some(&mut console))
            .unwrap();
        assert!(result.success());

        let log = fs::read(dir.path().join("status.txt")).unwrap();
        assert!(!log.is_empty());
        assert_eq!(log, console);
    }

    #[test]
    fn test_log_is_truncated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("status.txt");
        fs::write(&path, "stale content from a previous run\n").unwrap();
        task(&dir, "printf fresh").run().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn test_creates_artifacts_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("artifacts").join("lint.txt");
        let result = ShellTask::new("true", &path)
            .show_output(false)
            .run()
            .unwrap();
        assert!(result.success());
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_log_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        // A regular file cannot be used as a directory
        let err = ShellTask::new("true", blocker.join("status.txt"))
            .show_output(false)
            .run()
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_command_not_run_when_log_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let marker = dir.path().join("ran");
        let command = format!("touch {}", marker.display());
        let _ = ShellTask::new(command, blocker.join("status.txt"))
            .show_output(false)
            .run();
        assert!(!marker.exists());
    }

    /// Console whose reader has gone away
    struct ClosedConsole;

    impl Write for ClosedConsole {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_console_error_keeps_logging() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("done");
        let command = format!("echo hi; sleep 0.2; echo bye; touch {}", marker.display());
        let result = task(&dir, &command)
            .run_with_console(Some(ClosedConsole))
            .unwrap();

        assert!(result.success());
        assert!(marker.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("status.txt")).unwrap(),
            "hi\nbye\n"
        );
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            command: "make".to_string(),
            context: "build".to_string(),
            artifacts_dir: Some(PathBuf::from("/out")),
            show_output: false,
            suppress_command_echo: true,
            ..Default::default()
        };
        let task = ShellTask::from_config(&config);
        assert_eq!(task.log_path(), Path::new("/out/build.txt"));
        assert!(!task.show_output);
        assert!(!task.echo_command);
    }
}
