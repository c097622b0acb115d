//! External process execution with timeouts.
//!
//! Recognizers that ask an external tool (e.g. `conda info --json`) go
//! through [`ProcessRunner`]. Timeouts are enforced here, never by the
//! resolver.

use std::collections::HashMap;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{LocateError, Result};

/// Interval between child status polls while waiting for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of running an external program.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the program exited with code 0.
    pub success: bool,
}

impl ProcessOutput {
    /// Create a success result.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            duration: Duration::ZERO,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            duration: Duration::ZERO,
            success: false,
        }
    }
}

/// Runs external programs.
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args`, killing it after `timeout`.
    ///
    /// Fails when the program cannot be started or times out; a non-zero
    /// exit is reported through [`ProcessOutput::success`].
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<ProcessOutput>;

    /// Like [`run`](Self::run), but a non-zero exit is an error.
    fn run_checked(&self, program: &str, args: &[&str], timeout: Duration) -> Result<String> {
        let output = self.run(program, args, timeout)?;
        if output.success {
            Ok(output.stdout)
        } else {
            Err(LocateError::ProcessFailed {
                command: display_command(program, args),
                code: output.exit_code,
            })
        }
    }
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl ProcessRunner for CommandRunner {
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<ProcessOutput> {
        let start = Instant::now();
        let command = display_command(program, args);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|_| LocateError::ProcessFailed {
                command: command.clone(),
                code: None,
            })?;

        // A full pipe would block the child while we poll.
        let stdout_handle = spawn_reader(child.stdout.take());
        let stderr_handle = spawn_reader(child.stderr.take());

        let status = match wait_with_deadline(&mut child, start + timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                tracing::debug!("Killed '{}' after {:?}", command, timeout);
                return Err(LocateError::ProcessTimeout {
                    command,
                    timeout_secs: timeout.as_secs(),
                });
            }
        };

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();

        Ok(ProcessOutput {
            exit_code: status.code(),
            stdout,
            stderr,
            duration: start.elapsed(),
            success: status.success(),
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn wait_with_deadline(
    child: &mut Child,
    deadline: Instant,
) -> Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn display_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Scripted [`ProcessRunner`] for testing.
///
/// Responses are keyed by the full command line. Commands without a
/// response fail as if the program did not exist.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pylocate::services::process::{MockRunner, ProcessOutput, ProcessRunner};
///
/// let runner = MockRunner::new().with_response("conda info --json", ProcessOutput::success("{}"));
/// let out = runner.run("conda", &["info", "--json"], Duration::from_secs(1)).unwrap();
/// assert_eq!(out.stdout, "{}");
/// assert!(runner.run("pyenv", &["root"], Duration::from_secs(1)).is_err());
/// assert_eq!(runner.calls().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, ProcessOutput>,
    timeouts: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    /// Create a runner with no scripted commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output of a command line.
    pub fn with_response(mut self, command: &str, output: ProcessOutput) -> Self {
        self.responses.insert(command.to_string(), output);
        self
    }

    /// Make a command line time out.
    pub fn with_timeout(mut self, command: &str) -> Self {
        self.timeouts.push(command.to_string());
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<ProcessOutput> {
        let command = display_command(program, args);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }

        if self.timeouts.contains(&command) {
            return Err(LocateError::ProcessTimeout {
                command,
                timeout_secs: timeout.as_secs(),
            });
        }
        self.responses
            .get(&command)
            .cloned()
            .ok_or(LocateError::ProcessFailed { command, code: None })
    }
}
