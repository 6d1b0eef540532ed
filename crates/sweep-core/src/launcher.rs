//! Child process execution for a single run instance.
//!
//! The child's stdout and stderr share one log file, truncated at spawn time.
//! A failed spawn is written into that same log so the operator finds every
//! run's story in its own file, and the sweep moves on.

use crate::command::BenchCommand;
use crate::report::RunStatus;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Child, ExitStatus, Stdio};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub status: RunStatus,
    /// Exit code, if the process completed normally.
    pub exit_code: Option<i32>,
    pub message: Option<String>,
    pub duration: Duration,
}

/// Runs one benchmark command to completion.
///
/// `Err` is reserved for failures to create the log file itself. Anything that
/// goes wrong with the child is reported through [`LaunchOutcome`].
pub trait Launcher {
    fn launch(&self, command: &BenchCommand, log_file: &Path) -> std::io::Result<LaunchOutcome>;
}

#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher {
    timeout: Option<Duration>,
}

impl ProcessLauncher {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, command: &BenchCommand, log_file: &Path) -> std::io::Result<LaunchOutcome> {
        let start = Instant::now();
        let mut log = File::create(log_file)?;
        let stderr_log = log.try_clone()?;

        let spawned = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::from(log.try_clone()?))
            .stderr(Stdio::from(stderr_log))
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                let message = format!("failed to spawn {}: {}", command.program, e);
                writeln!(log, "{message}")?;
                return Ok(LaunchOutcome {
                    status: RunStatus::SpawnFailed,
                    exit_code: None,
                    message: Some(message),
                    duration: start.elapsed(),
                });
            }
        };

        let waited = match self.timeout {
            Some(limit) => child.wait_timeout(limit),
            None => child.wait().map(Some),
        };

        let outcome = match waited {
            Ok(Some(status)) => LaunchOutcome {
                status: if status.success() {
                    RunStatus::Succeeded
                } else {
                    RunStatus::Failed
                },
                exit_code: status.code(),
                message: describe_exit(&status),
                duration: start.elapsed(),
            },
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait(); // reap
                let message = format!(
                    "killed after exceeding timeout of {:?}",
                    self.timeout.unwrap_or_default()
                );
                writeln!(log, "{message}")?;
                LaunchOutcome {
                    status: RunStatus::TimedOut,
                    exit_code: None,
                    message: Some(message),
                    duration: start.elapsed(),
                }
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                let message = format!("waiting for {}: {}", command.program, e);
                writeln!(log, "{message}")?;
                LaunchOutcome {
                    status: RunStatus::Failed,
                    exit_code: None,
                    message: Some(message),
                    duration: start.elapsed(),
                }
            }
        };

        Ok(outcome)
    }
}

fn describe_exit(status: &ExitStatus) -> Option<String> {
    if status.success() {
        return None;
    }
    match status.code() {
        Some(code) => Some(format!("exited with status {code}")),
        None => Some("terminated by signal".to_string()),
    }
}

/// Extension trait to add `wait_timeout` to `Child`.
trait ChildExt {
    fn wait_timeout(&mut self, timeout: Duration) -> std::io::Result<Option<ExitStatus>>;
}

impl ChildExt for Child {
    fn wait_timeout(&mut self, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
        let start = Instant::now();
        let poll_interval = Duration::from_millis(50);

        loop {
            match self.try_wait()? {
                Some(status) => return Ok(Some(status)),
                None => {
                    if start.elapsed() >= timeout {
                        return Ok(None);
                    }
                    std::thread::sleep(poll_interval);
                }
            }
        }
    }
}
