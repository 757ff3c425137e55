use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

pub mod jobs;
pub mod launcher;
pub mod signal;

#[derive(Debug)]
pub enum ProcessError {
    /// The operating system refused to create a child process. Fatal to
    /// the shell.
    SpawnFailed(std::io::Error),
    WaitFailed(std::io::Error),
    SignalSetup(String),
}

impl From<std::io::Error> for ProcessError {
    fn from(e: std::io::Error) -> Self {
        ProcessError::SpawnFailed(e)
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::SpawnFailed(e) => write!(f, "failed to create child process: {}", e),
            ProcessError::WaitFailed(e) => write!(f, "failed to wait for child process: {}", e),
            ProcessError::SignalSetup(msg) => write!(f, "signal setup error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Termination description of a finished child.
///
/// The shell remembers one of these for the most recent foreground
/// command; the job tracker builds them for background completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Exited(i32),
    Signaled(i32),
}

impl Default for CommandStatus {
    fn default() -> Self {
        CommandStatus::Exited(0)
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Exited(code) => write!(f, "exit value {}", code),
            CommandStatus::Signaled(signo) => write!(f, "terminated by signal {}", signo),
        }
    }
}

impl CommandStatus {
    /// Classifies a raw wait status as returned by `waitpid`.
    pub fn from_raw(status: libc::c_int) -> Self {
        if libc::WIFSIGNALED(status) {
            CommandStatus::Signaled(libc::WTERMSIG(status))
        } else {
            CommandStatus::Exited(libc::WEXITSTATUS(status))
        }
    }
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        match status.signal() {
            Some(signo) => CommandStatus::Signaled(signo),
            None => CommandStatus::Exited(status.code().unwrap_or(1)),
        }
    }
}
