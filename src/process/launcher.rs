use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::process::CommandExt;
use std::process::Stdio;

use libc::pid_t;

use super::jobs::JobTable;
use super::{CommandStatus, ProcessError};
use crate::parser::Command;

/// Spawns the program described by `cmd`.
///
/// Foreground commands are waited on and their outcome recorded in
/// `status`; background commands are announced, registered in the job
/// table, and left running. A spawn failure at the OS level is fatal and
/// propagates to the caller; everything the child itself could have
/// failed at (bad redirect path, unknown program) is reported here and
/// recorded as a nonzero foreground status instead.
pub fn launch(
    cmd: &Command,
    jobs: &mut JobTable,
    status: &mut CommandStatus,
) -> Result<(), ProcessError> {
    let mut child_cmd = std::process::Command::new(&cmd.program);
    child_cmd.args(&cmd.args[1..]);

    // Redirection targets are resolved before any child exists, so a bad
    // path never launches a half-redirected command.
    if !apply_redirection(cmd, &mut child_cmd, status) {
        return Ok(());
    }

    let background = cmd.background;
    unsafe {
        child_cmd.pre_exec(move || {
            // Children never react to the mode toggle. Foreground
            // children take back the default interrupt behavior;
            // background children stay immune to it.
            libc::signal(libc::SIGTSTP, libc::SIG_IGN);
            if background {
                libc::signal(libc::SIGINT, libc::SIG_IGN);
            } else {
                libc::signal(libc::SIGINT, libc::SIG_DFL);
            }
            Ok(())
        });
    }

    let mut child = match child_cmd.spawn() {
        Ok(child) => child,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
            eprintln!("venule: {}: {}", cmd.program, e);
            if !cmd.background {
                *status = CommandStatus::Exited(1);
            }
            return Ok(());
        }
        Err(e) => return Err(ProcessError::SpawnFailed(e)),
    };

    if cmd.background {
        let pid = child.id() as pid_t;
        println!("background pid is {}", pid);
        if let Err(full) = jobs.insert(pid) {
            eprintln!("venule: {}", full);
        }
        return Ok(());
    }

    let exit = child.wait().map_err(ProcessError::WaitFailed)?;
    let outcome = CommandStatus::from(exit);
    *status = outcome;

    // A foreground child killed by a signal is reported right away;
    // background terminations are reported later by the reaper.
    if matches!(outcome, CommandStatus::Signaled(_)) {
        println!("{}", outcome);
    }

    Ok(())
}

/// Wires up stdin and stdout for the child. Background commands with no
/// explicit target read from and write to the null device; foreground
/// commands inherit the shell's streams.
///
/// Returns false when a target path cannot be opened. The failure is
/// reported, a foreground command records `exit value 1`, and the launch
/// is abandoned.
fn apply_redirection(
    cmd: &Command,
    child_cmd: &mut std::process::Command,
    status: &mut CommandStatus,
) -> bool {
    if let Some(path) = &cmd.stdin_redirect {
        match File::open(path) {
            Ok(file) => {
                child_cmd.stdin(Stdio::from(file));
            }
            Err(_) => {
                println!("cannot open {} for input", path);
                if !cmd.background {
                    *status = CommandStatus::Exited(1);
                }
                return false;
            }
        }
    } else if cmd.background {
        child_cmd.stdin(Stdio::null());
    }

    if let Some(path) = &cmd.stdout_redirect {
        match open_output(path) {
            Ok(file) => {
                child_cmd.stdout(Stdio::from(file));
            }
            Err(_) => {
                println!("cannot open {} for output", path);
                if !cmd.background {
                    *status = CommandStatus::Exited(1);
                }
                return false;
            }
        }
    } else if cmd.background {
        child_cmd.stdout(Stdio::null());
    }

    true
}

fn open_output(path: &str) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o640)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn launch_line(line: &str, jobs: &mut JobTable, status: &mut CommandStatus) {
        let cmd = parser::parse(line, false)
            .expect("test line should parse")
            .expect("test line should hold a command");
        launch(&cmd, jobs, status).expect("launch should not be fatal");
    }

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("venule_test_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_foreground_exit_codes_are_recorded() {
        let mut jobs = JobTable::new();
        let mut status = CommandStatus::default();

        launch_line("false", &mut jobs, &mut status);
        assert_eq!(status, CommandStatus::Exited(1));

        launch_line("true", &mut jobs, &mut status);
        assert_eq!(status, CommandStatus::Exited(0));
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_unknown_program_is_not_fatal() {
        let mut jobs = JobTable::new();
        let mut status = CommandStatus::default();

        launch_line("definitely-not-a-real-program-7831", &mut jobs, &mut status);
        assert_eq!(status, CommandStatus::Exited(1));
    }

    #[test]
    fn test_redirection_round_trip() {
        let input = temp_path("redir_in.txt");
        let output = temp_path("redir_out.txt");
        fs::write(&input, "through the shell\n").expect("test input should be writable");

        let line = format!(
            "cat < {} > {}",
            input.display(),
            output.display()
        );
        let mut jobs = JobTable::new();
        let mut status = CommandStatus::default();
        launch_line(&line, &mut jobs, &mut status);

        assert_eq!(status, CommandStatus::Exited(0));
        let copied = fs::read_to_string(&output).expect("output file should exist");
        assert_eq!(copied, "through the shell\n");

        let _ = fs::remove_file(input);
        let _ = fs::remove_file(output);
    }

    #[test]
    fn test_output_redirect_truncates() {
        let output = temp_path("trunc_out.txt");
        fs::write(&output, "stale stale stale stale").expect("seed file should be writable");

        let line = format!("echo fresh > {}", output.display());
        let mut jobs = JobTable::new();
        let mut status = CommandStatus::default();
        launch_line(&line, &mut jobs, &mut status);

        let contents = fs::read_to_string(&output).expect("output file should exist");
        assert_eq!(contents, "fresh\n");

        let _ = fs::remove_file(output);
    }

    #[test]
    fn test_unreadable_input_aborts_the_launch() {
        let missing = temp_path("no_such_input.txt");
        let line = format!("cat < {}", missing.display());

        let mut jobs = JobTable::new();
        let mut status = CommandStatus::default();
        launch_line(&line, &mut jobs, &mut status);

        assert_eq!(status, CommandStatus::Exited(1));
    }

    #[test]
    fn test_background_launch_returns_immediately() {
        let mut jobs = JobTable::new();
        let mut status = CommandStatus::default();

        launch_line("sleep 30 &", &mut jobs, &mut status);

        // Control came back while the child still runs, the job is
        // tracked, and the foreground status is untouched.
        assert_eq!(jobs.len(), 1);
        assert_eq!(status, CommandStatus::Exited(0));

        jobs.kill_all();
        assert!(jobs.is_empty());
    }
}
