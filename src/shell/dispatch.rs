use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use crate::error::ShellError;
use crate::expand;
use crate::parser;
use crate::process::launcher;

/// What the loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    Continue,
    Exit,
}

pub(crate) trait Dispatch {
    fn handle_line(&mut self, line: &str) -> Result<Disposition, ShellError>;
}

impl Dispatch for super::Shell {
    fn handle_line(&mut self, line: &str) -> Result<Disposition, ShellError> {
        let expanded = expand::expand_pid(line, std::process::id());
        let foreground_only = self.foreground_only.load(Ordering::SeqCst);

        let cmd = match parser::parse(&expanded, foreground_only) {
            Ok(Some(cmd)) => cmd,
            // Blank line or comment: nothing to do, nothing changes
            Ok(None) => return Ok(Disposition::Continue),
            Err(e) => {
                eprintln!("{}", self.style.error(&format!("venule: {}", e)));
                return Ok(Disposition::Continue);
            }
        };

        match cmd.program.as_str() {
            "exit" => {
                self.exit_shell();
                Ok(Disposition::Exit)
            }
            "cd" => {
                self.change_directory(cmd.args.get(1).map(String::as_str));
                Ok(Disposition::Continue)
            }
            "status" => {
                println!("{}", self.status);
                Ok(Disposition::Continue)
            }
            _ => {
                launcher::launch(&cmd, &mut self.jobs, &mut self.status)?;
                Ok(Disposition::Continue)
            }
        }
    }
}

impl super::Shell {
    /// Changes the working directory to the given path, or to the home
    /// directory with no argument. Failure is surfaced as a diagnostic
    /// and leaves both the directory and the shell status untouched.
    pub(crate) fn change_directory(&mut self, path: Option<&str>) {
        let target = match path {
            Some(p) => PathBuf::from(p),
            None => match dirs::home_dir() {
                Some(home) => home,
                None => {
                    eprintln!(
                        "{}",
                        self.style.error("venule: cd: home directory not found")
                    );
                    return;
                }
            },
        };

        if let Err(e) = env::set_current_dir(&target) {
            eprintln!(
                "{}",
                self.style
                    .error(&format!("venule: cd: {}: {}", target.display(), e))
            );
        }
    }

    /// Kills every tracked background job before the shell goes away.
    pub(crate) fn exit_shell(&mut self) {
        self.jobs.kill_all();
    }

    pub(crate) fn reap_background(&mut self) {
        if let Some((pid, status)) = self.jobs.reap_finished() {
            println!("background pid {} is done: {}", pid, status);
        }
    }
}
