use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rustyline::DefaultEditor;

mod dispatch;

use crate::config::Config;
use crate::error::ShellError;
use crate::flags::Flags;
use crate::highlight::MessageStyle;
use crate::process::jobs::JobTable;
use crate::process::{signal, CommandStatus};

use dispatch::{Dispatch, Disposition};

pub struct Shell {
    pub(crate) editor: DefaultEditor,
    pub(crate) flags: Flags,
    pub(crate) config: Config,
    pub(crate) style: MessageStyle,
    pub(crate) jobs: JobTable,
    pub(crate) status: CommandStatus,
    pub(crate) foreground_only: Arc<AtomicBool>,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let editor = DefaultEditor::new()?;
        let config = Config::new(&flags)?;

        Ok(Shell {
            editor,
            flags,
            config,
            style: MessageStyle::new(),
            jobs: JobTable::new(),
            status: CommandStatus::default(),
            foreground_only: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        // The shell itself never dies to Ctrl-C, and Ctrl-Z toggles
        // foreground-only mode instead of stopping the process.
        signal::ignore_interrupts()?;
        signal::install_mode_toggle(self.foreground_only.clone())?;

        if !self.flags.is_set("quiet") {
            println!("venule {}", env!("CARGO_PKG_VERSION"));
        }

        if self.run_startup_file()? == Disposition::Exit {
            return Ok(());
        }

        loop {
            match self.editor.readline(": ") {
                Ok(line) => {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        if !self.flags.is_set("quiet") {
                            eprintln!("Warning: Couldn't add to history: {}", e);
                        }
                    }

                    if self.handle_line(&line)? == Disposition::Exit {
                        break;
                    }
                }
                // Ctrl-C at the prompt just gives a fresh prompt
                Err(rustyline::error::ReadlineError::Interrupted) => {}
                // End of input behaves like the exit builtin
                Err(rustyline::error::ReadlineError::Eof) => {
                    self.exit_shell();
                    break;
                }
                Err(e) => {
                    eprintln!("{}", self.style.error(&format!("venule: {}", e)));
                }
            }

            // One non-blocking reap per cycle, before the next prompt
            self.reap_background();
        }

        Ok(())
    }

    /// Feeds the startup file through the normal dispatch path. Reading
    /// problems are reported and skipped; the shell still comes up.
    fn run_startup_file(&mut self) -> Result<Disposition, ShellError> {
        let lines = match self.config.startup_lines() {
            Ok(lines) => lines,
            Err(e) => {
                if !self.flags.is_set("quiet") {
                    eprintln!("{}", self.style.error(&format!("venule: {}", e)));
                }
                return Ok(Disposition::Continue);
            }
        };

        for line in lines {
            if self.handle_line(&line)? == Disposition::Exit {
                return Ok(Disposition::Exit);
            }
        }

        Ok(Disposition::Continue)
    }
}
