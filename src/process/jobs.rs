use std::fmt;
use std::ptr;

use libc::pid_t;

use super::CommandStatus;

/// Upper bound on concurrently tracked background jobs.
pub const MAX_JOBS: usize = 20;

/// Rejected insertion into a full job table. The pid is carried so the
/// caller can still report which child went untracked.
#[derive(Debug, PartialEq, Eq)]
pub struct JobTableFull(pub pid_t);

impl fmt::Display for JobTableFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "job table is full ({} jobs); pid {} will not be tracked",
            MAX_JOBS, self.0
        )
    }
}

/// Fixed-capacity table of live background process ids.
///
/// A zero slot is empty; insertion takes the first empty slot and slot
/// order carries no meaning. The table is only ever touched from the
/// shell's own thread.
pub struct JobTable {
    slots: [pid_t; MAX_JOBS],
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTable {
    pub fn new() -> Self {
        JobTable {
            slots: [0; MAX_JOBS],
        }
    }

    /// Tracks a freshly spawned background pid.
    pub fn insert(&mut self, pid: pid_t) -> Result<(), JobTableFull> {
        for slot in self.slots.iter_mut() {
            if *slot == 0 {
                *slot = pid;
                return Ok(());
            }
        }
        Err(JobTableFull(pid))
    }

    /// Clears the slot holding `pid`. Returns false when the pid was not
    /// tracked, which is normal for children reaped before ever being
    /// inserted.
    pub fn remove(&mut self, pid: pid_t) -> bool {
        for slot in self.slots.iter_mut() {
            if *slot == pid {
                *slot = 0;
                return true;
            }
        }
        false
    }

    pub fn pids(&self) -> impl Iterator<Item = pid_t> + '_ {
        self.slots.iter().copied().filter(|&pid| pid != 0)
    }

    pub fn len(&self) -> usize {
        self.pids().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-blocking check for any one finished descendant, tracked or not.
    ///
    /// On a hit the pid is cleared from the table (no-op when untracked)
    /// and its classified outcome is returned for the caller to report.
    pub fn reap_finished(&mut self) -> Option<(pid_t, CommandStatus)> {
        let mut raw: libc::c_int = 0;
        let pid = unsafe { libc::waitpid(-1, &mut raw, libc::WNOHANG) };
        if pid <= 0 {
            return None;
        }

        self.remove(pid);
        Some((pid, CommandStatus::from_raw(raw)))
    }

    /// Forcefully terminates every tracked job, with one non-blocking
    /// reap attempt per pid. Used on shell exit.
    pub fn kill_all(&mut self) {
        for slot in self.slots.iter_mut() {
            if *slot != 0 {
                unsafe {
                    libc::kill(*slot, libc::SIGKILL);
                    libc::waitpid(*slot, ptr::null_mut(), libc::WNOHANG);
                }
                *slot = 0;
            }
        }
    }
}
