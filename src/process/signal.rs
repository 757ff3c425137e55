use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_hook::consts::signal::SIGTSTP;

use super::ProcessError;

const ENTER_BANNER: &[u8] = b"\nEntering foreground-only mode (& is now ignored)\n";
const EXIT_BANNER: &[u8] = b"\nExiting foreground-only mode\n";

/// Installs the SIGTSTP handler that toggles foreground-only mode.
///
/// The handler runs in signal context and is restricted to
/// async-signal-safe operations: one atomic flip of the shared flag and
/// one raw write of a fixed banner to fd 1. Nothing else may go in here,
/// in particular no buffered or allocating output.
pub fn install_mode_toggle(flag: Arc<AtomicBool>) -> Result<(), ProcessError> {
    let register = unsafe {
        signal_hook::low_level::register(SIGTSTP, move || {
            let was_foreground_only = flag.fetch_xor(true, Ordering::SeqCst);
            let banner = if was_foreground_only {
                EXIT_BANNER
            } else {
                ENTER_BANNER
            };
            unsafe {
                libc::write(
                    libc::STDOUT_FILENO,
                    banner.as_ptr() as *const libc::c_void,
                    banner.len(),
                );
            }
        })
    };

    register
        .map(|_| ())
        .map_err(|e| ProcessError::SignalSetup(e.to_string()))
}

/// Makes the shell process itself immune to the interrupt signal. Only
/// foreground children restore the default terminating behavior, inside
/// the launcher's pre-exec hook.
pub fn ignore_interrupts() -> Result<(), ProcessError> {
    ctrlc::set_handler(|| {}).map_err(|e| ProcessError::SignalSetup(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_pair_restores_original_mode() {
        let flag = Arc::new(AtomicBool::new(false));
        install_mode_toggle(flag.clone()).expect("handler should install");

        unsafe { libc::raise(SIGTSTP) };
        assert!(flag.load(Ordering::SeqCst));

        unsafe { libc::raise(SIGTSTP) };
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_banners_match_the_documented_interface() {
        assert_eq!(
            ENTER_BANNER,
            b"\nEntering foreground-only mode (& is now ignored)\n"
        );
        assert_eq!(EXIT_BANNER, b"\nExiting foreground-only mode\n");
    }
}
