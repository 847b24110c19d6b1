//! Process hardening for key material
//!
//! Recovered shares and child keys live in process memory for the whole
//! run. Disabling core dumps keeps a crash from writing them to disk.

use std::sync::atomic::{AtomicBool, Ordering};

static CORE_DUMPS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Disable core dumps for the current process. Best effort; returns `true`
/// on success. Safe to call more than once.
///
/// # Example
/// ```
/// mpc_recovery_core::memory::disable_core_dumps();
/// ```
pub fn disable_core_dumps() -> bool {
    if CORE_DUMPS_DISABLED.swap(true, Ordering::SeqCst) {
        return true;
    }

    #[cfg(unix)]
    {
        // SAFETY: setrlimit with RLIMIT_CORE=0 is a standard POSIX operation
        let result = unsafe {
            let rlim = libc::rlimit {
                rlim_cur: 0,
                rlim_max: 0,
            };
            libc::setrlimit(libc::RLIMIT_CORE, &rlim)
        };
        if result != 0 {
            log::warn!(
                "failed to disable core dumps: {}",
                std::io::Error::last_os_error()
            );
            CORE_DUMPS_DISABLED.store(false, Ordering::SeqCst);
            return false;
        }
        true
    }

    #[cfg(not(unix))]
    {
        log::warn!("core dump prevention not supported on this platform");
        false
    }
}
