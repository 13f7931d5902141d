//! Process Signal Hook.
//!
//! Handlers only record the signal number; the run loop polls [`take`] once
//! per cycle and reacts outside signal context:
//! * `SIGINT`: flush statistics and stop with a failure status.
//! * `SIGUSR1`: flush statistics and keep simulating.
//!
//! A `SIGSEGV` handler cannot return to the faulting code, so it writes a
//! fixed message and terminates the process directly.

use std::sync::atomic::{AtomicI32, Ordering};

use crate::common::error::Result;
use crate::stats::SimStats;

static PENDING: AtomicI32 = AtomicI32::new(0);

/// What the run loop should do about a received signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalAction {
    /// Print statistics and terminate with a failure status.
    Abort(i32),
    /// Print statistics and continue.
    Report(i32),
}

/// Records `signal` for the next [`take`]. Async-signal-safe.
pub fn record(signal: i32) {
    PENDING.store(signal, Ordering::SeqCst);
}

/// Returns and clears the last recorded signal.
pub fn take() -> Option<SignalAction> {
    match PENDING.swap(0, Ordering::SeqCst) {
        0 => None,
        libc::SIGUSR1 => Some(SignalAction::Report(libc::SIGUSR1)),
        signal => Some(SignalAction::Abort(signal)),
    }
}

/// Flushes `stats` for `action`. Returns `true` if the simulation should
/// continue.
pub fn handle(action: SignalAction, stats: &mut SimStats) -> bool {
    match action {
        SignalAction::Abort(signal) => {
            eprintln!("\n[!] Interrupted by signal {}", signal);
            stats.finish();
            stats.print();
            false
        }
        SignalAction::Report(signal) => {
            eprintln!("\n[*] Received signal {}. Printing statistics", signal);
            stats.print();
            eprintln!("[*] -------------------- Continuing Simulation ------------------");
            true
        }
    }
}

extern "C" fn record_signal(signal: libc::c_int) {
    record(signal);
}

extern "C" fn fatal_fault(_signal: libc::c_int) {
    const MSG: &[u8] = b"\n[!] FATAL: Segmentation fault.\n";
    // SAFETY: write(2) and _exit(2) are async-signal-safe.
    unsafe {
        libc::write(
            libc::STDERR_FILENO,
            MSG.as_ptr() as *const libc::c_void,
            MSG.len(),
        );
        libc::_exit(libc::EXIT_FAILURE);
    }
}

const HOOKED: [libc::c_int; 3] = [libc::SIGINT, libc::SIGUSR1, libc::SIGSEGV];

fn set_handler(signal: libc::c_int, handler: libc::sighandler_t) -> Result<()> {
    // SAFETY: every handler passed here only touches an atomic or calls
    // async-signal-safe functions.
    let previous = unsafe { libc::signal(signal, handler) };
    if previous == libc::SIG_ERR {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}

/// Installs the handlers for `SIGINT`, `SIGUSR1` and `SIGSEGV`.
pub fn install() -> Result<()> {
    set_handler(libc::SIGINT, record_signal as libc::sighandler_t)?;
    set_handler(libc::SIGUSR1, record_signal as libc::sighandler_t)?;
    set_handler(libc::SIGSEGV, fatal_fault as libc::sighandler_t)
}

/// Puts the default disposition back on every signal [`install`] hooks.
pub fn restore() -> Result<()> {
    for signal in HOOKED {
        set_handler(signal, libc::SIG_DFL)?;
    }
    Ok(())
}
