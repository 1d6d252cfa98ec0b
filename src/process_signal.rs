//! Termination request for a deploy child blocked on an unanswered prompt.

use std::io;
use std::process::Child;

/// SIGTERM `pid`. A process that is already gone (`ESRCH`) counts as stopped.
#[cfg(unix)]
fn send_sigterm(pid: u32) -> io::Result<()> {
    let pid = libc::pid_t::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("pid {pid} out of range")))?;
    // SAFETY: `kill` only takes integers; errno is read before any other libc call.
    if unsafe { libc::kill(pid, libc::SIGTERM) } == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        Ok(())
    } else {
        Err(err)
    }
}

/// Ask `child` to stop without waiting for it to do so.
///
/// A child that has already been reaped is left alone so its recycled pid is
/// never signalled.
pub(crate) fn request_termination(child: &mut Child) -> io::Result<()> {
    if child.try_wait()?.is_some() {
        return Ok(());
    }

    #[cfg(unix)]
    {
        send_sigterm(child.id())
    }

    #[cfg(not(unix))]
    {
        child.kill()
    }
}
