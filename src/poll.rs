use std::os::fd::BorrowedFd;
use std::time::Duration;

use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

/// Block until `fd` becomes readable or the timeout elapses.
///
/// Returns `Ok(false)` on timeout. `None` waits forever. Timeouts beyond the
/// representable range are clamped to the maximum.
pub(crate) fn wait_for_readable(
    fd: BorrowedFd<'_>,
    timeout: Option<Duration>,
) -> std::io::Result<bool> {
    let pollfd = PollFd::new(fd, PollFlags::POLLIN);
    let timeout = match timeout {
        Some(t) => PollTimeout::try_from(t.as_millis()).unwrap_or(PollTimeout::MAX),
        None => PollTimeout::NONE,
    };

    loop {
        match poll(&mut [pollfd], timeout) {
            Ok(0) => return Ok(false),
            Ok(_) => return Ok(true),
            Err(nix::errno::Errno::EINTR) => continue,
            Err(e) => return Err(crate::errors::errno_to_io(e)),
        }
    }
}
