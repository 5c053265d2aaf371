use std::io;
use std::time::Duration;

/// Source of local bytes to forward to the remote process.
///
/// `poll_ready` waits up to `timeout` for data; `read_chunk` then reads
/// whatever is immediately available. Abstracted so the forwarding loop can
/// be driven by scripted input in tests.
pub trait InputSource {
    /// Wait up to `timeout` for input to become readable.
    fn poll_ready(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read available bytes into `buf`, returning the count.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Standard input, polled with `poll(2)`.
///
/// The forwarding loop needs a bounded wait so it can observe its stop flag
/// while no input is arriving; a blocking `read` on stdin cannot be
/// interrupted portably. Windows console waiting will be added later.
#[cfg(unix)]
#[derive(Debug, Default)]
pub struct StdinInput {
    _private: (),
}

#[cfg(unix)]
impl StdinInput {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(unix)]
impl InputSource for StdinInput {
    fn poll_ready(&mut self, timeout: Duration) -> io::Result<bool> {
        let mut fds = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;

        // SAFETY: `fds` is a valid pollfd array of length 1 for the duration
        // of the call.
        let rc = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
        match rc {
            -1 => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
            0 => Ok(false),
            _ => Ok(fds.revents & (libc::POLLIN | libc::POLLHUP) != 0),
        }
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            // SAFETY: `buf` is a valid writable region of `buf.len()` bytes
            // owned by the caller.
            let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
            if n >= 0 {
                return Ok(n as usize);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}
