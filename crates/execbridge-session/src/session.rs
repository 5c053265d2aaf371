use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use execbridge_frame::{ControlMessage, ControlReader, FrameWriter};
use tracing::{debug, warn};

use crate::error::{Result, SessionError};
use crate::input::InputSource;

/// Bounded wait on one poll of local input. The stop flag is observed at
/// least once per interval, so this is also the worst-case stop latency.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Largest chunk carried by a single data frame.
pub const READ_CHUNK_SIZE: usize = 1024;

/// Delay before re-polling after a zero-byte read.
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// One protocol engine bound to one transport connection.
///
/// Owns the forwarding worker's lifecycle: created by [`Session::begin`],
/// stopped and joined by [`Session::end`]. Each session has its own stop
/// flag; nothing here is process-global.
pub struct Session {
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<Result<()>>>,
}

impl Session {
    /// Send the startup frame and start the input-forwarding worker.
    ///
    /// The startup send completes before the worker exists, so it is always
    /// the first bytes on the wire and precedes every data frame.
    pub fn begin<W, I>(mut writer: FrameWriter<W>, input: I, params: &[String]) -> Result<Self>
    where
        W: Write + Send + 'static,
        I: InputSource + Send + 'static,
    {
        writer.send_startup(params)?;
        debug!(count = params.len(), "startup frame sent");

        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let worker = thread::spawn(move || forward_loop(writer, input, worker_stop));

        Ok(Self {
            stop,
            worker: Some(worker),
        })
    }

    /// Stop the forwarding worker and wait for it to finish.
    ///
    /// After this returns no further frame can be sent, so the transport may
    /// be closed immediately. A send failure inside the worker surfaces here
    /// rather than being swallowed.
    pub fn end(mut self) -> Result<()> {
        self.stop.store(true, Ordering::SeqCst);
        match self.worker.take() {
            Some(handle) => match handle.join() {
                Ok(result) => result,
                Err(_) => Err(SessionError::WorkerPanicked),
            },
            None => Ok(()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Only reached when end() was never called; it must still be
        // impossible to leak a running worker.
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

/// Block until the remote agent reports the process exit status.
///
/// The protocol defines exactly one inbound round: the first message must be
/// the exit notification, and nothing is read after it. Anything else is a
/// protocol error.
pub fn run_control_loop<R: Read>(reader: &mut ControlReader<R>) -> Result<u8> {
    let ControlMessage::Exit(code) = reader.read_message()?;
    debug!(code, "remote process exited");
    Ok(code)
}

fn forward_loop<W, I>(mut writer: FrameWriter<W>, mut input: I, stop: Arc<AtomicBool>) -> Result<()>
where
    W: Write,
    I: InputSource,
{
    let mut buf = [0u8; READ_CHUNK_SIZE];

    while !stop.load(Ordering::SeqCst) {
        match input.poll_ready(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => return Err(SessionError::Input(err)),
        }

        let read = input.read_chunk(&mut buf).map_err(SessionError::Input)?;
        if read == 0 {
            // Readable but nothing arrived: transient, not end-of-input.
            thread::sleep(RETRY_DELAY);
            continue;
        }

        if let Err(err) = writer.send_data(&buf[..read]) {
            warn!(%err, "data frame send failed; stopping forwarder");
            return Err(err.into());
        }
    }

    debug!("forwarding worker stopped");
    Ok(())
}
