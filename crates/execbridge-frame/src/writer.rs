use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_data, encode_startup};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;

/// Writes outbound frames to any `Write` stream.
///
/// Every send transmits the whole frame or fails: short writes are retried,
/// a zero-length write is a closed connection.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Serialize and send the startup parameter list (blocking).
    ///
    /// The session sends this exactly once, before any data frame.
    pub fn send_startup(&mut self, params: &[String]) -> Result<()> {
        self.buf.clear();
        encode_startup(params, &mut self.buf)?;
        self.write_buffered()
    }

    /// Send one data frame carrying `chunk` (blocking).
    pub fn send_data(&mut self, chunk: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_data(chunk, &mut self.buf)?;
        self.write_buffered()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
