use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::codec::{ControlMessage, EXIT_TAG};
use crate::error::{FrameError, Result};

/// Reads inbound control messages from any `Read` stream.
///
/// The inbound direction of the protocol is a single round: one tag byte
/// followed by a type-specific payload. Only the exit message is defined.
pub struct ControlReader<T> {
    inner: T,
}

impl<T: Read> ControlReader<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Read the next control message (blocking).
    ///
    /// Errors: [`FrameError::ConnectionClosed`] if the stream ends before a
    /// tag byte, [`FrameError::UnexpectedTag`] for an unknown tag, and
    /// [`FrameError::MissingExitCode`] if the stream ends between an exit tag
    /// and its status byte.
    pub fn read_message(&mut self) -> Result<ControlMessage> {
        let tag = self.read_byte()?.ok_or(FrameError::ConnectionClosed)?;
        match tag {
            EXIT_TAG => {
                let code = self.read_byte()?.ok_or(FrameError::MissingExitCode)?;
                trace!(code, "exit message received");
                Ok(ControlMessage::Exit(code))
            }
            other => Err(FrameError::UnexpectedTag(other)),
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
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

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
