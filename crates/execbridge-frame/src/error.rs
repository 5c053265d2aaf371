/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The peer sent a message tag this protocol does not define.
    #[error("unexpected message tag 0x{0:02x}")]
    UnexpectedTag(u8),

    /// An exit message ended before its status byte arrived.
    #[error("missing exit code")]
    MissingExitCode,

    /// A length or entry count exceeds what the wire format's i32 fields carry.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A decoded length or entry count is negative.
    #[error("invalid length field: {0}")]
    InvalidLength(i32),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete message was received.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
