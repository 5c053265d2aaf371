/// Errors that can occur over a session's lifetime.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] execbridge_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] execbridge_frame::FrameError),

    /// Local input could not be polled or read.
    #[error("local input error: {0}")]
    Input(std::io::Error),

    /// The forwarding worker panicked.
    #[error("forwarding worker panicked")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, SessionError>;
