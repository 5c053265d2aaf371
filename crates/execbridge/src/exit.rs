use std::fmt;

use execbridge_frame::FrameError;
use execbridge_session::SessionError;
use execbridge_transport::TransportError;

use crate::config::ConfigError;

/// Fixed sentinel status for every bridge failure. Remote exit codes 0-255
/// pass through untouched on the success path.
pub const BRIDGE_ERROR: i32 = 99;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn config_error(err: ConfigError) -> CliError {
    CliError::new(BRIDGE_ERROR, format!("config error: {err}"))
}

pub fn transport_error(err: TransportError) -> CliError {
    CliError::new(BRIDGE_ERROR, format!("socket error: {err}"))
}

pub fn frame_error(err: FrameError) -> CliError {
    match err {
        FrameError::Io(_) | FrameError::ConnectionClosed => {
            CliError::new(BRIDGE_ERROR, format!("socket error: {err}"))
        }
        other => CliError::new(BRIDGE_ERROR, format!("protocol error: {other}")),
    }
}

pub fn session_error(err: SessionError) -> CliError {
    match err {
        SessionError::Transport(err) => transport_error(err),
        SessionError::Frame(err) => frame_error(err),
        other => CliError::new(BRIDGE_ERROR, format!("session error: {other}")),
    }
}
