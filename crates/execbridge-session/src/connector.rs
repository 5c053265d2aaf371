use execbridge_frame::{ControlReader, FrameWriter};
use execbridge_transport::TcpTransport;

use crate::error::Result;
use crate::session::Session;

/// Connect to a remote agent and begin a session forwarding local stdin.
///
/// Returns the session handle plus the control reader to pass to
/// [`run_control_loop`](crate::session::run_control_loop). The caller ends
/// the session on every exit path from the control loop.
pub fn connect(host: &str, port: u16, params: &[String]) -> Result<(Session, ControlReader<TcpTransport>)> {
    #[cfg(not(unix))]
    {
        let _ = (host, port, params);
        return Err(crate::error::SessionError::Input(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "execbridge-session requires poll(2) on standard input (Windows support planned)",
        )));
    }

    #[cfg(unix)]
    {
        let transport = TcpTransport::connect(host, port)?;
        let reader_half = transport.try_clone()?;

        let writer = FrameWriter::new(transport);
        let session = Session::begin(writer, crate::input::StdinInput::new(), params)?;
        Ok((session, ControlReader::new(reader_half)))
    }
}
