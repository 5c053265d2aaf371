use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use tracing::info;

use crate::error::{Result, TransportError};

/// A connected TCP channel to the remote agent.
///
/// Wraps a [`TcpStream`] and implements `Read + Write`. [`try_clone`] yields
/// a second handle to the same connection so the two protocol directions can
/// be driven from separate threads.
///
/// [`try_clone`]: TcpTransport::try_clone
pub struct TcpTransport {
    stream: TcpStream,
    addr: String,
}

impl TcpTransport {
    /// Connect to `host:port` (blocking).
    ///
    /// Resolution failures are reported as [`TransportError::InvalidAddress`];
    /// a refused or unreachable target as [`TransportError::Connect`].
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let target = (host, port)
            .to_socket_addrs()
            .map_err(|_| TransportError::InvalidAddress { addr: addr.clone() })?
            .next()
            .ok_or_else(|| TransportError::InvalidAddress { addr: addr.clone() })?;

        let stream = TcpStream::connect(target).map_err(|source| TransportError::Connect {
            addr: addr.clone(),
            source,
        })?;
        // Data frames are small and latency-sensitive.
        let _ = stream.set_nodelay(true);

        info!(%addr, "connected to remote agent");
        Ok(Self { stream, addr })
    }

    /// Create a second handle to the same connection (new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        let stream = self.stream.try_clone()?;
        Ok(Self {
            stream,
            addr: self.addr.clone(),
        })
    }

    /// Shut down both directions of the connection.
    pub fn shutdown(&self) -> Result<()> {
        self.stream.shutdown(std::net::Shutdown::Both)?;
        Ok(())
    }

    /// The `host:port` this transport was connected to.
    pub fn peer_addr(&self) -> &str {
        &self.addr
    }
}

impl Read for TcpTransport {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TcpTransport {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.stream.flush()
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("addr", &self.addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn connect_and_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = std::thread::spawn(move || {
            let (mut stream, _addr) = listener.accept().unwrap();
            let mut buf = [0u8; 4];
            stream.read_exact(&mut buf).unwrap();
            assert_eq!(&buf, b"ping");
            stream.write_all(b"pong").unwrap();
        });

        let mut transport = TcpTransport::connect("127.0.0.1", port).unwrap();
        assert_eq!(transport.peer_addr(), format!("127.0.0.1:{port}"));

        transport.write_all(b"ping").unwrap();
        let mut buf = [0u8; 4];
        transport.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"pong");

        server.join().unwrap();
    }

    #[test]
    fn cloned_handles_share_the_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = std::thread::spawn(move || {
            let (mut stream, _addr) = listener.accept().unwrap();
            let mut buf = [0u8; 5];
            stream.read_exact(&mut buf).unwrap();
            stream.write_all(&buf).unwrap();
        });

        let transport = TcpTransport::connect("127.0.0.1", port).unwrap();
        let mut writer = transport.try_clone().unwrap();
        let mut reader = transport;

        writer.write_all(b"hello").unwrap();
        let mut buf = [0u8; 5];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");

        server.join().unwrap();
    }

    #[test]
    fn connection_refused_is_a_connect_error() {
        // Bind to grab a free port, then release it before connecting.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = TcpTransport::connect("127.0.0.1", port);
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }

    #[test]
    fn unresolvable_host_is_an_invalid_address() {
        let result = TcpTransport::connect("", 1);
        assert!(matches!(
            result,
            Err(TransportError::InvalidAddress { .. })
        ));
    }
}
