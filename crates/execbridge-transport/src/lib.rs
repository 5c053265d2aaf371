//! TCP transport for the execbridge client.
//!
//! Provides the duplex byte channel the framing protocol runs over. One
//! connection carries the whole session: the session layer clones the
//! transport so the input-forwarding worker and the control loop each hold
//! their own handle. The worker is the only writer and the control loop the
//! only reader, so neither direction needs a lock.

pub mod error;
pub mod tcp;

pub use error::{Result, TransportError};
pub use tcp::TcpTransport;
