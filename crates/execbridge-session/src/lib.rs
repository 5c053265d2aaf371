//! Session lifecycle for the execbridge protocol engine.
//!
//! One session binds one transport connection. [`Session::begin`] sends the
//! startup frame and spawns the input-forwarding worker, [`run_control_loop`]
//! blocks for the remote exit message, and [`Session::end`] stops and joins
//! the worker so the transport can be closed safely afterward.
//!
//! Exactly two execution contexts run per session: the caller's thread in the
//! control loop and one background worker in the forwarding loop. The worker
//! is the stream's only writer and the control loop its only reader.

pub mod connector;
pub mod error;
pub mod input;
pub mod session;

pub use connector::connect;
pub use error::{Result, SessionError};
pub use input::InputSource;
#[cfg(unix)]
pub use input::StdinInput;
pub use session::{run_control_loop, Session, POLL_INTERVAL, READ_CHUNK_SIZE};
