//! Wire framing for the execbridge protocol.
//!
//! Three message shapes share one byte stream (all integers little-endian,
//! 4 bytes unless noted):
//!
//! - Startup frame: `i32 count`, then `count` times `i32 len` + `len` raw bytes
//! - Data frame: `'s'` + `i32 len` + `len` raw bytes
//! - Exit message: `'e'` + one exit-status byte
//!
//! Everything is length-prefixed, never delimiter-based, so payloads may
//! contain the tag bytes themselves. The outbound direction carries exactly
//! one startup frame followed by data frames; the inbound direction carries
//! exactly one exit message.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_data, decode_startup, encode_data, encode_exit, encode_startup, ControlMessage,
    DATA_TAG, EXIT_TAG, MAX_FIELD_LEN,
};
pub use error::{FrameError, Result};
pub use reader::ControlReader;
pub use writer::FrameWriter;
