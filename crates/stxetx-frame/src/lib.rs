//! Byte-stuffed STX/ETX framing for serial byte streams.
//!
//! Turns a structured message (type, flags, optional payload, checksum) into
//! a self-delimiting, transparent wire frame and parses it back:
//!
//! ```text
//! <STX> <type> <flags> <ESC><len> <payload bytes>* <checksum> <ETX>
//! ```
//!
//! Interior bytes are escape-stuffed so arbitrary binary payloads can carry
//! the reserved delimiter values; the length field holds the stuffed
//! payload's *wire* size, so a decoder can always recover exact frame
//! boundaries. Encode and decode are single-pass and work entirely in
//! caller-supplied buffers — the codec never allocates.
//!
//! [`FrameReader`] and [`FrameWriter`] adapt the codec to `std::io` streams
//! for callers that own a serial port or socket.

pub mod codec;
pub mod error;
pub mod escape;
pub mod message;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, encode_frame, encoded_len, max_encoded_len, Frame, LEN_FIELD_WIRE_SIZE,
    MAX_WIRE_PAYLOAD, MIN_WIRE_SIZE,
};
pub use error::{FrameError, Result};
pub use escape::{ESC, ETX, STX};
pub use reader::FrameReader;
pub use writer::FrameWriter;
