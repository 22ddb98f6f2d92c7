use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::codec::{self, Frame, MAX_WIRE_PAYLOAD};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 1024;

/// Reads complete frames from any `Read` byte stream.
///
/// Handles partial reads internally — callers always see whole frames. The
/// returned frame's payload borrows the reader's scratch buffer and stays
/// valid until the next call.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    scratch: [u8; MAX_WIRE_PAYLOAD],
}

impl<T: Read> FrameReader<T> {
    /// Create a frame reader over a byte stream.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            scratch: [0; MAX_WIRE_PAYLOAD],
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when the stream ends,
    /// whether cleanly between frames or in the middle of one. A structural
    /// decode error is returned as-is; resynchronization policy belongs to
    /// the caller.
    pub fn read_frame(&mut self) -> Result<Frame<'_>> {
        let raw = loop {
            if let Some(raw) = codec::decode_raw(&self.buf, &mut self.scratch)? {
                self.buf.advance(raw.wire_size);
                break raw;
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };
            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }
            self.buf.extend_from_slice(&chunk[..read]);
        };

        trace!(
            wire_size = raw.wire_size,
            payload_len = raw.logical_len,
            "frame decoded"
        );

        Ok(Frame {
            msg_type: raw.msg_type,
            flags: raw.flags,
            checksum: raw.checksum,
            payload: raw.has_payload.then_some(&self.scratch[..raw.logical_len]),
        })
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

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::{encode_frame, max_encoded_len};
    use crate::escape::{ESC, STX};
    use crate::message::{ACK, FLAG_SHOULD_ACK, GO_FORWARD, STOP};

    fn wire_for(frame: &Frame<'_>) -> Vec<u8> {
        let mut buf = vec![0u8; max_encoded_len(frame.payload_len())];
        let written = encode_frame(frame, &mut buf).unwrap();
        buf.truncate(written);
        buf
    }

    #[test]
    fn read_single_frame() {
        let mut frame = Frame::empty();
        frame.msg_type = GO_FORWARD;
        frame.checksum = 0x21;
        frame.attach_payload(b"hello").unwrap();

        let mut reader = FrameReader::new(Cursor::new(wire_for(&frame)));
        let decoded = reader.read_frame().unwrap();

        assert_eq!(decoded.msg_type, GO_FORWARD);
        assert_eq!(decoded.checksum, 0x21);
        assert_eq!(decoded.payload, Some(b"hello".as_slice()));
    }

    #[test]
    fn read_multiple_frames() {
        let mut wire = Vec::new();
        for (msg_type, payload) in [
            (ACK, b"one".as_slice()),
            (STOP, b"two".as_slice()),
            (GO_FORWARD, b"three".as_slice()),
        ] {
            let mut frame = Frame::empty();
            frame.msg_type = msg_type;
            frame.attach_payload(payload).unwrap();
            wire.extend_from_slice(&wire_for(&frame));
        }

        let mut reader = FrameReader::new(Cursor::new(wire));

        let f1 = reader.read_frame().unwrap();
        assert_eq!((f1.msg_type, f1.payload), (ACK, Some(b"one".as_slice())));
        let f2 = reader.read_frame().unwrap();
        assert_eq!((f2.msg_type, f2.payload), (STOP, Some(b"two".as_slice())));
        let f3 = reader.read_frame().unwrap();
        assert_eq!(
            (f3.msg_type, f3.payload),
            (GO_FORWARD, Some(b"three".as_slice()))
        );
    }

    #[test]
    fn read_frame_with_reserved_payload() {
        let payload = [STX, ESC, 0x41];
        let mut frame = Frame::empty();
        frame.msg_type = ACK;
        frame.attach_payload(&payload).unwrap();

        let mut reader = FrameReader::new(Cursor::new(wire_for(&frame)));
        let decoded = reader.read_frame().unwrap();
        assert_eq!(decoded.payload, Some(payload.as_slice()));
    }

    #[test]
    fn partial_read_handling() {
        let mut frame = Frame::empty();
        frame.msg_type = ACK;
        frame.flags = FLAG_SHOULD_ACK;
        frame.attach_payload(b"slow").unwrap();

        let byte_reader = ByteByByteReader {
            bytes: wire_for(&frame),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);

        let decoded = reader.read_frame().unwrap();
        assert_eq!(decoded.msg_type, ACK);
        assert!(decoded.should_ack());
        assert_eq!(decoded.payload, Some(b"slow".as_slice()));
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let mut frame = Frame::empty();
        frame.attach_payload(b"partial").unwrap();
        let mut wire = wire_for(&frame);
        wire.truncate(wire.len() / 2);

        let mut reader = FrameReader::new(Cursor::new(wire));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn desynchronized_stream_reports_missing_start() {
        let mut wire = wire_for(&Frame::empty());
        wire[0] = 0x55;

        let mut reader = FrameReader::new(Cursor::new(wire));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(
            err,
            FrameError::StartDelimiterMissing { found: 0x55 }
        ));
    }

    #[test]
    fn interrupted_read_retries() {
        let mut frame = Frame::empty();
        frame.msg_type = STOP;
        let reader = InterruptedThenData {
            state: 0,
            bytes: wire_for(&frame),
            pos: 0,
        };

        let mut framed = FrameReader::new(reader);
        let decoded = framed.read_frame().unwrap();
        assert_eq!(decoded.msg_type, STOP);
    }

    #[test]
    fn read_would_block_propagates_io_error() {
        let reader = WouldBlockReader;
        let mut framed = FrameReader::new(reader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = FrameReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let n = (self.bytes.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct WouldBlockReader;

    impl Read for WouldBlockReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::WouldBlock))
        }
    }
}
