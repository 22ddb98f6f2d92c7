use std::io::{ErrorKind, Write};

use tracing::trace;

use crate::codec::{self, Frame};
use crate::error::{FrameError, Result};

/// Writes complete frames to any `Write` byte stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: Vec<u8>,
}

impl<T: Write> FrameWriter<T> {
    /// Create a frame writer over a byte stream.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }

    /// Encode and write one frame (blocking), then flush.
    pub fn write_frame(&mut self, frame: &Frame<'_>) -> Result<()> {
        let needed = codec::encoded_len(frame)?;
        self.buf.resize(needed, 0);
        let written = codec::encode_frame(frame, &mut self.buf)?;
        trace!(wire_size = written, "frame encoded");

        let mut offset = 0usize;
        while offset < written {
            match self.inner.write(&self.buf[offset..written]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
