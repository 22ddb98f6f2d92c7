use crate::error::{FrameError, Result};
use crate::escape::{self, stuffed_len, ESC, ETX, STX};
use crate::message;

/// Wire size of the length field: the escape prefix plus the value byte.
///
/// The field is escape-prefixed unconditionally so it stays a constant two
/// wire bytes whether or not the value itself is a reserved byte.
pub const LEN_FIELD_WIRE_SIZE: usize = 2;

/// Smallest possible wire frame: start delimiter, unescaped type, flags and
/// checksum, empty length field, end delimiter.
pub const MIN_WIRE_SIZE: usize = 7;

/// Maximum number of wire bytes the stuffed payload may occupy; the length
/// field value is a single byte.
pub const MAX_WIRE_PAYLOAD: usize = u8::MAX as usize;

/// A transport frame over a caller-owned payload buffer.
///
/// The payload is always a borrowed view: encoding reads from it, decoding
/// rebinds it into a caller-supplied scratch buffer. `Some(&[])` is
/// representable and distinct from `None`; both encode to an empty wire
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Message type. Opaque to the codec; see [`crate::message`].
    pub msg_type: u8,
    /// Flag bitmask. Only [`message::FLAG_IGNORE_CHECKSUM`] affects encoding.
    pub flags: u8,
    /// Verification byte supplied by an external checksum routine;
    /// transported verbatim unless the ignore-checksum flag is set.
    pub checksum: u8,
    /// Borrowed payload view.
    pub payload: Option<&'a [u8]>,
}

impl<'a> Frame<'a> {
    /// A frame with the sentinel message type and nothing else set.
    pub fn empty() -> Self {
        Frame {
            msg_type: message::EMPTY,
            flags: 0,
            checksum: 0,
            payload: None,
        }
    }

    /// Rebind the payload view.
    ///
    /// An empty slice is rejected as a caller error, not treated as a
    /// no-op; a payload-less frame is built with [`Frame::empty`] or by
    /// clearing `payload` directly.
    pub fn attach_payload(&mut self, payload: &'a [u8]) -> Result<()> {
        if payload.is_empty() {
            return Err(FrameError::BufferTooSmall {
                needed: 1,
                capacity: 0,
            });
        }
        self.payload = Some(payload);
        Ok(())
    }

    /// Logical payload length in bytes, before stuffing.
    pub fn payload_len(&self) -> usize {
        self.payload.map_or(0, <[u8]>::len)
    }

    /// Whether the receiver is asked to acknowledge this frame.
    pub fn should_ack(&self) -> bool {
        self.flags & message::FLAG_SHOULD_ACK != 0
    }

    /// Whether the checksum byte travels as zero and is exempt from
    /// verification.
    pub fn ignore_checksum(&self) -> bool {
        self.flags & message::FLAG_IGNORE_CHECKSUM != 0
    }

    /// The checksum byte that actually goes on the wire.
    fn wire_checksum(&self) -> u8 {
        if self.ignore_checksum() {
            0
        } else {
            self.checksum
        }
    }
}

impl Default for Frame<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Exact wire size of `frame` once encoded, including all stuffing.
///
/// Fails with [`FrameError::PayloadTooLarge`] when the stuffed payload
/// would not fit the single-byte length field.
pub fn encoded_len(frame: &Frame<'_>) -> Result<usize> {
    let wire_payload = wire_payload_len(frame)?;
    Ok(1 // start delimiter
        + stuffed_len(frame.msg_type)
        + stuffed_len(frame.flags)
        + LEN_FIELD_WIRE_SIZE
        + wire_payload
        + stuffed_len(frame.wire_checksum())
        + 1) // end delimiter
}

/// Worst-case wire size of any frame with `payload_len` logical payload
/// bytes: every stuffable byte reserved. Useful for sizing destination
/// buffers without inspecting the payload.
pub fn max_encoded_len(payload_len: usize) -> usize {
    2 + 3 * 2 + LEN_FIELD_WIRE_SIZE + 2 * payload_len
}

fn wire_payload_len(frame: &Frame<'_>) -> Result<usize> {
    let wire_len = frame
        .payload
        .unwrap_or_default()
        .iter()
        .map(|&byte| stuffed_len(byte))
        .sum();
    if wire_len > MAX_WIRE_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            wire_len,
            max: MAX_WIRE_PAYLOAD,
        });
    }
    Ok(wire_len)
}

/// Encode `frame` into `dst`, returning the number of bytes written.
///
/// Capacity is checked up front: on [`FrameError::BufferTooSmall`] nothing
/// has been written. The length slot is reserved first and backfilled with
/// the stuffed payload's wire length once that is known.
pub fn encode_frame(frame: &Frame<'_>, dst: &mut [u8]) -> Result<usize> {
    let needed = encoded_len(frame)?;
    if dst.len() < needed {
        return Err(FrameError::BufferTooSmall {
            needed,
            capacity: dst.len(),
        });
    }

    let mut pos = 0;
    dst[pos] = STX;
    pos += 1;
    pos += put_stuffed(dst, pos, frame.msg_type);
    pos += put_stuffed(dst, pos, frame.flags);

    // Fixed two-byte length slot; the value is unknown until the payload
    // has been stuffed.
    dst[pos] = ESC;
    let len_slot = pos + 1;
    pos += LEN_FIELD_WIRE_SIZE;

    let payload_start = pos;
    for &byte in frame.payload.unwrap_or_default() {
        pos += put_stuffed(dst, pos, byte);
    }
    dst[len_slot] = (pos - payload_start) as u8;

    pos += put_stuffed(dst, pos, frame.wire_checksum());
    dst[pos] = ETX;
    pos += 1;

    debug_assert_eq!(pos, needed);
    Ok(pos)
}

fn put_stuffed(dst: &mut [u8], pos: usize, byte: u8) -> usize {
    let stuffed = escape::stuff(byte);
    let bytes = stuffed.as_bytes();
    dst[pos..pos + bytes.len()].copy_from_slice(bytes);
    bytes.len()
}

/// Decode one frame from the front of `src`, unstuffing the payload into
/// `scratch`.
///
/// Returns `Ok(None)` when `src` holds only an incomplete prefix of a
/// frame (more data needed). On success the frame's payload view borrows
/// from `scratch`, and the number of wire bytes consumed is returned
/// alongside the frame so callers can advance past it.
///
/// The checksum byte is transported, not verified; verification and the
/// ignore-checksum convention are the caller's concern.
pub fn decode_frame<'a>(
    src: &[u8],
    scratch: &'a mut [u8],
) -> Result<Option<(Frame<'a>, usize)>> {
    let Some(raw) = decode_raw(src, scratch)? else {
        return Ok(None);
    };
    let (payload_buf, _) = scratch.split_at_mut(raw.logical_len);
    let frame = Frame {
        msg_type: raw.msg_type,
        flags: raw.flags,
        checksum: raw.checksum,
        payload: raw.has_payload.then_some(&*payload_buf),
    };
    Ok(Some((frame, raw.wire_size)))
}

/// Decoded frame fields with the payload left in `scratch`, not yet bound
/// to a view. Lets [`crate::reader::FrameReader`] loop for more input
/// without holding a borrow of its scratch buffer.
pub(crate) struct RawFrame {
    pub msg_type: u8,
    pub flags: u8,
    pub checksum: u8,
    pub logical_len: usize,
    pub has_payload: bool,
    pub wire_size: usize,
}

pub(crate) fn decode_raw(src: &[u8], scratch: &mut [u8]) -> Result<Option<RawFrame>> {
    let Some(&first) = src.first() else {
        return Ok(None);
    };
    if first != STX {
        return Err(FrameError::StartDelimiterMissing { found: first });
    }
    let mut pos = 1;

    let Some((msg_type, n)) = escape::unstuff(&src[pos..]) else {
        return Ok(None);
    };
    pos += n;
    let Some((flags, n)) = escape::unstuff(&src[pos..]) else {
        return Ok(None);
    };
    pos += n;

    // The length field is unstuffed like any interior byte, so the escaped
    // spelling this crate emits and a bare length byte decode identically.
    let Some((wire_len, n)) = escape::unstuff(&src[pos..]) else {
        return Ok(None);
    };
    pos += n;
    let wire_len = usize::from(wire_len);

    if src.len() < pos + wire_len {
        return Ok(None);
    }
    let region = &src[pos..pos + wire_len];
    let Some(logical_len) = unstuffed_len(region) else {
        return Err(FrameError::DanglingEscape);
    };
    if logical_len > scratch.len() {
        return Err(FrameError::BufferTooSmall {
            needed: logical_len,
            capacity: scratch.len(),
        });
    }

    // The loop budget is wire bytes consumed, not logical bytes produced;
    // `unstuffed_len` already proved every unit complete within the region.
    let mut consumed = 0;
    let mut produced = 0;
    while consumed < wire_len {
        let Some((byte, n)) = escape::unstuff(&region[consumed..]) else {
            return Err(FrameError::DanglingEscape);
        };
        scratch[produced] = byte;
        produced += 1;
        consumed += n;
    }
    pos += wire_len;

    let Some((checksum, n)) = escape::unstuff(&src[pos..]) else {
        return Ok(None);
    };
    pos += n;

    let Some(&last) = src.get(pos) else {
        return Ok(None);
    };
    if last != ETX {
        return Err(FrameError::EndDelimiterMissing { found: last });
    }
    pos += 1;

    Ok(Some(RawFrame {
        msg_type,
        flags,
        checksum,
        logical_len,
        has_payload: wire_len > 0,
        wire_size: pos,
    }))
}

/// Logical byte count of a stuffed region, or `None` when the region ends
/// in the middle of an escape pair.
fn unstuffed_len(region: &[u8]) -> Option<usize> {
    let mut pos = 0;
    let mut len = 0;
    while pos < region.len() {
        let (_, n) = escape::unstuff(&region[pos..])?;
        pos += n;
        len += 1;
    }
    Some(len)
}
