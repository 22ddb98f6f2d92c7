/// Errors that can occur while encoding, decoding, or streaming frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The input does not begin with the start delimiter.
    #[error("frame start delimiter missing (found 0x{found:02X})")]
    StartDelimiterMissing { found: u8 },

    /// The byte after the checksum is not the end delimiter.
    #[error("frame end delimiter missing (found 0x{found:02X})")]
    EndDelimiterMissing { found: u8 },

    /// A caller-supplied buffer cannot hold the bytes this call produces.
    /// Checked before anything is written.
    #[error("buffer too small ({needed} bytes needed, {capacity} available)")]
    BufferTooSmall { needed: usize, capacity: usize },

    /// The stuffed payload does not fit the single-byte length field.
    #[error("stuffed payload too large ({wire_len} wire bytes, max {max})")]
    PayloadTooLarge { wire_len: usize, max: usize },

    /// The declared payload region ends with an escape byte whose literal
    /// partner lies outside the region.
    #[error("escape byte at end of payload region has no partner")]
    DanglingEscape,

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
