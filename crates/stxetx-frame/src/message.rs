//! Message-type and flag vocabulary shared by both ends of the link.
//!
//! The codec transports the type and flag bytes as opaque data; only
//! [`FLAG_IGNORE_CHECKSUM`] influences encoding. The constants here are
//! caller-side vocabulary and diagnostics.

/// Sentinel type of a frame that carries no message yet.
pub const EMPTY: u8 = 0xFF;

/// Acknowledge a previously received frame.
pub const ACK: u8 = 1;

/// Drive command: move forward.
pub const GO_FORWARD: u8 = 2;

/// Drive command: move backward.
pub const GO_BACKWARD: u8 = 3;

/// Drive command: rotate left.
pub const ROTATE_LEFT: u8 = 4;

/// Drive command: rotate right.
pub const ROTATE_RIGHT: u8 = 5;

/// Drive command: stop.
pub const STOP: u8 = 6;

/// Receiver should answer with an [`ACK`] frame. Informational; never
/// interpreted by the codec.
pub const FLAG_SHOULD_ACK: u8 = 1 << 0;

/// Transmit a zero checksum byte and skip verification on receipt.
pub const FLAG_IGNORE_CHECKSUM: u8 = 1 << 1;

/// Returns a human-readable name for a message type.
pub fn type_name(msg_type: u8) -> &'static str {
    match msg_type {
        EMPTY => "EMPTY",
        ACK => "ACK",
        GO_FORWARD => "GO_FORWARD",
        GO_BACKWARD => "GO_BACKWARD",
        ROTATE_LEFT => "ROTATE_LEFT",
        ROTATE_RIGHT => "ROTATE_RIGHT",
        STOP => "STOP",
        _ => "USER",
    }
}

/// Returns the names of the flag bits set in `flags`.
pub fn flag_names(flags: u8) -> Vec<&'static str> {
    let mut names = Vec::new();
    if flags & FLAG_SHOULD_ACK != 0 {
        names.push("SHOULD_ACK");
    }
    if flags & FLAG_IGNORE_CHECKSUM != 0 {
        names.push("IGNORE_CHECKSUM");
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_have_names() {
        assert_eq!(type_name(ACK), "ACK");
        assert_eq!(type_name(STOP), "STOP");
        assert_eq!(type_name(EMPTY), "EMPTY");
        assert_eq!(type_name(0x42), "USER");
    }

    #[test]
    fn flag_names_reflect_set_bits() {
        assert!(flag_names(0).is_empty());
        assert_eq!(flag_names(FLAG_SHOULD_ACK), vec!["SHOULD_ACK"]);
        assert_eq!(
            flag_names(FLAG_SHOULD_ACK | FLAG_IGNORE_CHECKSUM),
            vec!["SHOULD_ACK", "IGNORE_CHECKSUM"]
        );
    }
}
