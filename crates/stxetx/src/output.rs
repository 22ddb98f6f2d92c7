use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use stxetx_frame::{message, Frame};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput {
    msg_type: u8,
    msg_type_name: &'static str,
    flags: u8,
    flag_names: Vec<&'static str>,
    checksum: u8,
    payload_len: usize,
    payload_hex: String,
}

/// Print a decoded frame. `Raw` writes the payload bytes verbatim.
pub fn print_frame(frame: &Frame<'_>, format: OutputFormat) {
    let payload = frame.payload.unwrap_or_default();
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                msg_type: frame.msg_type,
                msg_type_name: message::type_name(frame.msg_type),
                flags: frame.flags,
                flag_names: message::flag_names(frame.flags),
                checksum: frame.checksum,
                payload_len: payload.len(),
                payload_hex: hex_dump(payload),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "FLAGS", "CHECKSUM", "LEN", "PAYLOAD"])
                .add_row(vec![
                    message::type_name(frame.msg_type).to_string(),
                    format_flags(frame.flags),
                    format!("0x{:02X}", frame.checksum),
                    payload.len().to_string(),
                    hex_dump(payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "msg_type={} ({}) flags={} checksum=0x{:02X} len={} payload={}",
                frame.msg_type,
                message::type_name(frame.msg_type),
                format_flags(frame.flags),
                frame.checksum,
                payload.len(),
                hex_dump(payload)
            );
        }
        OutputFormat::Raw => print_raw(payload),
    }
}

#[derive(Serialize)]
struct WireOutput {
    wire_len: usize,
    hex: String,
}

/// Print encoded wire bytes. `Raw` writes them verbatim to stdout; the text
/// formats use the spaced-hex transmit-log notation.
pub fn print_wire(wire: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = WireOutput {
                wire_len: wire.len(),
                hex: hex_dump(wire),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["WIRE LEN", "BYTES"])
                .add_row(vec![wire.len().to_string(), hex_dump(wire)]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", hex_dump(wire)),
        OutputFormat::Raw => print_raw(wire),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Spaced hex, one `0xNN` token per byte.
pub fn hex_dump(data: &[u8]) -> String {
    data.iter()
        .map(|byte| format!("0x{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse `hex_dump`-style text: `0x`-prefixed or bare hex byte tokens
/// separated by whitespace or commas.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            u8::from_str_radix(digits, 16).map_err(|_| format!("invalid hex byte: {token}"))
        })
        .collect()
}

fn format_flags(flags: u8) -> String {
    let names = message::flag_names(flags);
    if names.is_empty() {
        format!("0x{flags:02X}")
    } else {
        format!("0x{flags:02X} ({})", names.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_dump_matches_transmit_log_notation() {
        assert_eq!(hex_dump(&[0x02, 0x25, 0xFF]), "0x02 0x25 0xFF");
        assert_eq!(hex_dump(&[]), "");
    }

    #[test]
    fn parse_hex_accepts_prefixed_and_bare_tokens() {
        assert_eq!(parse_hex("0x02 0x25 ff").unwrap(), vec![0x02, 0x25, 0xFF]);
        assert_eq!(parse_hex("02,03,25").unwrap(), vec![0x02, 0x03, 0x25]);
        assert_eq!(parse_hex("  0X0a\t0b ").unwrap(), vec![0x0A, 0x0B]);
    }

    #[test]
    fn parse_hex_roundtrips_hex_dump() {
        let bytes = vec![0x00, 0x02, 0x03, 0x25, 0x7F, 0xFF];
        assert_eq!(parse_hex(&hex_dump(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn parse_hex_rejects_bad_tokens() {
        assert!(parse_hex("0xZZ").is_err());
        assert!(parse_hex("123").is_err());
        assert!(parse_hex("hello").is_err());
    }

    #[test]
    fn flag_formatting_names_set_bits() {
        assert_eq!(format_flags(0), "0x00");
        assert_eq!(
            format_flags(message::FLAG_IGNORE_CHECKSUM),
            "0x02 (IGNORE_CHECKSUM)"
        );
    }
}
