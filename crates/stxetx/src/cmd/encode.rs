use std::fs;

use stxetx_frame::{encode_frame, max_encoded_len, message, Frame};

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{parse_hex, print_wire, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = build_wire(&args)?;
    print_wire(&wire, format);
    Ok(SUCCESS)
}

fn build_wire(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    let payload = resolve_payload(args)?;

    let mut flags = 0u8;
    if args.ack {
        flags |= message::FLAG_SHOULD_ACK;
    }
    if args.ignore_checksum {
        flags |= message::FLAG_IGNORE_CHECKSUM;
    }

    let mut frame = Frame {
        msg_type: args.msg_type,
        flags,
        checksum: args.checksum,
        payload: None,
    };
    if !payload.is_empty() {
        frame
            .attach_payload(&payload)
            .map_err(|err| frame_error("invalid payload", err))?;
    }

    let mut wire = vec![0u8; max_encoded_len(payload.len())];
    let written =
        encode_frame(&frame, &mut wire).map_err(|err| frame_error("encode failed", err))?;
    wire.truncate(written);
    Ok(wire)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(hex) = &args.hex {
        return parse_hex(hex).map_err(|err| CliError::new(USAGE, err));
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}
